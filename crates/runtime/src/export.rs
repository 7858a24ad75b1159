//! JSON-lines export of the battle log.
//!
//! Each line is one log entry with its position:
//! ```text
//! {"index":0,"diff":{"ship_action_used":{...}}}
//! {"index":1,"diff":{"ship_value":{...}}}
//! ```
//! Entries name ships, equipment and effects by id only, so a separate
//! process can replay them against its own copy of the battle.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tactics_core::{Battle, BattleDiff};

use crate::api::{Result, RuntimeError};

#[derive(Serialize)]
struct Line<'a> {
    index: usize,
    diff: &'a BattleDiff,
}

/// Appends log entries to a file as they get applied.
pub struct LogExporter {
    path: PathBuf,
    writer: BufWriter<File>,
    /// Number of log entries already written.
    written: usize,
}

impl LogExporter {
    /// Creates (or truncates) the export file. Parent directories are
    /// created as needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(RuntimeError::Export)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(RuntimeError::Export)?;

        tracing::debug!(path = %path.display(), "log export created");
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Writes the entries appended to the log since the last call.
    ///
    /// If the log got shorter (an action was reverted), the export restarts
    /// from the new end of the log; reverted entries stay in the file.
    pub fn export_new(&mut self, battle: &Battle) -> Result<usize> {
        let len = battle.log.len();
        if len < self.written {
            tracing::warn!(written = self.written, log = len, "log shrank under the exporter");
            self.written = len;
        }
        let start = self.written;
        for (offset, diff) in battle.log.since(start).iter().enumerate() {
            self.write_entry(start + offset, diff)?;
        }
        self.written = len;
        Ok(len - start)
    }

    fn write_entry(&mut self, index: usize, diff: &BattleDiff) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &Line { index, diff })
            .map_err(RuntimeError::Encode)?;
        self.writer.write_all(b"\n").map_err(RuntimeError::Export)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(RuntimeError::Export)
    }
}

impl Drop for LogExporter {
    fn drop(&mut self) {
        if let Err(error) = self.writer.flush() {
            tracing::error!(path = %self.path.display(), %error, "failed to flush log export");
        }
    }
}
