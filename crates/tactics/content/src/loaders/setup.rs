//! Battle roster loader.

use std::path::Path;

use crate::catalog::BattleSetup;
use crate::loaders::{LoadResult, read_file};

/// Loads fleet rosters from RON files.
pub struct SetupLoader;

impl SetupLoader {
    pub fn load(path: &Path) -> LoadResult<BattleSetup> {
        let content = read_file(path)?;
        ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle setup RON at {:?}: {}", path, e))
    }
}
