//! Catalog loader.

use std::path::Path;

use crate::catalog::Catalog;
use crate::loaders::{LoadResult, read_file};

/// Loads ship models and equipment templates from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON at {:?}: {}", path, e))
    }

    /// Loads every `.ron` file of a directory, in file name order, into one
    /// catalog.
    ///
    /// ```text
    /// catalog/
    ///   ├── models.ron
    ///   └── weapons.ron
    /// ```
    pub fn load_dir(dir: &Path) -> LoadResult<Catalog> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read catalog dir {}: {}", dir.display(), e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Catalog::default();
        for path in paths {
            catalog.extend(Self::load(&path)?);
            tracing::debug!(path = %path.display(), "catalog file loaded");
        }
        Ok(catalog)
    }
}
