//! Content factory building battles from a data directory.

use std::path::{Path, PathBuf};

use tactics_core::{Battle, BattleConfig};

use crate::assembly::BattleAssembler;
use crate::catalog::{BattleSetup, Catalog};
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, SetupLoader};

/// Loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── catalog/
/// │   ├── models.ron
/// │   └── equipment.ron
/// └── battles/
///     └── skirmish.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Battle configuration from `config.toml`, or defaults when the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        CatalogLoader::load_dir(&self.data_dir.join("catalog"))
    }

    /// Loads `battles/{name}.ron`.
    pub fn load_setup(&self, name: &str) -> LoadResult<BattleSetup> {
        let path = self.data_dir.join("battles").join(format!("{}.ron", name));
        SetupLoader::load(&path)
    }

    /// Loads everything a battle needs and assembles it, unstarted.
    pub fn build_battle(&self, name: &str, config: BattleConfig) -> LoadResult<Battle> {
        let catalog = self.load_catalog()?;
        let setup = self.load_setup(name)?;
        let battle = BattleAssembler::new(&catalog).assemble(&setup, config)?;
        tracing::info!(
            battle = name,
            fleets = battle.fleets.len(),
            ships = battle.ships.len(),
            "battle content loaded"
        );
        Ok(battle)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
