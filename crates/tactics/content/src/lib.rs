//! Data-driven battle content.
//!
//! This crate describes what can fight and assembles battles out of it:
//! - Ship models and equipment templates (catalog, RON)
//! - Fleet rosters referencing catalog codes (setup, RON)
//! - Battle configuration (TOML)
//!
//! Templates carry no identifiers. [`BattleAssembler`] hands out ship,
//! equipment and effect ids in roster order, so the same content always
//! yields the same battle.

pub mod assembly;
pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use assembly::{AssemblyError, BattleAssembler, IdAllocator};
pub use catalog::{
    ActionTemplate, BattleSetup, Catalog, EffectTemplate, EquipmentTemplate, FleetSpec, ShipModel,
    ShipSpec,
};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LoadResult, SetupLoader};
