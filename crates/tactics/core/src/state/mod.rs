//! Battle entities.
//!
//! Everything here is plain data addressed by stable ids. Entities never
//! point at each other; diffs, effects and actions look them up through the
//! [`Battle`] aggregate.
mod attribute;
mod battle;
mod cooldown;
mod drone;
mod equipment;
mod fleet;
mod ids;
mod ship;
mod stats;
mod value;

pub use attribute::{AttributeKind, AttributeModifier, ShipAttribute, ShipAttributes};
pub use battle::{Battle, BattleOutcome, SetupError};
pub use cooldown::Cooldown;
pub use drone::Drone;
pub use equipment::{Equipment, SlotType};
pub use fleet::Fleet;
pub use ids::{DroneId, EffectId, EquipmentId, FleetId, PlayerId, ShipId};
pub use ship::{ActiveEffects, PinLevel, Ship};
pub use stats::{BattleStats, StatKind};
pub use value::{BoundedValue, ShipValues, ValueKind};
