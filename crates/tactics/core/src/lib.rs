//! Deterministic battle rules for fleet tactical combat.
//!
//! `tactics-core` holds the canonical battle model (ships, fleets, drones),
//! the reversible diff protocol, the effect and action catalogs and the
//! consistency checks. It does no I/O. Every live mutation of a started
//! battle flows through [`engine::BattleEngine`] and is recorded in the
//! battle log, which can be stepped backward and forward with
//! [`diff::BattleLogClient`].
pub mod action;
pub mod checks;
pub mod config;
pub mod diff;
pub mod effect;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod geometry;
pub mod rng;
pub mod state;

pub use action::{
    ActionError, ActionKind, ActionRef, ActionUnavailability, DeployDrone, FireWeapon, MoveEngine,
    ShipAction, Toggle, Vigilance,
};
pub use config::BattleConfig;
pub use diff::{BattleDiff, BattleLogClient, DiffKinds, DiffLog};
pub use effect::{Effect, EffectContext, EffectKind, EffectSource, StickyMode};
pub use engine::{ActionOutcome, BattleEngine};
pub use error::{BattleError, DiffOutcome, ErrorSeverity, SkipReason};
pub use exclusion::ExclusionAreas;
pub use geometry::{Location, Placement, Target};
pub use rng::{FixedRng, PcgRng, RngOracle, compute_seed};
pub use state::{
    ActiveEffects, AttributeKind, AttributeModifier, Battle, BattleOutcome, BattleStats,
    BoundedValue, Cooldown, Drone, DroneId, EffectId, Equipment, EquipmentId, Fleet, FleetId,
    PinLevel, PlayerId, SetupError, Ship, ShipId, SlotType, StatKind, ValueKind,
};
