//! Actions: validated, power-costed operations of the playing ship.
//!
//! Every action goes through the same pipeline (see [`resolve`]):
//! 1. **Availability**: ship alive and playing, equipment cool, enough power
//! 2. **Targeting**: the target is checked and possibly adjusted (clamped to
//!    range, pushed out of exclusion areas), or rejected
//! 3. **Diffs**: action-used marker, power cost, then the action-specific
//!    diffs for every affected ship
//!
//! The catalog is closed: end turn is implicit for every ship, all other
//! actions come from an equipment's [`ActionKind`].

mod drone;
mod end_turn;
mod error;
mod fire;
mod movement;
mod pipeline;
pub(crate) mod toggle;

pub use error::{ActionError, ActionUnavailability};
pub use pipeline::{
    available_actions, blast_radius, check_target, default_target, impacted_ships, power_usage,
    range_radius, resolve, unavailability,
};

use crate::effect::Effect;
use crate::state::{EffectId, Equipment, EquipmentId, Ship};

/// Names an action of a ship, by stable id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionRef {
    EndTurn,
    Equipment(EquipmentId),
}

impl core::fmt::Display for ActionRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EndTurn => f.write_str("end turn"),
            Self::Equipment(id) => write!(f, "{id}"),
        }
    }
}

/// Fires on a ship, or on an area for blast weapons.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireWeapon {
    pub power: i32,
    /// 0 for weapons that only affect their own ship.
    pub range: f64,
    pub blast: f64,
    pub effects: Vec<Effect>,
}

/// Engine granting the move action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveEngine {
    pub distance_per_power: f64,
    /// Keeps the ship this far from other ships.
    pub safety_distance: f64,
}

impl MoveEngine {
    pub const DEFAULT_SAFETY_DISTANCE: f64 = 120.0;

    pub fn new(distance_per_power: f64) -> Self {
        Self {
            distance_per_power,
            safety_distance: Self::DEFAULT_SAFETY_DISTANCE,
        }
    }
}

/// Aura switched on and off; payload effects follow the ships in its radius.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Toggle {
    pub power: i32,
    /// 0 affects the owner only.
    pub radius: f64,
    pub effects: Vec<Effect>,
}

/// Watch over an area, hitting enemies that enter it after activation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vigilance {
    pub power: i32,
    pub radius: f64,
    /// Intruders before switching off, 0 for unlimited.
    pub intruder_count: u32,
    pub intruder_effects: Vec<Effect>,
    /// Id of the watch entries placed on enemies.
    pub watch: EffectId,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeployDrone {
    pub power: i32,
    pub deploy_distance: f64,
    /// Number of activations, deployment included.
    pub lifetime: u32,
    pub effect_radius: f64,
    pub effects: Vec<Effect>,
}

/// Action granted by an equipment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionKind {
    FireWeapon(FireWeapon),
    Move(MoveEngine),
    Toggle(Toggle),
    Vigilance(Vigilance),
    DeployDrone(DeployDrone),
}

impl ActionKind {
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::FireWeapon(_) => "fire",
            Self::Move(_) => "move",
            Self::Toggle(_) => "toggle",
            Self::Vigilance(_) => "watch",
            Self::DeployDrone(_) => "deploy",
        }
    }

    /// Activation power of toggle-like actions.
    pub const fn toggle_power(&self) -> Option<i32> {
        match self {
            Self::Toggle(toggle) => Some(toggle.power),
            Self::Vigilance(vigilance) => Some(vigilance.power),
            _ => None,
        }
    }

    /// True if any payload effect hurts its target.
    pub fn is_harmful(&self) -> bool {
        let effects = match self {
            Self::FireWeapon(weapon) => &weapon.effects,
            Self::Toggle(toggle) => &toggle.effects,
            Self::Vigilance(vigilance) => &vigilance.intruder_effects,
            Self::DeployDrone(drone) => &drone.effects,
            Self::Move(_) => return false,
        };
        effects.iter().any(|effect| !effect.is_beneficial())
    }
}

/// An action of a given ship, looked up from its [`ActionRef`].
#[derive(Clone, Copy, Debug)]
pub enum ShipAction<'a> {
    EndTurn,
    Equipment {
        equipment: &'a Equipment,
        kind: &'a ActionKind,
    },
}

impl<'a> ShipAction<'a> {
    /// Finds the action on the ship. `None` if the equipment is missing or
    /// grants no action.
    pub fn lookup(ship: &'a Ship, action: ActionRef) -> Option<Self> {
        match action {
            ActionRef::EndTurn => Some(Self::EndTurn),
            ActionRef::Equipment(id) => {
                let equipment = ship.equipment(id)?;
                let kind = equipment.action.as_ref()?;
                Some(Self::Equipment { equipment, kind })
            }
        }
    }

    pub fn action_ref(&self) -> ActionRef {
        match self {
            Self::EndTurn => ActionRef::EndTurn,
            Self::Equipment { equipment, .. } => ActionRef::Equipment(equipment.id),
        }
    }

    pub fn kind(&self) -> Option<&'a ActionKind> {
        match self {
            Self::EndTurn => None,
            Self::Equipment { kind, .. } => Some(kind),
        }
    }
}
