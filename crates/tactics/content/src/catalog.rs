//! Catalog and roster definitions.
//!
//! These mirror the core effect and action types without identifiers.
//! Ids are handed out at assembly time (see [`crate::assembly`]).

use tactics_core::{AttributeKind, SlotType, StickyMode, ValueKind};

// ============================================================================
// Effects and actions
// ============================================================================

/// Effect as written in content files.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectTemplate {
    Damage {
        base: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        span: i32,
    },
    Attribute {
        attribute: AttributeKind,
        value: i32,
    },
    AttributeMultiply {
        attribute: AttributeKind,
        value: i32,
    },
    AttributeLimit {
        attribute: AttributeKind,
        value: i32,
    },
    Value {
        value: ValueKind,
        #[cfg_attr(feature = "serde", serde(default))]
        on: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        off: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        start: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        end: i32,
    },
    ValueTransfer {
        value: ValueKind,
        amount: i32,
    },
    Cooldown {
        #[cfg_attr(feature = "serde", serde(default))]
        cooling: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        maxcount: u32,
    },
    Repel {
        distance: f64,
    },
    Pinned {
        #[cfg_attr(feature = "serde", serde(default))]
        hard: bool,
    },
    DamageModifier {
        percent: i32,
    },
    Sticky {
        base: Box<EffectTemplate>,
        duration: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        mode: StickyMode,
    },
}

/// Action granted by an equipment template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionTemplate {
    Weapon {
        power: i32,
        range: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        blast: f64,
        effects: Vec<EffectTemplate>,
    },
    Engine {
        distance_per_power: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_safety_distance"))]
        safety_distance: f64,
    },
    Toggle {
        power: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        radius: f64,
        effects: Vec<EffectTemplate>,
    },
    Vigilance {
        power: i32,
        radius: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        intruder_count: u32,
        intruder_effects: Vec<EffectTemplate>,
    },
    Drone {
        power: i32,
        deploy_distance: f64,
        lifetime: u32,
        effect_radius: f64,
        effects: Vec<EffectTemplate>,
    },
}

#[cfg(feature = "serde")]
fn default_safety_distance() -> f64 {
    tactics_core::MoveEngine::DEFAULT_SAFETY_DISTANCE
}

#[cfg(feature = "serde")]
fn default_cooling() -> u32 {
    1
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentTemplate {
    pub code: String,
    pub slot: SlotType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub action: Option<ActionTemplate>,
    /// Uses before overheating, 0 for unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overheat: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_cooling"))]
    pub cooling: u32,
    /// Attribute effects granted while mounted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub permanent: Vec<EffectTemplate>,
}

/// Hull model: base attributes of a ship before equipment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipModel {
    pub code: String,
    pub hull: i32,
    pub shield: i32,
    pub power: i32,
    pub maneuvrability: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub precision: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub evasion: i32,
}

impl ShipModel {
    pub fn base_attributes(&self) -> [(AttributeKind, i32); 6] {
        [
            (AttributeKind::HullCapacity, self.hull),
            (AttributeKind::ShieldCapacity, self.shield),
            (AttributeKind::PowerCapacity, self.power),
            (AttributeKind::Maneuvrability, self.maneuvrability),
            (AttributeKind::Precision, self.precision),
            (AttributeKind::Evasion, self.evasion),
        ]
    }
}

/// Everything a roster may reference.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    #[cfg_attr(feature = "serde", serde(default))]
    pub models: Vec<ShipModel>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<EquipmentTemplate>,
}

impl Catalog {
    pub fn model(&self, code: &str) -> Option<&ShipModel> {
        self.models.iter().find(|model| model.code == code)
    }

    pub fn equipment(&self, code: &str) -> Option<&EquipmentTemplate> {
        self.equipment.iter().find(|template| template.code == code)
    }

    /// Merges another catalog in. Later definitions shadow earlier ones
    /// with the same code.
    pub fn extend(&mut self, other: Catalog) {
        for model in other.models {
            self.models.retain(|known| known.code != model.code);
            self.models.push(model);
        }
        for template in other.equipment {
            self.equipment.retain(|known| known.code != template.code);
            self.equipment.push(template);
        }
    }
}

// ============================================================================
// Rosters
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipSpec {
    pub name: String,
    pub model: String,
    /// Equipment codes, mounted in order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSpec {
    pub name: String,
    pub player: u32,
    pub ships: Vec<ShipSpec>,
}

/// Fleets taking part in a battle, in fleet order.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSetup {
    pub fleets: Vec<FleetSpec>,
}
