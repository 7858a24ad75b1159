use crate::action::ActionKind;
use crate::effect::{Effect, EffectKind};

use super::{AttributeModifier, Cooldown, EquipmentId};

/// Ship slot an equipment is mounted in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SlotType {
    Hull,
    Shield,
    Power,
    Engine,
    Weapon,
    Utility,
}

/// An item mounted on a ship.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub id: EquipmentId,
    pub code: String,
    pub slot: SlotType,
    /// Action granted by this equipment, if any.
    pub action: Option<ActionKind>,
    pub cooldown: Cooldown,
    pub wear: u32,
    /// Effects permanently granted while mounted (attribute modifiers).
    pub permanent_effects: Vec<Effect>,
    /// Activation status of toggle and vigilance actions.
    pub activated: bool,
    /// Ships caught by a vigilance watch since activation.
    pub intruders: u32,
}

impl Equipment {
    pub fn new(id: EquipmentId, code: impl Into<String>, slot: SlotType) -> Self {
        Self {
            id,
            code: code.into(),
            slot,
            action: None,
            cooldown: Cooldown::default(),
            wear: 0,
            permanent_effects: Vec::new(),
            activated: false,
            intruders: 0,
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, overheat: u32, cooling: u32) -> Self {
        self.cooldown = Cooldown::new(overheat, cooling);
        self
    }

    #[must_use]
    pub fn with_permanent_effect(mut self, effect: Effect) -> Self {
        self.permanent_effects.push(effect);
        self
    }

    /// Attribute modifiers granted by the permanent effects.
    pub fn attribute_modifiers(
        &self,
    ) -> impl Iterator<Item = (super::AttributeKind, AttributeModifier)> + '_ {
        self.permanent_effects
            .iter()
            .filter_map(|effect| match &effect.kind {
                EffectKind::Attribute { attribute, value } => {
                    Some((*attribute, AttributeModifier::cumulative(*value)))
                }
                EffectKind::AttributeMultiply { attribute, value } => {
                    Some((*attribute, AttributeModifier::multiplier(*value)))
                }
                EffectKind::AttributeLimit { attribute, value } => {
                    Some((*attribute, AttributeModifier::limit(*value)))
                }
                _ => None,
            })
    }

    /// True for toggle-like actions currently switched on.
    pub fn is_toggled(&self) -> bool {
        self.activated
            && matches!(
                self.action,
                Some(ActionKind::Toggle(_)) | Some(ActionKind::Vigilance(_))
            )
    }
}
