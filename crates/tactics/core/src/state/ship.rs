use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::diff::BattleDiff;
use crate::effect::{Effect, EffectKind};
use crate::geometry::{Location, Placement};

use super::{
    AttributeKind, AttributeModifier, BoundedValue, EffectId, Equipment, EquipmentId, FleetId,
    ShipAttributes, ShipId, ShipValues, SlotType, ValueKind,
};

/// Active effects of a ship, keyed by effect id.
///
/// At most one entry exists per id; replacing an entry goes through an
/// explicit removal first.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffects(BTreeMap<EffectId, Effect>);

impl ActiveEffects {
    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.0.get(&id)
    }

    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut Effect> {
        self.0.get_mut(&id)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.0.contains_key(&id)
    }

    /// Adds an entry. Returns false (and leaves the collection untouched) if
    /// the id is already present.
    pub fn insert(&mut self, effect: Effect) -> bool {
        if self.0.contains_key(&effect.id) {
            return false;
        }
        self.0.insert(effect.id, effect);
        true
    }

    pub fn remove(&mut self, id: EffectId) -> Option<Effect> {
        self.0.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.0.values()
    }

    /// Kinds in effect, looking through sticky wrappers.
    pub fn effective_kinds(&self) -> impl Iterator<Item = &EffectKind> {
        self.0.values().map(|effect| effect.kind.innermost())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// How firmly a ship is held in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PinLevel {
    Free,
    /// Cannot use its own engines.
    Soft,
    /// Additionally immune to being pushed by other ships.
    Hard,
}

/// A ship engaged in battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    pub id: ShipId,
    pub fleet: FleetId,
    pub name: String,
    pub alive: bool,
    pub placement: Placement,
    pub attributes: ShipAttributes,
    pub values: ShipValues,
    pub equipment: Vec<Equipment>,
    pub active_effects: ActiveEffects,
}

impl Ship {
    pub fn new(id: ShipId, fleet: FleetId, name: impl Into<String>) -> Self {
        Self {
            id,
            fleet,
            name: name.into(),
            alive: true,
            placement: Placement::default(),
            attributes: ShipAttributes::default(),
            values: ShipValues::default(),
            equipment: Vec::new(),
            active_effects: ActiveEffects::default(),
        }
    }

    /// Adds a base cumulative value to an attribute (ship model stats).
    #[must_use]
    pub fn with_base_attribute(mut self, kind: AttributeKind, value: i32) -> Self {
        self.attributes
            .get_mut(kind)
            .add_modifier(&AttributeModifier::cumulative(value));
        self.sync_maximums();
        self
    }

    #[must_use]
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equip(equipment);
        self
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.placement = Placement::new(x, y, self.placement.angle);
        self
    }

    /// Mounts an equipment, applying its permanent modifiers.
    pub fn equip(&mut self, equipment: Equipment) {
        for (kind, modifier) in equipment.attribute_modifiers() {
            self.attributes.get_mut(kind).add_modifier(&modifier);
        }
        self.equipment.push(equipment);
        self.sync_maximums();
    }

    pub fn location(&self) -> Location {
        self.placement.location()
    }

    pub fn value(&self, kind: ValueKind) -> i32 {
        self.values.get(kind).current
    }

    pub fn bounded(&self, kind: ValueKind) -> &BoundedValue {
        self.values.get(kind)
    }

    pub fn attribute(&self, kind: AttributeKind) -> i32 {
        self.attributes.value(kind)
    }

    /// Copies capacity attributes into value maximums.
    pub fn sync_maximums(&mut self) {
        for kind in ValueKind::iter() {
            let maximum = self.attributes.value(kind.capacity());
            self.values.get_mut(kind).maximum = maximum;
        }
    }

    /// Puts the ship back in pristine battle condition (full values, no
    /// effects, cool equipment).
    pub fn restore_initial_state(&mut self) {
        self.alive = true;
        self.active_effects.clear();
        self.sync_maximums();
        for kind in ValueKind::iter() {
            let value = self.values.get_mut(kind);
            value.current = value.maximum;
        }
        for equipment in &mut self.equipment {
            equipment.cooldown.reset();
            equipment.activated = false;
            equipment.intruders = 0;
        }
    }

    pub fn equipment(&self, id: EquipmentId) -> Option<&Equipment> {
        self.equipment.iter().find(|equipment| equipment.id == id)
    }

    pub fn equipment_mut(&mut self, id: EquipmentId) -> Option<&mut Equipment> {
        self.equipment.iter_mut().find(|equipment| equipment.id == id)
    }

    pub fn equipment_in_slot(&self, slot: SlotType) -> impl Iterator<Item = &Equipment> {
        self.equipment
            .iter()
            .filter(move |equipment| equipment.slot == slot)
    }

    /// Toggle and vigilance equipment currently switched on.
    pub fn toggled(&self) -> impl Iterator<Item = &Equipment> {
        self.equipment.iter().filter(|equipment| equipment.is_toggled())
    }

    pub fn pin_level(&self) -> PinLevel {
        self.active_effects
            .effective_kinds()
            .filter_map(|kind| match kind {
                EffectKind::Pinned { hard: true } => Some(PinLevel::Hard),
                EffectKind::Pinned { hard: false } => Some(PinLevel::Soft),
                _ => None,
            })
            .max()
            .unwrap_or(PinLevel::Free)
    }

    /// Summed damage modifier percentage from active effects.
    pub fn damage_modifier(&self) -> i32 {
        self.active_effects
            .effective_kinds()
            .map(|kind| match kind {
                EffectKind::DamageModifier { percent } => *percent,
                _ => 0,
            })
            .sum()
    }

    pub fn is_in_circle(&self, center: Location, radius: f64) -> bool {
        self.location().is_in_range(center, radius)
    }

    /// Diffs to bring a value to `value` (or by `value` when `relative`).
    pub fn value_diffs(&self, kind: ValueKind, value: i32, relative: bool) -> Vec<BattleDiff> {
        let current = self.value(kind);
        let target = if relative { current + value } else { value };
        if target == current {
            Vec::new()
        } else {
            vec![BattleDiff::ShipValue {
                ship: self.id,
                value: kind,
                delta: target - current,
            }]
        }
    }

    /// Attribute diff, pulling the bounded value down in the same diff when a
    /// capacity shrinks below the current value.
    pub fn attribute_diff(
        &self,
        kind: AttributeKind,
        added: AttributeModifier,
        removed: AttributeModifier,
    ) -> BattleDiff {
        let mut value_delta = 0;
        if let Some(value_kind) = ValueKind::iter().find(|value| value.capacity() == kind) {
            let mut simulated = self.attributes.get(kind).clone();
            simulated.add_modifier(&added);
            simulated.remove_modifier(&removed);
            let capacity = simulated.value().max(0);
            let current = self.value(value_kind);
            if current > capacity {
                value_delta = capacity - current;
            }
        }
        BattleDiff::ShipAttribute {
            ship: self.id,
            attribute: kind,
            added,
            removed,
            value_delta,
        }
    }
}
