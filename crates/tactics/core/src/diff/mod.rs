//! Reversible battle mutations.
//!
//! A [`BattleDiff`] names everything it touches by id, never by reference, so
//! it can be serialized, shipped to a peer and applied to another copy of the
//! battle. Applying a diff and then reverting it restores the exact previous
//! state.
//!
//! A diff whose entity cannot be found is skipped with a warning rather than
//! failing: the log must stay replayable even against a diverged battle.

mod log;

pub use log::{BattleLogClient, DiffLog};

use bitflags::bitflags;

use crate::action::ActionRef;
use crate::effect::{Effect, EffectKind};
use crate::error::{DiffOutcome, SkipReason};
use crate::geometry::{Placement, Target};
use crate::state::{
    AttributeKind, AttributeModifier, Battle, BattleOutcome, Drone, DroneId, EffectId,
    EquipmentId, FleetId, Ship, ShipId, SlotType, ValueKind,
};

bitflags! {
    /// Coarse classification of diffs, used to route them to subscribers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DiffKinds: u16 {
        const SHIP_CHANGE      = 1 << 0;
        const DAMAGE           = 1 << 1;
        const MOVE             = 1 << 2;
        const ATTRIBUTE_CHANGE = 1 << 3;
        const VALUE_CHANGE     = 1 << 4;
        const EFFECT           = 1 << 5;
        const ACTION           = 1 << 6;
        const DRONE            = 1 << 7;
        const BATTLE_END       = 1 << 8;
    }
}

/// One atomic, reversible change to a [`Battle`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattleDiff {
    /// Records the outcome, and wears every living ship's equipment by the
    /// number of elapsed cycles.
    EndBattle {
        winner: Option<FleetId>,
        cycle: u32,
    },
    /// Passes the turn from `ship` to `new_ship`.
    ShipChange {
        ship: ShipId,
        new_ship: ShipId,
        cycle_diff: i32,
    },
    /// Raw delta on a bounded value. Bounds are enforced by the checker.
    ShipValue {
        ship: ShipId,
        value: ValueKind,
        delta: i32,
    },
    ShipAttribute {
        ship: ShipId,
        attribute: AttributeKind,
        added: AttributeModifier,
        removed: AttributeModifier,
        /// Pull-down of the bounded value when a capacity tightens.
        value_delta: i32,
    },
    /// Damage bookkeeping (equipment wear, statistics). The value changes
    /// themselves are separate [`BattleDiff::ShipValue`] entries.
    ShipDamage {
        ship: ShipId,
        hull: i32,
        shield: i32,
        theoretical: i32,
    },
    /// Removes a ship from the play order, keeping it in the roster.
    ShipDeath {
        ship: ShipId,
        /// Play order position, for re-insertion on revert.
        index: usize,
    },
    ShipEffectAdded {
        ship: ShipId,
        effect: Effect,
    },
    ShipEffectRemoved {
        ship: ShipId,
        effect: Effect,
    },
    /// Adjusts the remaining duration of a sticky entry.
    ShipEffectChanged {
        ship: ShipId,
        effect: EffectId,
        duration_delta: i32,
    },
    /// Dissipates `heat` cooling steps on one equipment.
    ShipCooldown {
        ship: ShipId,
        equipment: EquipmentId,
        heat: u32,
    },
    ShipActionUsed {
        ship: ShipId,
        action: ActionRef,
        target: Target,
    },
    ShipActionToggled {
        ship: ShipId,
        equipment: EquipmentId,
        activated: bool,
    },
    /// Marker closing the diffs of one resolved action.
    ShipActionEnded {
        ship: ShipId,
        action: ActionRef,
        target: Target,
    },
    ShipMove {
        ship: ShipId,
        start: Placement,
        end: Placement,
    },
    ShipVigilanceTriggered {
        ship: ShipId,
        equipment: EquipmentId,
        delta: i32,
    },
    DroneDeployed {
        drone: Drone,
    },
    DroneDestroyed {
        drone: Drone,
    },
    /// Coverage and lifetime update of a drone.
    DroneApplied {
        drone: DroneId,
        entered: Vec<ShipId>,
        left: Vec<ShipId>,
        duration_delta: i32,
    },
}

impl BattleDiff {
    pub fn kinds(&self) -> DiffKinds {
        match self {
            Self::EndBattle { .. } => DiffKinds::BATTLE_END,
            Self::ShipChange { .. } => DiffKinds::SHIP_CHANGE,
            Self::ShipValue { .. } => DiffKinds::VALUE_CHANGE,
            Self::ShipAttribute { value_delta, .. } => {
                if *value_delta != 0 {
                    DiffKinds::ATTRIBUTE_CHANGE | DiffKinds::VALUE_CHANGE
                } else {
                    DiffKinds::ATTRIBUTE_CHANGE
                }
            }
            Self::ShipDamage { .. } | Self::ShipDeath { .. } => DiffKinds::DAMAGE,
            Self::ShipEffectAdded { .. }
            | Self::ShipEffectRemoved { .. }
            | Self::ShipEffectChanged { .. } => DiffKinds::EFFECT,
            Self::ShipCooldown { .. }
            | Self::ShipActionUsed { .. }
            | Self::ShipActionToggled { .. }
            | Self::ShipActionEnded { .. }
            | Self::ShipVigilanceTriggered { .. } => DiffKinds::ACTION,
            Self::ShipMove { .. } => DiffKinds::MOVE,
            Self::DroneDeployed { .. } | Self::DroneDestroyed { .. } | Self::DroneApplied { .. } => {
                DiffKinds::DRONE
            }
        }
    }

    /// Ship this diff is about, if any. Drone lifecycle diffs report the
    /// drone owner.
    pub fn ship(&self) -> Option<ShipId> {
        match self {
            Self::EndBattle { .. } | Self::DroneApplied { .. } => None,
            Self::DroneDeployed { drone } | Self::DroneDestroyed { drone } => Some(drone.owner),
            Self::ShipChange { ship, .. }
            | Self::ShipValue { ship, .. }
            | Self::ShipAttribute { ship, .. }
            | Self::ShipDamage { ship, .. }
            | Self::ShipDeath { ship, .. }
            | Self::ShipEffectAdded { ship, .. }
            | Self::ShipEffectRemoved { ship, .. }
            | Self::ShipEffectChanged { ship, .. }
            | Self::ShipCooldown { ship, .. }
            | Self::ShipActionUsed { ship, .. }
            | Self::ShipActionToggled { ship, .. }
            | Self::ShipActionEnded { ship, .. }
            | Self::ShipMove { ship, .. }
            | Self::ShipVigilanceTriggered { ship, .. } => Some(*ship),
        }
    }

    pub const fn is_action_used(&self) -> bool {
        matches!(self, Self::ShipActionUsed { .. })
    }

    /// The inverse diff, for variants that have one.
    ///
    /// The remaining variants lose information when applied (wear, cleared
    /// heat, play order position) and revert in place instead.
    pub fn reverse(&self) -> Option<BattleDiff> {
        let reverse = match self {
            Self::ShipChange {
                ship,
                new_ship,
                cycle_diff,
            } => Self::ShipChange {
                ship: *new_ship,
                new_ship: *ship,
                cycle_diff: -cycle_diff,
            },
            Self::ShipValue { ship, value, delta } => Self::ShipValue {
                ship: *ship,
                value: *value,
                delta: -delta,
            },
            Self::ShipAttribute {
                ship,
                attribute,
                added,
                removed,
                value_delta,
            } => Self::ShipAttribute {
                ship: *ship,
                attribute: *attribute,
                added: *removed,
                removed: *added,
                value_delta: -value_delta,
            },
            Self::ShipEffectAdded { ship, effect } => Self::ShipEffectRemoved {
                ship: *ship,
                effect: effect.clone(),
            },
            Self::ShipEffectRemoved { ship, effect } => Self::ShipEffectAdded {
                ship: *ship,
                effect: effect.clone(),
            },
            Self::ShipEffectChanged {
                ship,
                effect,
                duration_delta,
            } => Self::ShipEffectChanged {
                ship: *ship,
                effect: *effect,
                duration_delta: -duration_delta,
            },
            Self::ShipActionToggled {
                ship,
                equipment,
                activated,
            } => Self::ShipActionToggled {
                ship: *ship,
                equipment: *equipment,
                activated: !activated,
            },
            Self::ShipMove { ship, start, end } => Self::ShipMove {
                ship: *ship,
                start: *end,
                end: *start,
            },
            Self::ShipVigilanceTriggered {
                ship,
                equipment,
                delta,
            } => Self::ShipVigilanceTriggered {
                ship: *ship,
                equipment: *equipment,
                delta: -delta,
            },
            Self::DroneDeployed { drone } => Self::DroneDestroyed {
                drone: drone.clone(),
            },
            Self::DroneDestroyed { drone } => Self::DroneDeployed {
                drone: drone.clone(),
            },
            Self::DroneApplied {
                drone,
                entered,
                left,
                duration_delta,
            } => Self::DroneApplied {
                drone: *drone,
                entered: left.clone(),
                left: entered.clone(),
                duration_delta: -duration_delta,
            },
            Self::EndBattle { .. }
            | Self::ShipDamage { .. }
            | Self::ShipDeath { .. }
            | Self::ShipCooldown { .. }
            | Self::ShipActionUsed { .. }
            | Self::ShipActionEnded { .. } => return None,
        };
        Some(reverse)
    }

    // ========================================================================
    // Apply
    // ========================================================================

    pub fn apply(&self, battle: &mut Battle) -> DiffOutcome {
        match self {
            Self::EndBattle { winner, cycle } => {
                battle.outcome = Some(BattleOutcome {
                    winner: *winner,
                    cycle: *cycle,
                });
                wear_living_equipment(battle, *cycle, true);
                DiffOutcome::Applied
            }
            Self::ShipChange {
                new_ship,
                cycle_diff,
                ..
            } => {
                if battle.ship(*new_ship).is_none() {
                    return stale(self, "ship");
                }
                battle.playing = Some(*new_ship);
                battle.cycle = offset(battle.cycle, *cycle_diff);
                DiffOutcome::Applied
            }
            Self::ShipValue { ship, value, delta } => on_ship(battle, *ship, self, |ship| {
                ship.values.get_mut(*value).add_raw(*delta);
                DiffOutcome::Applied
            }),
            Self::ShipAttribute {
                ship,
                attribute,
                added,
                removed,
                value_delta,
            } => on_ship(battle, *ship, self, |ship| {
                change_attribute(ship, *attribute, added, removed, *value_delta)
            }),
            Self::ShipDamage {
                ship, hull, shield, ..
            } => on_ship(battle, *ship, self, |ship| {
                wear_from_damage(ship, *hull, *shield, true);
                DiffOutcome::Applied
            }),
            Self::ShipDeath { ship, .. } => {
                let Some(position) = battle.play_order.iter().position(|id| id == ship) else {
                    return violation(self, "dying ship is not in the play order");
                };
                let Some(target) = battle.ship_mut(*ship) else {
                    return stale(self, "ship");
                };
                target.alive = false;
                battle.play_order.remove(position);
                DiffOutcome::Applied
            }
            Self::ShipEffectAdded { ship, effect } => on_ship(battle, *ship, self, |ship| {
                if ship.active_effects.insert(effect.clone()) {
                    DiffOutcome::Applied
                } else {
                    violation(self, "effect entry already present")
                }
            }),
            Self::ShipEffectRemoved { ship, effect } => on_ship(battle, *ship, self, |ship| {
                if ship.active_effects.remove(effect.id).is_some() {
                    DiffOutcome::Applied
                } else {
                    stale(self, "effect entry")
                }
            }),
            Self::ShipEffectChanged {
                ship,
                effect,
                duration_delta,
            } => on_ship(battle, *ship, self, |ship| {
                let Some(entry) = ship.active_effects.get_mut(*effect) else {
                    return stale(self, "effect entry");
                };
                match &mut entry.kind {
                    EffectKind::Sticky { duration, .. } => {
                        *duration = offset(*duration, *duration_delta);
                        DiffOutcome::Applied
                    }
                    _ => violation(self, "duration change on a non-sticky effect"),
                }
            }),
            Self::ShipCooldown {
                ship,
                equipment,
                heat,
            } => on_ship(battle, *ship, self, |ship| {
                let Some(equipment) = ship.equipment_mut(*equipment) else {
                    return stale(self, "equipment");
                };
                if equipment.cooldown.heat < *heat {
                    return violation(self, "cooling more than the current heat");
                }
                equipment.cooldown.cool(*heat);
                DiffOutcome::Applied
            }),
            Self::ShipActionUsed { ship, action, .. } => on_ship(battle, *ship, self, |ship| {
                let ActionRef::Equipment(id) = action else {
                    return DiffOutcome::Applied;
                };
                let Some(equipment) = ship.equipment_mut(*id) else {
                    return stale(self, "equipment");
                };
                if !equipment.cooldown.can_use() {
                    return violation(self, "action used while overheated");
                }
                equipment.cooldown.use_once();
                equipment.wear += 1;
                wear_slot(ship, SlotType::Power, 1, true);
                DiffOutcome::Applied
            }),
            Self::ShipActionToggled {
                ship,
                equipment,
                activated,
            } => on_ship(battle, *ship, self, |ship| {
                let Some(equipment) = ship.equipment_mut(*equipment) else {
                    return stale(self, "equipment");
                };
                equipment.activated = *activated;
                DiffOutcome::Applied
            }),
            Self::ShipActionEnded { .. } => DiffOutcome::Applied,
            Self::ShipMove { ship, end, .. } => on_ship(battle, *ship, self, |ship| {
                ship.placement = *end;
                DiffOutcome::Applied
            }),
            Self::ShipVigilanceTriggered {
                ship,
                equipment,
                delta,
            } => on_ship(battle, *ship, self, |ship| {
                let Some(equipment) = ship.equipment_mut(*equipment) else {
                    return stale(self, "equipment");
                };
                equipment.intruders = offset(equipment.intruders, *delta);
                DiffOutcome::Applied
            }),
            Self::DroneDeployed { drone } => {
                if battle.drones.contains_key(&drone.id) {
                    return violation(self, "drone id already deployed");
                }
                battle.drones.insert(drone.id, drone.clone());
                DiffOutcome::Applied
            }
            Self::DroneDestroyed { drone } => match battle.drones.remove(&drone.id) {
                Some(_) => DiffOutcome::Applied,
                None => stale(self, "drone"),
            },
            Self::DroneApplied {
                drone,
                entered,
                left,
                duration_delta,
            } => {
                let Some(target) = battle.drones.get_mut(drone) else {
                    return stale(self, "drone");
                };
                target.inside.extend(entered.iter().copied());
                for ship in left {
                    target.inside.remove(ship);
                }
                target.duration = offset(target.duration, *duration_delta);
                DiffOutcome::Applied
            }
        }
    }

    // ========================================================================
    // Revert
    // ========================================================================

    pub fn revert(&self, battle: &mut Battle) -> DiffOutcome {
        if let Some(reverse) = self.reverse() {
            return reverse.apply(battle);
        }

        match self {
            Self::EndBattle { cycle, .. } => {
                battle.outcome = None;
                wear_living_equipment(battle, *cycle, false);
                DiffOutcome::Applied
            }
            Self::ShipDamage {
                ship, hull, shield, ..
            } => on_ship(battle, *ship, self, |ship| {
                wear_from_damage(ship, *hull, *shield, false);
                DiffOutcome::Applied
            }),
            Self::ShipDeath { ship, index } => {
                if battle.play_order.contains(ship) {
                    return violation(self, "revived ship already in the play order");
                }
                let Some(target) = battle.ship_mut(*ship) else {
                    return stale(self, "ship");
                };
                target.alive = true;
                let index = (*index).min(battle.play_order.len());
                battle.play_order.insert(index, *ship);
                DiffOutcome::Applied
            }
            Self::ShipCooldown {
                ship,
                equipment,
                heat,
            } => on_ship(battle, *ship, self, |ship| {
                let Some(equipment) = ship.equipment_mut(*equipment) else {
                    return stale(self, "equipment");
                };
                let cooldown = &mut equipment.cooldown;
                if cooldown.heat == 0 {
                    cooldown.uses = cooldown.overheat;
                }
                cooldown.heat += heat;
                DiffOutcome::Applied
            }),
            Self::ShipActionUsed { ship, action, .. } => on_ship(battle, *ship, self, |ship| {
                let ActionRef::Equipment(id) = action else {
                    return DiffOutcome::Applied;
                };
                let Some(equipment) = ship.equipment_mut(*id) else {
                    return stale(self, "equipment");
                };
                equipment.cooldown.unuse_once();
                equipment.wear = equipment.wear.saturating_sub(1);
                wear_slot(ship, SlotType::Power, 1, false);
                DiffOutcome::Applied
            }),
            Self::ShipActionEnded { .. } => DiffOutcome::Applied,
            _ => violation(self, "no in-place revert for a reversible diff"),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn on_ship(
    battle: &mut Battle,
    ship: ShipId,
    diff: &BattleDiff,
    f: impl FnOnce(&mut Ship) -> DiffOutcome,
) -> DiffOutcome {
    match battle.ship_mut(ship) {
        Some(target) => f(target),
        None => stale(diff, "ship"),
    }
}

fn stale(diff: &BattleDiff, missing: &'static str) -> DiffOutcome {
    tracing::warn!(?diff, missing, "diff references a missing entity, skipped");
    DiffOutcome::Skipped(SkipReason::StaleReference)
}

fn violation(diff: &BattleDiff, reason: &'static str) -> DiffOutcome {
    tracing::error!(?diff, reason, "diff does not match battle state, skipped");
    DiffOutcome::Skipped(SkipReason::InvariantViolation)
}

fn offset(value: u32, delta: i32) -> u32 {
    value.saturating_add_signed(delta)
}

fn change_attribute(
    ship: &mut Ship,
    kind: AttributeKind,
    added: &AttributeModifier,
    removed: &AttributeModifier,
    value_delta: i32,
) -> DiffOutcome {
    let mut attribute = ship.attributes.get(kind).clone();
    attribute.add_modifier(added);
    if !attribute.remove_modifier(removed) {
        tracing::error!(ship = %ship.id, ?kind, ?removed, "removing an unknown attribute modifier");
        return DiffOutcome::Skipped(SkipReason::InvariantViolation);
    }
    *ship.attributes.get_mut(kind) = attribute;
    ship.sync_maximums();
    if let Some(value) = value_kind_of(kind) {
        ship.values.get_mut(value).add_raw(value_delta);
    }
    DiffOutcome::Applied
}

fn value_kind_of(attribute: AttributeKind) -> Option<ValueKind> {
    [ValueKind::Hull, ValueKind::Shield, ValueKind::Power]
        .into_iter()
        .find(|value| value.capacity() == attribute)
}

fn wear_slot(ship: &mut Ship, slot: SlotType, amount: u32, add: bool) {
    for equipment in ship.equipment.iter_mut().filter(|e| e.slot == slot) {
        equipment.wear = if add {
            equipment.wear + amount
        } else {
            equipment.wear.saturating_sub(amount)
        };
    }
}

/// One wear point per started 100 damage absorbed by the slot.
fn wear_from_damage(ship: &mut Ship, hull: i32, shield: i32, add: bool) {
    let wear = |damage: i32| (damage.max(0) as u32).div_ceil(100);
    if shield > 0 {
        wear_slot(ship, SlotType::Shield, wear(shield), add);
    }
    if hull > 0 {
        wear_slot(ship, SlotType::Hull, wear(hull), add);
    }
}

fn wear_living_equipment(battle: &mut Battle, cycles: u32, add: bool) {
    for ship in battle.ships.values_mut().filter(|ship| ship.alive) {
        for equipment in &mut ship.equipment {
            equipment.wear = if add {
                equipment.wear + cycles
            } else {
                equipment.wear.saturating_sub(cycles)
            };
        }
    }
}
