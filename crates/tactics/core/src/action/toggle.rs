//! Toggle and vigilance resolution.

use crate::diff::BattleDiff;
use crate::effect::{Effect, EffectContext, EffectKind, EffectSource};
use crate::rng::RngOracle;
use crate::state::{Battle, Equipment, Ship, ShipId};

use super::{Toggle, Vigilance};

/// Ships covered by an aura of `radius` around `owner` (the owner alone for
/// a zero radius).
pub(crate) fn covered_ships(battle: &Battle, owner: &Ship, radius: f64) -> Vec<ShipId> {
    if radius <= 0.0 {
        return vec![owner.id];
    }
    battle
        .ships_in_circle(owner.location(), radius)
        .map(|ship| ship.id)
        .collect()
}

/// Diffs for a payload entering a ship: sticky effects register their own
/// entry, the others get one added here.
pub(crate) fn enter_diffs(
    ctx: &EffectContext<'_>,
    ship: &Ship,
    effect: &Effect,
    source: EffectSource,
) -> Vec<BattleDiff> {
    let mut diffs = Vec::new();
    if !effect.kind.is_sticky() {
        diffs.push(BattleDiff::ShipEffectAdded {
            ship: ship.id,
            effect: effect.clone(),
        });
    }
    diffs.extend(effect.on_diffs(ctx, ship, source, 0.0));
    diffs
}

/// Diffs removing a ship's current entry with the id of `effect`.
pub(crate) fn leave_diffs(ctx: &EffectContext<'_>, ship: &Ship, effect: &Effect) -> Vec<BattleDiff> {
    let Some(entry) = ship.active_effects.get(effect.id) else {
        return Vec::new();
    };
    let mut diffs = vec![BattleDiff::ShipEffectRemoved {
        ship: ship.id,
        effect: entry.clone(),
    }];
    diffs.extend(entry.off_diffs(ctx, ship));
    diffs
}

pub(super) fn toggle_diffs(
    battle: &Battle,
    ship: &Ship,
    equipment: &Equipment,
    toggle: &Toggle,
    rng: &dyn RngOracle,
) -> Vec<BattleDiff> {
    let ctx = EffectContext::new(battle, rng);
    let activate = !equipment.activated;
    let mut diffs = vec![BattleDiff::ShipActionToggled {
        ship: ship.id,
        equipment: equipment.id,
        activated: activate,
    }];

    for id in covered_ships(battle, ship, toggle.radius) {
        let Some(target) = battle.ship(id) else {
            continue;
        };
        for effect in &toggle.effects {
            if activate {
                if effect.kind.is_sticky() || !target.active_effects.contains(effect.id) {
                    diffs.extend(enter_diffs(&ctx, target, effect, EffectSource::Ship(ship.id)));
                }
            } else if !effect.kind.is_sticky() {
                diffs.extend(leave_diffs(&ctx, target, effect));
            }
        }
    }
    diffs
}

pub(super) fn vigilance_diffs(
    battle: &Battle,
    ship: &Ship,
    equipment: &Equipment,
    vigilance: &Vigilance,
) -> Vec<BattleDiff> {
    let activate = !equipment.activated;
    let mut diffs = vec![BattleDiff::ShipActionToggled {
        ship: ship.id,
        equipment: equipment.id,
        activated: activate,
    }];

    if activate {
        // Ships already inside are only registered, not hit.
        let watch = watch_effect(equipment, vigilance);
        diffs.extend(
            battle
                .ships_in_circle(ship.location(), vigilance.radius)
                .filter(|other| battle.are_enemies(ship.id, other.id))
                .filter(|other| !other.active_effects.contains(vigilance.watch))
                .map(|other| BattleDiff::ShipEffectAdded {
                    ship: other.id,
                    effect: watch.clone(),
                }),
        );
    } else {
        for other in battle.living_ships() {
            if let Some(entry) = other.active_effects.get(vigilance.watch) {
                if matches!(entry.kind, EffectKind::Watch { equipment: id } if id == equipment.id) {
                    diffs.push(BattleDiff::ShipEffectRemoved {
                        ship: other.id,
                        effect: entry.clone(),
                    });
                }
            }
        }
        if equipment.intruders > 0 {
            diffs.push(BattleDiff::ShipVigilanceTriggered {
                ship: ship.id,
                equipment: equipment.id,
                delta: -(equipment.intruders as i32),
            });
        }
    }
    diffs
}

pub(crate) fn watch_effect(equipment: &Equipment, vigilance: &Vigilance) -> Effect {
    Effect::new(
        vigilance.watch,
        EffectKind::Watch {
            equipment: equipment.id,
        },
    )
}
