//! Consistency checks run after every resolved action.
//!
//! Each check is a pure scan returning corrective diffs. They are idempotent:
//! once their diffs are applied, running them again returns nothing. The
//! engine applies them one group at a time, in this order, until the battle
//! is stable:
//!
//! 1. area effects (auras, vigilance watches, drone coverage)
//! 2. value bounds
//! 3. deaths (never the playing ship)
//! 4. victory
//!
//! Area effects go first so that a ship entering a damaging aura on the same
//! pass is hit before deaths are counted.

use std::collections::BTreeSet;

use strum::IntoEnumIterator;

use crate::action::{ActionKind, toggle};
use crate::diff::BattleDiff;
use crate::effect::{Effect, EffectContext, EffectSource};
use crate::rng::RngOracle;
use crate::state::{Battle, Ship, ValueKind};

/// Next group of corrective diffs, empty once the battle is consistent.
pub fn next_corrections(battle: &Battle, rng: &dyn RngOracle) -> Vec<BattleDiff> {
    if battle.is_ended() {
        return Vec::new();
    }
    let area = check_area_effects(battle, rng);
    if !area.is_empty() {
        return area;
    }
    let values = check_values(battle);
    if !values.is_empty() {
        return values;
    }
    let deaths = check_deaths(battle);
    if !deaths.is_empty() {
        return deaths;
    }
    check_victory(battle)
}

// ============================================================================
// Area effects
// ============================================================================

/// Payloads that should currently be active on `ship`, first source first.
pub fn expected_area_effects(battle: &Battle, ship: &Ship) -> Vec<(EffectSource, Effect)> {
    let mut expected: Vec<(EffectSource, Effect)> = Vec::new();
    let mut push = |source: EffectSource, effect: &Effect| {
        if expected.iter().all(|(_, known)| known.id != effect.id) {
            expected.push((source, effect.clone()));
        }
    };

    for owner in battle.living_ships() {
        for equipment in owner.toggled() {
            match &equipment.action {
                Some(ActionKind::Toggle(aura)) => {
                    let covered = if aura.radius <= 0.0 {
                        owner.id == ship.id
                    } else {
                        ship.is_in_circle(owner.location(), aura.radius)
                    };
                    if covered {
                        for effect in &aura.effects {
                            push(EffectSource::Ship(owner.id), effect);
                        }
                    }
                }
                Some(ActionKind::Vigilance(vigilance)) => {
                    if battle.are_enemies(owner.id, ship.id)
                        && ship.is_in_circle(owner.location(), vigilance.radius)
                    {
                        let watch = toggle::watch_effect(equipment, vigilance);
                        push(EffectSource::Ship(owner.id), &watch);
                    }
                }
                _ => {}
            }
        }
    }

    for drone in battle.drones.values() {
        if drone.covers(ship.location()) {
            for effect in &drone.effects {
                push(EffectSource::Drone(drone.id), effect);
            }
        }
    }
    expected
}

/// Reconciles area-managed entries with actual coverage, one ship at a time,
/// then updates drone coverage bookkeeping.
pub fn check_area_effects(battle: &Battle, rng: &dyn RngOracle) -> Vec<BattleDiff> {
    let ctx = EffectContext::new(battle, rng);

    for ship in battle.living_ships() {
        let expected = expected_area_effects(battle, ship);
        let mut diffs = Vec::new();

        // Non-sticky entries only exist through area coverage.
        for entry in ship.active_effects.iter() {
            let still_covered = expected.iter().any(|(_, effect)| effect.id == entry.id);
            if !entry.kind.is_sticky() && !still_covered {
                diffs.extend(toggle::leave_diffs(&ctx, ship, entry));
            }
        }

        for (source, effect) in &expected {
            if !ship.active_effects.contains(effect.id) {
                diffs.extend(toggle::enter_diffs(&ctx, ship, effect, *source));
            }
        }

        if !diffs.is_empty() {
            tracing::debug!(ship = %ship.id, diffs = diffs.len(), "area effects reconciled");
            return diffs;
        }
    }

    battle
        .drones
        .values()
        .filter_map(|drone| {
            let covered: BTreeSet<_> = battle
                .living_ships()
                .filter(|ship| drone.covers(ship.location()))
                .map(|ship| ship.id)
                .collect();
            let entered: Vec<_> = covered.difference(&drone.inside).copied().collect();
            let left: Vec<_> = drone.inside.difference(&covered).copied().collect();
            (!entered.is_empty() || !left.is_empty()).then_some(BattleDiff::DroneApplied {
                drone: drone.id,
                entered,
                left,
                duration_delta: 0,
            })
        })
        .collect()
}

// ============================================================================
// Values, deaths, victory
// ============================================================================

/// One correction per value outside its bounds.
pub fn check_values(battle: &Battle) -> Vec<BattleDiff> {
    battle
        .ships()
        .flat_map(|ship| {
            ValueKind::iter().filter_map(move |kind| {
                ship.bounded(kind)
                    .correction()
                    .map(|delta| BattleDiff::ShipValue {
                        ship: ship.id,
                        value: kind,
                        delta,
                    })
            })
        })
        .collect()
}

/// Kills the first living ship out of hull, skipping the playing one: it
/// finishes its turn and dies on a later pass.
pub fn check_deaths(battle: &Battle) -> Vec<BattleDiff> {
    let dying = battle.living_ships().find(|ship| {
        !battle.is_playing(ship.id) && ship.value(ValueKind::Hull) <= 0
    });
    let Some(ship) = dying else {
        return Vec::new();
    };
    let Some(index) = battle.play_order.iter().position(|id| *id == ship.id) else {
        tracing::error!(ship = %ship.id, "living ship missing from the play order");
        return Vec::new();
    };

    let mut diffs: Vec<BattleDiff> = ValueKind::iter()
        .flat_map(|kind| ship.value_diffs(kind, 0, false))
        .collect();
    diffs.push(BattleDiff::ShipDeath {
        ship: ship.id,
        index,
    });
    tracing::info!(ship = %ship.id, name = %ship.name, "ship destroyed");
    diffs
}

/// Ends the battle once at most one fleet has living ships (none is a draw).
pub fn check_victory(battle: &Battle) -> Vec<BattleDiff> {
    if battle.is_ended() || battle.fleets.len() < 2 {
        return Vec::new();
    }
    let alive: Vec<_> = battle
        .fleets
        .iter()
        .filter(|fleet| battle.fleet_is_alive(fleet.id))
        .collect();
    if alive.len() > 1 {
        return Vec::new();
    }

    let winner = match alive.as_slice() {
        [single] => Some(single.id),
        _ => None,
    };
    tracing::info!(?winner, cycle = battle.cycle, "battle ended");
    vec![BattleDiff::EndBattle {
        winner,
        cycle: battle.cycle,
    }]
}
