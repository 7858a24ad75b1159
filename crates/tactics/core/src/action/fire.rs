use crate::diff::BattleDiff;
use crate::effect::{EffectContext, EffectSource};
use crate::geometry::{Placement, Target};
use crate::rng::RngOracle;
use crate::state::{Battle, Ship, ShipId};

use super::FireWeapon;

/// Seed context for the weapon magnitude roll.
const FIRE_CONTEXT: u32 = 0xf1e;

/// Below this distance the firing ship does not turn to face the target.
const FACING_EPSILON: f64 = 1e-6;

/// Nearest living enemy for harmful weapons, nearest ally otherwise.
pub(super) fn default_target(battle: &Battle, ship: &Ship, weapon: &FireWeapon) -> Target {
    if weapon.range <= 0.0 {
        return Target::ship(ship);
    }
    let location = ship.location();
    battle
        .living_ships()
        .filter(|other| other.id != ship.id)
        .filter(|other| is_fitting_target(battle, ship, weapon, other.id))
        .min_by(|a, b| {
            a.location()
                .distance_to(location)
                .total_cmp(&b.location().distance_to(location))
        })
        .map_or_else(|| Target::ship(ship), Target::ship)
}

fn is_harmful(weapon: &FireWeapon) -> bool {
    weapon.effects.iter().any(|effect| !effect.is_beneficial())
}

/// Harmful weapons aim at living enemies, purely beneficial ones at living
/// allies.
fn is_fitting_target(battle: &Battle, ship: &Ship, weapon: &FireWeapon, other: ShipId) -> bool {
    battle.ship(other).is_some_and(|other| other.alive)
        && battle.are_enemies(ship.id, other) == is_harmful(weapon)
}

/// Ship targets must be another ship whose side fits the weapon. Blast
/// weapons fired at a ship aim at its location, clamped into range.
pub(super) fn check_target(
    battle: &Battle,
    ship: &Ship,
    weapon: &FireWeapon,
    target: &Target,
) -> Option<Target> {
    let origin = ship.location();
    match target.ship_id() {
        Some(id) if weapon.range > 0.0 && id == ship.id => None,
        Some(id) if weapon.range <= 0.0 => (id == ship.id).then_some(*target),
        Some(id) if !is_fitting_target(battle, ship, weapon, id) => None,
        Some(_) if weapon.blast > 0.0 => {
            Some(target.as_location().constrained_in_range(origin, weapon.range))
        }
        Some(_) => target.is_in_range(origin, weapon.range).then_some(*target),
        None if weapon.blast > 0.0 => Some(target.constrained_in_range(origin, weapon.range)),
        None => None,
    }
}

pub(super) fn impacted_ships(battle: &Battle, weapon: &FireWeapon, target: &Target) -> Vec<ShipId> {
    if weapon.blast > 0.0 {
        battle
            .ships_in_circle(target.location(), weapon.blast)
            .map(|ship| ship.id)
            .collect()
    } else {
        target
            .ship_id()
            .filter(|id| battle.ship(*id).is_some_and(|ship| ship.alive))
            .into_iter()
            .collect()
    }
}

pub(super) fn diffs(
    battle: &Battle,
    ship: &Ship,
    weapon: &FireWeapon,
    target: &Target,
    rng: &dyn RngOracle,
) -> Vec<BattleDiff> {
    let mut diffs = Vec::new();

    let origin = ship.location();
    if target.distance_to(origin) > FACING_EPSILON {
        let angle = origin.angle_to(target.location());
        if angle != ship.placement.angle {
            diffs.push(BattleDiff::ShipMove {
                ship: ship.id,
                start: ship.placement,
                end: Placement::new(ship.placement.x, ship.placement.y, angle),
            });
        }
    }

    let ctx = EffectContext::new(battle, rng);
    let magnitude = rng.unit(battle.roll_seed(ship.id.0, FIRE_CONTEXT));
    for id in impacted_ships(battle, weapon, target) {
        let Some(victim) = battle.ship(id) else {
            continue;
        };
        for effect in &weapon.effects {
            diffs.extend(effect.on_diffs(&ctx, victim, EffectSource::Ship(ship.id), magnitude));
        }
    }
    diffs
}
