//! Maneuver evaluators.
//!
//! Each evaluator scores one aspect of a maneuver, roughly in [-1, 1]. The
//! agent sums them, each scaled by its weight.

use tactics_core::{ActionKind, ActionRef, AttributeKind, BattleDiff, Ship, ValueKind};

use super::maneuver::{Maneuver, SearchContext};

pub type EvaluatorFn = fn(&SearchContext<'_>, &Maneuver) -> f64;

/// An evaluator and its weight in the total score.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
    pub name: &'static str,
    pub weight: f64,
    pub score: EvaluatorFn,
}

impl Evaluator {
    pub const fn new(name: &'static str, weight: f64, score: EvaluatorFn) -> Self {
        Self {
            name,
            weight,
            score,
        }
    }

    pub fn evaluate(&self, ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
        self.weight * (self.score)(ctx, maneuver)
    }
}

pub fn defaults() -> Vec<Evaluator> {
    vec![
        Evaluator::new("turn_cost", 1.0, turn_cost),
        Evaluator::new("overheat", 3.0, overheat),
        Evaluator::new("enemy_health", 5.0, enemy_health),
        Evaluator::new("ally_health", 20.0, ally_health),
        Evaluator::new("active_effects", 3.0, active_effects),
        Evaluator::new("clustering", 4.0, clustering),
        Evaluator::new("position", 0.5, position),
        Evaluator::new("idling", 2.0, idling),
    ]
}

fn power_capacity(ship: &Ship) -> f64 {
    f64::from(ship.attribute(AttributeKind::PowerCapacity).max(1))
}

/// Power left after the maneuver, relative to capacity. Maneuvers using no
/// power or more than is left score -1.
pub fn turn_cost(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    let ship = ctx.ship;
    let usage = maneuver.power_usage();
    let power = ship.value(ValueKind::Power);
    if usage == 0 {
        -1.0
    } else if maneuver.simulation.total_fire_power > ship.attribute(AttributeKind::PowerCapacity) {
        f64::NEG_INFINITY
    } else if usage > power {
        -1.0
    } else {
        f64::from(power - usage) / power_capacity(ship)
    }
}

/// Penalty for overheating the used equipment, growing with its cooling time.
pub fn overheat(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    let ActionRef::Equipment(id) = maneuver.action else {
        return 0.0;
    };
    match ctx.ship.equipment(id) {
        Some(equipment) if equipment.cooldown.will_overheat() => {
            -(0.4 * f64::from(equipment.cooldown.cooling)).min(1.0)
        }
        _ => 0.0,
    }
}

/// Health change of a ship in [-1, 1], -1 when it dies.
fn proportional_health(before: &Ship, maneuver: &Maneuver) -> f64 {
    let Some(after) = maneuver.predicted.ship(before.id) else {
        return 0.0;
    };
    if !after.alive || after.value(ValueKind::Hull) <= 0 {
        return -1.0;
    }
    let total = |ship: &Ship| ship.value(ValueKind::Hull) + ship.value(ValueKind::Shield);
    let reference = total(before);
    if reference <= 0 {
        return 0.0;
    }
    (f64::from(total(after) - reference) / f64::from(reference)).clamp(-1.0, 1.0)
}

fn health_effect<'s>(maneuver: &Maneuver, ships: impl Iterator<Item = &'s Ship>) -> f64 {
    let (mut count, mut sum, mut deaths) = (0usize, 0.0, 0.0);
    for ship in ships {
        let change = proportional_health(ship, maneuver);
        count += 1;
        sum += change;
        if change == -1.0 {
            deaths += 1.0;
        }
    }
    if count == 0 {
        0.0
    } else {
        (sum * 0.5 - deaths * 0.5) / count as f64
    }
}

pub fn enemy_health(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    -health_effect(maneuver, ctx.battle.enemies_of(ctx.ship.id))
}

pub fn ally_health(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    health_effect(maneuver, ctx.battle.allies_of(ctx.ship.id))
}

/// Effects gained by allies or lost by enemies count up, the opposite counts
/// down. Normalized by the number of ships.
pub fn active_effects(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    let battle = ctx.battle;
    let mut result = 0i32;
    for diff in maneuver.effects() {
        let (ship, effect, added) = match diff {
            BattleDiff::ShipEffectAdded { ship, effect } => (*ship, effect, true),
            BattleDiff::ShipEffectRemoved { ship, effect } => (*ship, effect, false),
            _ => continue,
        };
        let enemy = battle.are_enemies(ctx.ship.id, ship);
        let good = effect.is_beneficial() == added;
        result += if good != enemy { 1 } else { -1 };
    }
    let ships = battle.ships.len().max(1) as f64;
    (f64::from(result) / ships).clamp(-1.0, 1.0)
}

/// Penalty for ending close to other ships.
pub fn clustering(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    let battle = ctx.battle;
    let location = maneuver.final_location(ctx.ship);
    let factor = battle.config.width.max(battle.config.height) * 0.01;
    let mut others = battle
        .living_ships()
        .filter(|ship| ship.id != ctx.ship.id)
        .peekable();
    if others.peek().is_none() {
        return 0.0;
    }
    let crowd: f64 = others
        .map(|ship| factor / ship.location().distance_to(location))
        .sum();
    -crowd.clamp(0.0, 1.0)
}

/// Prefers the middle of the arena over its edges.
pub fn position(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    let config = &ctx.battle.config;
    let location = maneuver.final_location(ctx.ship);
    let distance = location
        .x
        .min(location.y)
        .min(config.width - location.x)
        .min(config.height - location.y);
    let factor = (config.width / 2.0).min(config.height / 2.0);
    -1.0 + 2.0 * distance / factor
}

/// Penalty for leaving power unused.
pub fn idling(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
    let ship = ctx.ship;
    let capacity = power_capacity(ship);
    let power = f64::from(ship.value(ValueKind::Power));
    let ActionRef::Equipment(id) = maneuver.action else {
        return -power / capacity;
    };
    let Some(equipment) = ship.equipment(id) else {
        return 0.0;
    };
    match &equipment.action {
        Some(ActionKind::FireWeapon(_)) => 0.5,
        Some(ActionKind::Toggle(_) | ActionKind::Vigilance(_)) => {
            if equipment.activated {
                -0.2
            } else {
                0.5
            }
        }
        Some(ActionKind::Move(_)) => -(power - f64::from(maneuver.power_usage())) / capacity,
        Some(ActionKind::DeployDrone(_)) | None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::tests::{GUN, RNG, skirmish};
    use tactics_core::{ShipId, Target};

    fn shot(distance: f64) -> (tactics_core::Battle, Target) {
        let battle = skirmish(distance);
        let target = Target::ship(battle.ship(ShipId(2)).unwrap());
        (battle, target)
    }

    #[test]
    fn turn_cost_rewards_leftover_power() {
        let (battle, target) = shot(500.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let fire = Maneuver::new(&ctx, ActionRef::Equipment(GUN), target).unwrap();
        assert!((turn_cost(&ctx, &fire) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn damaging_enemies_scores_positive() {
        let (battle, target) = shot(500.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let fire = Maneuver::new(&ctx, ActionRef::Equipment(GUN), target).unwrap();
        // 50 out of 550 health: half of -50/550.
        let expected = 0.5 * 50.0 / 550.0;
        assert!((enemy_health(&ctx, &fire) - expected).abs() < 1e-9);
        assert_eq!(ally_health(&ctx, &fire), 0.0);
    }

    #[test]
    fn ending_turn_with_full_power_idles() {
        let (battle, _) = shot(500.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let end = Maneuver::new(&ctx, ActionRef::EndTurn, Target::ship(ctx.ship)).unwrap();
        assert_eq!(idling(&ctx, &end), -1.0);
    }

    #[test]
    fn arena_center_is_the_best_position() {
        let (battle, _) = shot(500.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let mut end = Maneuver::new(&ctx, ActionRef::EndTurn, Target::ship(ctx.ship)).unwrap();
        end.simulation.need_move = true;
        end.simulation.move_location =
            tactics_core::Location::new(battle.config.width / 2.0, battle.config.height / 2.0);
        assert!((position(&ctx, &end) - 1.0).abs() < 1e-9);
        end.simulation.move_location = tactics_core::Location::new(0.0, 300.0);
        assert_eq!(position(&ctx, &end), -1.0);
    }
}
