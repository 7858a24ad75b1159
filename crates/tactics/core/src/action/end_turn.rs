use crate::diff::BattleDiff;
use crate::effect::{EffectContext, EffectSource};
use crate::rng::RngOracle;
use crate::state::{AttributeKind, Battle, Drone, Ship, ValueKind};

/// Seed context for drone payload rolls.
const DRONE_CONTEXT: u32 = 0xd7;

/// Negative when power gets recharged: ending a turn brings power back to
/// capacity, minus what the active toggles keep reserved.
pub(super) fn power_usage(ship: &Ship) -> i32 {
    let reserved: i32 = ship
        .toggled()
        .filter_map(|equipment| equipment.action.as_ref()?.toggle_power())
        .sum();
    ship.value(ValueKind::Power) + reserved - ship.attribute(AttributeKind::PowerCapacity)
}

pub(super) fn diffs(battle: &Battle, ship: &Ship, rng: &dyn RngOracle) -> Vec<BattleDiff> {
    if !battle.is_playing(ship.id) {
        return Vec::new();
    }
    let Some(next) = battle.next_ship() else {
        return Vec::new();
    };
    let ctx = EffectContext::new(battle, rng);
    let mut diffs = Vec::new();

    for equipment in ship.equipment.iter().filter(|e| e.cooldown.heat > 0) {
        diffs.push(BattleDiff::ShipCooldown {
            ship: ship.id,
            equipment: equipment.id,
            heat: 1,
        });
    }

    for effect in ship.active_effects.iter() {
        diffs.extend(effect.turn_end_diffs(&ctx, ship));
    }

    for drone in battle.drones.values().filter(|drone| drone.owner == next) {
        diffs.extend(drone_activation(&ctx, drone));
    }

    let cycle_diff = i32::from(battle.play_order.first() == Some(&next));
    diffs.push(BattleDiff::ShipChange {
        ship: ship.id,
        new_ship: next,
        cycle_diff,
    });

    if let Some(next_ship) = battle.ship(next) {
        for effect in next_ship.active_effects.iter() {
            diffs.extend(effect.turn_start_diffs(&ctx, next_ship));
        }
    }
    diffs
}

/// One activation of a drone, at its owner's turn start: either the last
/// one (destruction) or a payload hit on covered ships.
fn drone_activation(ctx: &EffectContext<'_>, drone: &Drone) -> Vec<BattleDiff> {
    if drone.duration <= 1 {
        return vec![BattleDiff::DroneDestroyed {
            drone: drone.clone(),
        }];
    }

    let magnitude = ctx.rng.unit(ctx.battle.roll_seed(drone.id.0, DRONE_CONTEXT));
    let mut diffs = Vec::new();
    for ship in ctx.battle.living_ships().filter(|ship| drone.covers(ship.location())) {
        for effect in drone.effects.iter().filter(|e| !e.kind.lives_in_entry()) {
            diffs.extend(effect.on_diffs(ctx, ship, EffectSource::Drone(drone.id), magnitude));
        }
    }
    diffs.push(BattleDiff::DroneApplied {
        drone: drone.id,
        entered: Vec::new(),
        left: Vec::new(),
        duration_delta: -1,
    });
    diffs
}
