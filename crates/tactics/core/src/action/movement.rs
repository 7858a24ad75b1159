use crate::diff::BattleDiff;
use crate::exclusion::ExclusionAreas;
use crate::geometry::{Location, Placement, Target};
use crate::state::{Battle, Ship, ValueKind};

use super::MoveEngine;

/// Range margin, so that a clamped target never costs one power too many.
const RANGE_MARGIN: f64 = 0.1;

pub(super) fn power_usage(ship: &Ship, engine: &MoveEngine, target: Option<&Target>) -> i32 {
    if engine.distance_per_power <= 0.0 {
        return i32::MAX;
    }
    match target {
        Some(target) => {
            let distance = target.distance_to(ship.location());
            (distance / engine.distance_per_power).ceil() as i32
        }
        None => 0,
    }
}

/// Distance reachable with the remaining power.
pub(super) fn range_radius(ship: &Ship, engine: &MoveEngine) -> f64 {
    f64::from(ship.value(ValueKind::Power).max(0)) * engine.distance_per_power
}

pub(super) fn default_target(ship: &Ship) -> Target {
    let placement = ship.placement;
    Target::at(
        placement.x + placement.angle.cos() * 100.0,
        placement.y + placement.angle.sin() * 100.0,
    )
}

/// Clamps to reachable range, then stops before exclusion areas. A target
/// that ends up on the ship itself is rejected.
pub(super) fn check_target(
    battle: &Battle,
    ship: &Ship,
    engine: &MoveEngine,
    target: &Target,
) -> Option<Target> {
    if target.is_ship() {
        return None;
    }
    let origin = ship.location();
    let reach = (range_radius(ship, engine) - RANGE_MARGIN).max(0.0);
    let clamped = target.location().constrained_in_range(origin, reach);

    let exclusion = ExclusionAreas::from_battle(battle, &[ship.id], engine.safety_distance);
    let destination = exclusion.stop_before(clamped, origin);
    (destination.distance_to(origin) > 0.0).then_some(Target::Location(destination))
}

pub(super) fn diffs(ship: &Ship, target: &Target) -> Vec<BattleDiff> {
    let origin = ship.location();
    let destination: Location = target.location();
    let angle = if destination.distance_to(origin) < 0.00001 {
        ship.placement.angle
    } else {
        origin.angle_to(destination)
    };
    vec![BattleDiff::ShipMove {
        ship: ship.id,
        start: ship.placement,
        end: Placement::new(destination.x, destination.y, angle),
    }]
}
