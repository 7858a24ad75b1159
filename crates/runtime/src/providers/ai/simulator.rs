//! Move-fire simulation.
//!
//! Works out whether an action needs an approach move first (to bring the
//! target in range), and whether both parts fit in the remaining power.

use arrayvec::ArrayVec;
use tactics_core::action::{self, ShipAction};
use tactics_core::{
    ActionKind, ActionRef, Battle, EquipmentId, ExclusionAreas, Location, MoveEngine, Ship,
    Target, ValueKind,
};

/// One action of a simulated sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveFirePart {
    pub action: ActionRef,
    pub target: Target,
    pub power: i32,
    pub possible: bool,
}

/// Result of a move-fire simulation.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MoveFireResult {
    /// False only if no route was found.
    pub success: bool,
    /// Ideal successive parts: an optional approach move, then the action.
    pub parts: ArrayVec<MoveFirePart, 2>,
    /// Both move and fire are possible this turn.
    pub complete: bool,

    pub need_move: bool,
    pub can_move: bool,
    pub can_end_move: bool,
    pub total_move_power: i32,
    pub move_location: Location,

    pub need_fire: bool,
    pub can_fire: bool,
    pub total_fire_power: i32,
}

/// Why no approach move was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApproachError {
    NoMoveNeeded,
    NoVectorFound,
}

/// Engine covering the longest distance per power point.
pub fn best_engine(ship: &Ship) -> Option<(EquipmentId, &MoveEngine)> {
    ship.equipment
        .iter()
        .filter_map(|equipment| match &equipment.action {
            Some(ActionKind::Move(engine)) => Some((equipment.id, engine)),
            _ => None,
        })
        .max_by(|a, b| a.1.distance_per_power.total_cmp(&b.1.distance_per_power))
}

/// True if the exclusion areas leave `target` untouched.
fn can_move_to(battle: &Battle, ship: &Ship, engine: &MoveEngine, target: Location) -> bool {
    let exclusion = ExclusionAreas::from_battle(battle, &[ship.id], engine.safety_distance);
    exclusion.stop_before(target, ship.location()) == target
}

/// Points on concentric circles around a center: `rings` radii from 0 to
/// `radius`, up to `angles` points on the outermost one.
pub fn scan_circle(
    center: Location,
    radius: f64,
    rings: usize,
    angles: usize,
) -> impl Iterator<Item = Location> {
    let step = if rings > 1 {
        1.0 / (rings - 1) as f64
    } else {
        0.0
    };
    (0..rings).flat_map(move |ring| {
        let r = ring as f64 * step;
        let count = ((angles as f64 * r).ceil() as usize).max(1);
        (0..count).map(move |index| {
            let a = index as f64 * 2.0 * core::f64::consts::PI / count as f64;
            Location::new(
                center.x + r * radius * a.cos(),
                center.y + r * radius * a.sin(),
            )
        })
    })
}

/// Location from which `target` is within `radius`.
///
/// Tries the straight line first, then the closest reachable point of a
/// circle scan around the target.
pub fn approach(
    battle: &Battle,
    ship: &Ship,
    engine: &MoveEngine,
    target: Location,
    radius: f64,
    margin: f64,
) -> Result<Location, ApproachError> {
    let origin = ship.location();
    let distance = origin.distance_to(target);
    if distance <= radius {
        return Err(ApproachError::NoMoveNeeded);
    }

    let radius = if margin > 0.0 && radius > margin {
        radius - margin
    } else {
        radius
    };
    let factor = (distance - radius) / distance;
    let direct = Location::new(
        origin.x + (target.x - origin.x) * factor,
        origin.y + (target.y - origin.y) * factor,
    );
    if can_move_to(battle, ship, engine, direct) {
        return Ok(direct);
    }

    scan_circle(target, radius, 6, 30)
        .filter(|candidate| can_move_to(battle, ship, engine, *candidate))
        .min_by(|a, b| a.distance_to(origin).total_cmp(&b.distance_to(origin)))
        .ok_or(ApproachError::NoVectorFound)
}

/// Simulates `action` on `target`, with an approach move when needed.
pub fn simulate(
    battle: &Battle,
    ship: &Ship,
    action: ShipAction<'_>,
    target: &Target,
    margin: f64,
) -> MoveFireResult {
    let mut result = MoveFireResult {
        move_location: ship.location(),
        ..MoveFireResult::default()
    };
    let mut power = ship.value(ValueKind::Power);
    let engine = best_engine(ship);

    let mut move_target: Option<Location> = None;
    match action.kind() {
        Some(ActionKind::Move(_)) => {
            if let Some(checked) = action::check_target(battle, ship, action, target) {
                result.need_move = checked.location().distance_to(ship.location()) > 0.0;
                move_target = Some(checked.location());
            }
        }
        Some(_) => {
            let radius = action::range_radius(ship, action);
            let approached = match engine {
                Some((_, engine)) => {
                    approach(battle, ship, engine, target.location(), radius, margin)
                }
                None if target.distance_to(ship.location()) <= radius => {
                    Err(ApproachError::NoMoveNeeded)
                }
                None => Err(ApproachError::NoVectorFound),
            };
            match approached {
                Ok(location) => {
                    result.need_move = true;
                    move_target = Some(location);
                }
                Err(ApproachError::NoMoveNeeded) => {}
                Err(ApproachError::NoVectorFound) => {
                    result.need_move = true;
                    return result;
                }
            }
        }
        None => {}
    }
    if move_target.is_some_and(|location| location.distance_to(ship.location()) < 0.000001) {
        result.need_move = false;
    }

    if result.need_move
        && let (Some(location), Some((engine_id, engine))) = (move_target, engine)
        && let Some(engine_action) = ShipAction::lookup(ship, ActionRef::Equipment(engine_id))
    {
        let move_target = Target::Location(location);
        result.total_move_power = action::power_usage(ship, engine_action, Some(&move_target));
        result.can_move = power > 0 && engine.distance_per_power > 0.0;
        result.can_end_move = result.total_move_power <= power;
        result.move_location = location;
        result.parts.push(MoveFirePart {
            action: ActionRef::Equipment(engine_id),
            target: move_target,
            power: result.total_move_power,
            possible: result.can_move,
        });
        power -= result.total_move_power;
    }

    if let Some(ActionKind::Move(_)) = action.kind() {
        result.success = result.need_move && result.can_move;
    } else {
        result.need_fire = true;
        result.total_fire_power = action::power_usage(ship, action, Some(target));
        result.can_fire = result.total_fire_power <= power;
        result.parts.push(MoveFirePart {
            action: action.action_ref(),
            target: *target,
            power: result.total_fire_power,
            possible: (!result.need_move || result.can_end_move) && result.can_fire,
        });
        result.success = true;
    }

    result.complete = (!result.need_move || result.can_end_move)
        && (!result.need_fire || result.can_fire);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::tests::{ENGINE, GUN, skirmish};
    use tactics_core::ShipId;

    #[test]
    fn scan_circle_covers_center_and_rim() {
        let points: Vec<_> = scan_circle(Location::new(0.0, 0.0), 10.0, 3, 4).collect();
        // ring 0: center; ring 1 (r=0.5): 2 points; ring 2 (r=1): 4 points
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], Location::new(0.0, 0.0));
        assert!((points[3].distance_to(Location::new(0.0, 0.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn in_range_shot_needs_no_move() {
        let battle = skirmish(500.0);
        let ship = battle.ship(ShipId(1)).unwrap();
        let gun = ShipAction::lookup(ship, ActionRef::Equipment(GUN)).unwrap();
        let target = Target::ship(battle.ship(ShipId(2)).unwrap());

        let result = simulate(&battle, ship, gun, &target, 1.0);
        assert!(result.success && result.complete);
        assert!(!result.need_move);
        assert_eq!(result.parts.len(), 1);
        assert_eq!(result.total_fire_power, 3);
    }

    #[test]
    fn distant_shot_approaches_first() {
        let battle = skirmish(1000.0);
        let ship = battle.ship(ShipId(1)).unwrap();
        let gun = ShipAction::lookup(ship, ActionRef::Equipment(GUN)).unwrap();
        let target = Target::ship(battle.ship(ShipId(2)).unwrap());

        let result = simulate(&battle, ship, gun, &target, 1.0);
        assert!(result.success);
        assert!(result.need_move);
        assert_eq!(result.parts[0].action, ActionRef::Equipment(ENGINE));
        assert_eq!(result.parts[1].action, ActionRef::Equipment(GUN));
        // 1000km apart, 600km range with a 1km margin: 401km at 100km/power.
        let moved = result.move_location.distance_to(ship.location());
        assert!((moved - 401.0).abs() < 1e-6);
        assert_eq!(result.total_move_power, 5);
        assert!(result.complete);
    }

    #[test]
    fn out_of_reach_shot_is_incomplete() {
        let battle = skirmish(1600.0);
        let ship = battle.ship(ShipId(1)).unwrap();
        let gun = ShipAction::lookup(ship, ActionRef::Equipment(GUN)).unwrap();
        let target = Target::ship(battle.ship(ShipId(2)).unwrap());

        let result = simulate(&battle, ship, gun, &target, 1.0);
        assert!(result.success);
        assert!(!result.can_end_move);
        assert!(!result.complete);
    }
}
