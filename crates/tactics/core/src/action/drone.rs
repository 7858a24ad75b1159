use std::collections::BTreeSet;

use crate::diff::BattleDiff;
use crate::geometry::Target;
use crate::state::{Battle, Drone, Equipment, Ship};

use super::DeployDrone;

pub(super) fn check_target(ship: &Ship, deploy: &DeployDrone, target: &Target) -> Option<Target> {
    Some(
        target
            .as_location()
            .constrained_in_range(ship.location(), deploy.deploy_distance),
    )
}

/// The payload reaches ships already covered through the next consistency
/// pass, which records them as entered.
pub(super) fn diffs(
    battle: &Battle,
    ship: &Ship,
    equipment: &Equipment,
    deploy: &DeployDrone,
    target: &Target,
) -> Vec<BattleDiff> {
    vec![BattleDiff::DroneDeployed {
        drone: Drone {
            id: battle.next_drone_id(),
            owner: ship.id,
            launcher: equipment.id,
            location: target.location(),
            radius: deploy.effect_radius,
            duration: deploy.lifetime,
            effects: deploy.effects.clone(),
            inside: BTreeSet::new(),
        },
    }]
}
