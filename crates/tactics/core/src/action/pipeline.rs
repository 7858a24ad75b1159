//! Shared validation and resolution pipeline.

use crate::diff::BattleDiff;
use crate::rng::RngOracle;
use crate::state::{Battle, PinLevel, Ship, ShipId, ValueKind};
use crate::geometry::Target;

use super::{
    ActionError, ActionKind, ActionRef, ActionUnavailability, ShipAction, drone, end_turn, fire,
    movement, toggle,
};

/// Every action a ship may try this turn (end turn first, then equipment
/// order), whether currently available or not.
pub fn available_actions(ship: &Ship) -> Vec<ActionRef> {
    core::iter::once(ActionRef::EndTurn)
        .chain(
            ship.equipment
                .iter()
                .filter(|equipment| equipment.action.is_some())
                .map(|equipment| ActionRef::Equipment(equipment.id)),
        )
        .collect()
}

/// Power the action would use. Without a target, an estimate (0 for moves).
pub fn power_usage(ship: &Ship, action: ShipAction<'_>, target: Option<&Target>) -> i32 {
    match action {
        ShipAction::EndTurn => end_turn::power_usage(ship),
        ShipAction::Equipment { equipment, kind } => match kind {
            ActionKind::FireWeapon(weapon) => weapon.power,
            ActionKind::Move(engine) => movement::power_usage(ship, engine, target),
            ActionKind::Toggle(_) | ActionKind::Vigilance(_) => {
                if equipment.activated {
                    0
                } else {
                    kind.toggle_power().unwrap_or(0)
                }
            }
            ActionKind::DeployDrone(deploy) => deploy.power,
        },
    }
}

/// Maximal targeting distance.
pub fn range_radius(ship: &Ship, action: ShipAction<'_>) -> f64 {
    match action.kind() {
        Some(ActionKind::FireWeapon(weapon)) => weapon.range,
        Some(ActionKind::Move(engine)) => movement::range_radius(ship, engine),
        Some(ActionKind::DeployDrone(deploy)) => deploy.deploy_distance,
        Some(ActionKind::Toggle(_) | ActionKind::Vigilance(_)) | None => 0.0,
    }
}

/// Radius of the affected area around the (checked) target.
pub fn blast_radius(action: ShipAction<'_>) -> f64 {
    match action.kind() {
        Some(ActionKind::FireWeapon(weapon)) => weapon.blast,
        Some(ActionKind::Toggle(toggle)) => toggle.radius,
        Some(ActionKind::Vigilance(vigilance)) => vigilance.radius,
        Some(ActionKind::DeployDrone(deploy)) => deploy.effect_radius,
        Some(ActionKind::Move(_)) | None => 0.0,
    }
}

/// Why the action cannot be used right now, if it cannot.
pub fn unavailability(
    battle: &Battle,
    ship: &Ship,
    action: ShipAction<'_>,
) -> Option<ActionUnavailability> {
    if !ship.alive {
        return Some(ActionUnavailability::Dead);
    }
    if !battle.is_playing(ship.id) {
        return Some(ActionUnavailability::NotPlaying);
    }
    if let ShipAction::Equipment { equipment, .. } = action {
        if !equipment.cooldown.can_use() {
            return Some(ActionUnavailability::Overheated);
        }
    }

    if let Some(ActionKind::Move(_)) = action.kind() {
        if ship.value(ValueKind::Power) <= 0 {
            return Some(ActionUnavailability::Power);
        }
        if ship.pin_level() != PinLevel::Free {
            return Some(ActionUnavailability::Pinned);
        }
        let watching = ship
            .toggled()
            .any(|equipment| matches!(equipment.action, Some(ActionKind::Vigilance(_))));
        if watching {
            return Some(ActionUnavailability::Vigilance);
        }
        return None;
    }

    if ship.value(ValueKind::Power) < power_usage(ship, action, None) {
        return Some(ActionUnavailability::Power);
    }
    None
}

/// Target the UI or the agent would pick by default.
pub fn default_target(battle: &Battle, ship: &Ship, action: ShipAction<'_>) -> Target {
    match action.kind() {
        Some(ActionKind::FireWeapon(weapon)) => fire::default_target(battle, ship, weapon),
        Some(ActionKind::Move(_)) => movement::default_target(ship),
        Some(ActionKind::DeployDrone(_)) => Target::Location(ship.location()),
        Some(ActionKind::Toggle(_) | ActionKind::Vigilance(_)) | None => Target::ship(ship),
    }
}

/// Checks a target, returning it possibly adjusted, or `None` to reject.
pub fn check_target(
    battle: &Battle,
    ship: &Ship,
    action: ShipAction<'_>,
    target: &Target,
) -> Option<Target> {
    if unavailability(battle, ship, action).is_some() {
        return None;
    }
    let self_only = || (target.ship_id() == Some(ship.id)).then_some(*target);
    match action.kind() {
        None => self_only(),
        Some(ActionKind::Toggle(_) | ActionKind::Vigilance(_)) => self_only(),
        Some(ActionKind::FireWeapon(weapon)) => fire::check_target(battle, ship, weapon, target),
        Some(ActionKind::Move(engine)) => movement::check_target(battle, ship, engine, target),
        Some(ActionKind::DeployDrone(deploy)) => drone::check_target(ship, deploy, target),
    }
}

/// Ships the action would affect with the given (checked) target.
pub fn impacted_ships(
    battle: &Battle,
    ship: &Ship,
    action: ShipAction<'_>,
    target: &Target,
) -> Vec<ShipId> {
    match action.kind() {
        Some(ActionKind::FireWeapon(weapon)) => fire::impacted_ships(battle, weapon, target),
        Some(ActionKind::Toggle(toggle)) => toggle::covered_ships(battle, ship, toggle.radius),
        Some(ActionKind::Vigilance(vigilance)) => battle
            .ships_in_circle(ship.location(), vigilance.radius)
            .filter(|other| battle.are_enemies(ship.id, other.id))
            .map(|other| other.id)
            .collect(),
        Some(ActionKind::DeployDrone(deploy)) => battle
            .ships_in_circle(target.location(), deploy.effect_radius)
            .map(|other| other.id)
            .collect(),
        Some(ActionKind::Move(_)) | None => Vec::new(),
    }
}

/// Resolves an action of `ship` into the diffs to apply.
///
/// Nothing is applied here; every diff is computed against the current
/// state. Rejections are logged at debug level and returned as errors.
pub fn resolve(
    battle: &Battle,
    ship: ShipId,
    action: ActionRef,
    target: &Target,
    rng: &dyn RngOracle,
) -> Result<Vec<BattleDiff>, ActionError> {
    if battle.is_ended() {
        return Err(ActionError::BattleEnded);
    }
    let actor = battle.ship(ship).ok_or(ActionError::ShipMissing(ship))?;
    let resolved =
        ShipAction::lookup(actor, action).ok_or(ActionError::UnknownAction(ship, action))?;

    if let Some(reason) = unavailability(battle, actor, resolved) {
        tracing::debug!(%ship, %action, %reason, "action rejected");
        return Err(match reason {
            ActionUnavailability::NotPlaying => ActionError::NotPlaying(ship),
            reason => ActionError::Unavailable(reason),
        });
    }

    let Some(checked) = check_target(battle, actor, resolved, target) else {
        tracing::debug!(%ship, %action, %target, "target rejected");
        return Err(ActionError::TargetRejected(action));
    };

    let cost = power_usage(actor, resolved, Some(&checked));
    if actor.value(ValueKind::Power) < cost {
        tracing::debug!(%ship, %action, cost, "not enough power");
        return Err(ActionError::Unavailable(ActionUnavailability::Power));
    }

    let mut diffs = vec![BattleDiff::ShipActionUsed {
        ship,
        action,
        target: checked,
    }];
    if cost != 0 {
        diffs.extend(actor.value_diffs(ValueKind::Power, -cost, true));
    }

    match resolved {
        ShipAction::EndTurn => diffs.extend(end_turn::diffs(battle, actor, rng)),
        ShipAction::Equipment { equipment, kind } => match kind {
            ActionKind::FireWeapon(weapon) => {
                diffs.extend(fire::diffs(battle, actor, weapon, &checked, rng))
            }
            ActionKind::Move(_) => diffs.extend(movement::diffs(actor, &checked)),
            ActionKind::Toggle(aura) => {
                diffs.extend(toggle::toggle_diffs(battle, actor, equipment, aura, rng))
            }
            ActionKind::Vigilance(watch) => {
                diffs.extend(toggle::vigilance_diffs(battle, actor, equipment, watch))
            }
            ActionKind::DeployDrone(deploy) => {
                diffs.extend(drone::diffs(battle, actor, equipment, deploy, &checked))
            }
        },
    }

    tracing::debug!(%ship, %action, target = %checked, cost, diffs = diffs.len(), "action resolved");
    Ok(diffs)
}
