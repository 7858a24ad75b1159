//! Candidate maneuvers and their predicted outcome.

use tactics_core::action::ShipAction;
use tactics_core::{
    ActionRef, Battle, BattleDiff, BattleEngine, Location, RngOracle, Ship, ShipId, Target,
};

use super::simulator::{self, MoveFireResult};

/// Approach moves stop this far inside the weapon range.
pub const MOVE_MARGIN: f64 = 1.0;

/// Read-only view shared by every producer and evaluator of one search.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub battle: &'a Battle,
    pub ship: &'a Ship,
    pub rng: &'a dyn RngOracle,
}

impl<'a> SearchContext<'a> {
    /// Context for the given ship, `None` if it is not in the battle.
    pub fn new(battle: &'a Battle, ship: ShipId, rng: &'a dyn RngOracle) -> Option<Self> {
        Some(Self {
            battle,
            ship: battle.ship(ship)?,
            rng,
        })
    }

    pub fn action(&self, action: ActionRef) -> Option<ShipAction<'a>> {
        ShipAction::lookup(self.ship, action)
    }
}

/// One action the agent may use, with an approach move when needed.
#[derive(Clone, Debug)]
pub struct Maneuver {
    pub ship: ShipId,
    pub action: ActionRef,
    pub target: Target,
    pub simulation: MoveFireResult,
    /// State after playing the maneuver on a detached copy of the battle.
    /// Its log holds the predicted diffs.
    pub predicted: Battle,
}

impl Maneuver {
    /// Simulates the action and predicts its outcome. `None` if the ship does
    /// not have this action.
    pub fn new(ctx: &SearchContext<'_>, action: ActionRef, target: Target) -> Option<Self> {
        let resolved = ctx.action(action)?;
        let simulation = simulator::simulate(ctx.battle, ctx.ship, resolved, &target, MOVE_MARGIN);

        let mut predicted = ctx.battle.detached();
        if simulation.success && simulation.complete {
            let mut engine = BattleEngine::new(&mut predicted, ctx.rng);
            for part in &simulation.parts {
                if let Err(error) = engine.apply_action(part.action, Some(part.target)) {
                    tracing::trace!(%action, %error, "prediction stopped");
                    break;
                }
            }
        }

        Some(Self {
            ship: ctx.ship.id,
            action,
            target,
            simulation,
            predicted,
        })
    }

    /// True if the whole maneuver can be played this turn.
    pub fn is_possible(&self) -> bool {
        self.simulation.success && self.simulation.complete
    }

    pub fn is_end_turn(&self) -> bool {
        self.action == ActionRef::EndTurn
    }

    /// Diffs the maneuver is predicted to produce.
    pub fn effects(&self) -> impl Iterator<Item = &BattleDiff> {
        self.predicted.log.iter()
    }

    pub fn final_location(&self, ship: &Ship) -> Location {
        if self.simulation.need_move {
            self.simulation.move_location
        } else {
            ship.location()
        }
    }

    pub fn power_usage(&self) -> i32 {
        self.simulation.total_move_power + self.simulation.total_fire_power
    }
}
