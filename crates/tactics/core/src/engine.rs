//! Action application and turn flow.
//!
//! [`BattleEngine`] is the only place where resolved actions meet the
//! battle: it applies the action diffs, runs the consistency checks until
//! the battle is stable, closes the action with a marker and forces the end
//! of turn of a playing ship left without hull.

use crate::action::{self, ActionError, ActionRef, ShipAction};
use crate::checks;
use crate::diff::{BattleDiff, BattleLogClient};
use crate::geometry::Target;
use crate::rng::RngOracle;
use crate::state::{Battle, ShipId, ValueKind};

/// Summary of one applied action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionOutcome {
    pub ship: ShipId,
    pub action: ActionRef,
    /// Target after checking (possibly adjusted).
    pub target: Target,
    /// Log range appended for this action, forced end of turn included.
    pub log_start: usize,
    pub log_end: usize,
}

/// Applies actions to a battle through the diff log.
pub struct BattleEngine<'a> {
    battle: &'a mut Battle,
    rng: &'a dyn RngOracle,
}

impl<'a> BattleEngine<'a> {
    pub fn new(battle: &'a mut Battle, rng: &'a dyn RngOracle) -> Self {
        Self { battle, rng }
    }

    pub fn battle(&self) -> &Battle {
        self.battle
    }

    /// Starts the battle (placement and initiative, not logged).
    pub fn start(&mut self) {
        self.battle.start(self.rng);
    }

    /// Applies an action of the playing ship. Without a target, the action's
    /// default target is used.
    pub fn apply_action(
        &mut self,
        action: ActionRef,
        target: Option<Target>,
    ) -> Result<ActionOutcome, ActionError> {
        let log_start = self.battle.log.len();
        let (ship, checked) = self.apply_single(action, target)?;

        // A ship without hull may not keep playing; ending its turn lets the
        // death check catch it. Each forced end kills one ship, so this ends.
        let mut guard = self.battle.play_order.len() + 1;
        while guard > 0 && !self.battle.is_ended() {
            let Some(playing) = self.battle.playing_ship() else {
                break;
            };
            if playing.value(ValueKind::Hull) > 0 {
                break;
            }
            tracing::debug!(ship = %playing.id, "forcing end of turn of a ship without hull");
            self.apply_single(ActionRef::EndTurn, None)?;
            guard -= 1;
        }

        Ok(ActionOutcome {
            ship,
            action,
            target: checked,
            log_start,
            log_end: self.battle.log.len(),
        })
    }

    /// Ends the playing ship's turn.
    pub fn advance_to_next_ship(&mut self) -> Result<ActionOutcome, ActionError> {
        self.apply_action(ActionRef::EndTurn, None)
    }

    fn apply_single(
        &mut self,
        action: ActionRef,
        target: Option<Target>,
    ) -> Result<(ShipId, Target), ActionError> {
        if self.battle.is_ended() {
            return Err(ActionError::BattleEnded);
        }
        let ship = self.battle.playing.ok_or(ActionError::NoPlayingShip)?;
        let target = match target {
            Some(target) => target,
            None => {
                let actor = self.battle.ship(ship).ok_or(ActionError::ShipMissing(ship))?;
                let resolved = ShipAction::lookup(actor, action)
                    .ok_or(ActionError::UnknownAction(ship, action))?;
                action::default_target(self.battle, actor, resolved)
            }
        };

        let diffs = action::resolve(self.battle, ship, action, &target, self.rng)?;
        let checked = match diffs.first() {
            Some(BattleDiff::ShipActionUsed { target, .. }) => *target,
            _ => return Err(ActionError::NoDiffs(action)),
        };

        self.battle.apply_diffs(diffs);
        self.perform_checks();

        if !self.battle.is_ended() {
            self.battle.apply_diffs([BattleDiff::ShipActionEnded {
                ship,
                action,
                target: checked,
            }]);
        }
        Ok((ship, checked))
    }

    /// Applies consistency corrections until none are left. Returns the
    /// number of passes that produced diffs.
    pub fn perform_checks(&mut self) -> u32 {
        let limit = self.battle.config.max_check_loops;
        let mut passes = 0;
        while passes < limit {
            let diffs = checks::next_corrections(self.battle, self.rng);
            if diffs.is_empty() {
                return passes;
            }
            self.battle.apply_diffs(diffs);
            passes += 1;
        }
        tracing::error!(limit, "consistency checks did not settle");
        passes
    }

    /// Steps back over the last action and drops it from the log. Returns
    /// false when there is no action to revert.
    ///
    /// An end of turn forced by [`BattleEngine::apply_action`] goes with the
    /// action that left the ship without hull: stepping back continues until
    /// the playing ship has hull again.
    pub fn revert_one_action(&mut self) -> bool {
        let mut client = BattleLogClient::new(self.battle);
        let mut reverted = 0;
        while client.backward_to(BattleDiff::is_action_used) {
            client.backward();
            reverted += 1;
            let battle = client.battle();
            let settled = battle
                .playing
                .and_then(|id| battle.ship(id))
                .is_none_or(|ship| ship.value(ValueKind::Hull) > 0);
            if settled {
                break;
            }
        }
        if reverted == 0 {
            return false;
        }
        client.truncate();
        tracing::debug!(log = self.battle.log.len(), reverted, "action reverted");
        true
    }
}
