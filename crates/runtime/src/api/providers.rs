//! Asynchronous abstraction for sourcing fleet intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or the tactical agent.
use async_trait::async_trait;
use tactics_core::{ActionRef, Battle, ShipId, Target};

use super::errors::Result;

/// One action to apply for the playing ship. Without a target, the action's
/// default target is used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannedAction {
    pub action: ActionRef,
    pub target: Option<Target>,
}

impl PlannedAction {
    pub const fn new(action: ActionRef, target: Target) -> Self {
        Self {
            action,
            target: Some(target),
        }
    }

    pub const fn end_turn() -> Self {
        Self {
            action: ActionRef::EndTurn,
            target: None,
        }
    }

    pub fn is_end_turn(&self) -> bool {
        self.action == ActionRef::EndTurn
    }
}

/// Trait for deciding what the playing ship does next.
///
/// Each call returns the steps of one decision, applied in order. An empty
/// list, or a list ending with an end turn, passes the turn on.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    async fn provide_actions(&self, ship: ShipId, battle: &Battle) -> Result<Vec<PlannedAction>>;
}

/// Provider that always ends the turn. Useful as a passive opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndTurnProvider;

#[async_trait]
impl ActionProvider for EndTurnProvider {
    async fn provide_actions(&self, _ship: ShipId, _battle: &Battle) -> Result<Vec<PlannedAction>> {
        Ok(vec![PlannedAction::end_turn()])
    }
}
