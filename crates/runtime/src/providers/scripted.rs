//! Provider replaying a fixed list of decisions.

use std::collections::VecDeque;

use async_trait::async_trait;
use tactics_core::{Battle, ShipId};
use tokio::sync::Mutex;

use crate::api::{ActionProvider, PlannedAction, Result};

/// Hands out queued decisions in order, then ends every turn.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    decisions: Mutex<VecDeque<Vec<PlannedAction>>>,
}

impl ScriptedProvider {
    pub fn new(decisions: impl IntoIterator<Item = Vec<PlannedAction>>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.decisions.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_actions(&self, ship: ShipId, _battle: &Battle) -> Result<Vec<PlannedAction>> {
        let next = self.decisions.lock().await.pop_front();
        tracing::trace!(%ship, scripted = next.is_some(), "scripted decision");
        Ok(next.unwrap_or_else(|| vec![PlannedAction::end_turn()]))
    }
}
