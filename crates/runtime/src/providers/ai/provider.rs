//! Tactical agent action provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tactics_core::{Battle, RngOracle, ShipId};
use tokio::time::Instant;

use super::agent::TacticalAi;
use super::maneuver::SearchContext;
use crate::api::{ActionProvider, PlannedAction, Result, RuntimeError};

/// Runs a [`TacticalAi`] search for every decision.
///
/// The search yields to the scheduler between work units, and stops early
/// once the unit or time budget is spent, keeping the best maneuver so far.
#[derive(Clone)]
pub struct AgentProvider {
    rng: Arc<dyn RngOracle>,
    unit_budget: usize,
    time_budget: Duration,
}

impl AgentProvider {
    pub const DEFAULT_UNIT_BUDGET: usize = 2000;
    pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(8);

    pub fn new(rng: Arc<dyn RngOracle>) -> Self {
        Self {
            rng,
            unit_budget: Self::DEFAULT_UNIT_BUDGET,
            time_budget: Self::DEFAULT_TIME_BUDGET,
        }
    }

    pub fn with_unit_budget(mut self, units: usize) -> Self {
        self.unit_budget = units;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }
}

#[async_trait]
impl ActionProvider for AgentProvider {
    async fn provide_actions(&self, ship: ShipId, battle: &Battle) -> Result<Vec<PlannedAction>> {
        let ctx = SearchContext::new(battle, ship, self.rng.as_ref())
            .ok_or_else(|| RuntimeError::Provider(format!("{ship} is not in the battle")))?;
        let mut ai = TacticalAi::new(ctx);

        let started = Instant::now();
        let mut units = 0;
        while ai.run_one_unit() {
            units += 1;
            if units >= self.unit_budget || started.elapsed() >= self.time_budget {
                tracing::warn!(
                    %ship,
                    produced = ai.produced(),
                    evaluated = ai.evaluated(),
                    "search budget exhausted before every maneuver was analyzed"
                );
                break;
            }
            tokio::task::yield_now().await;
        }

        let Some(best) = ai.into_best() else {
            tracing::debug!(%ship, "no maneuver found");
            return Ok(vec![PlannedAction::end_turn()]);
        };
        tracing::debug!(%ship, action = %best.action, target = %best.target, "maneuver chosen");
        if best.is_end_turn() {
            return Ok(vec![PlannedAction::end_turn()]);
        }
        Ok(best
            .simulation
            .parts
            .iter()
            .map(|part| PlannedAction::new(part.action, part.target))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::tests::{GUN, RNG, skirmish};
    use tactics_core::{ActionRef, FixedRng};

    fn provider() -> AgentProvider {
        AgentProvider::new(Arc::new(FixedRng(RNG.0)))
    }

    #[tokio::test]
    async fn plans_a_shot_in_range() {
        let battle = skirmish(500.0);
        let plan = provider()
            .provide_actions(ShipId(1), &battle)
            .await
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].action, ActionRef::Equipment(GUN));
        assert_eq!(plan[0].target.and_then(|t| t.ship_id()), Some(ShipId(2)));
    }

    #[tokio::test]
    async fn tiny_budget_still_answers() {
        let battle = skirmish(500.0);
        let plan = provider()
            .with_unit_budget(1)
            .provide_actions(ShipId(1), &battle)
            .await
            .unwrap();
        // The end turn producer is polled first.
        assert_eq!(plan, vec![PlannedAction::end_turn()]);
    }

    #[tokio::test]
    async fn unknown_ship_is_an_error() {
        let battle = skirmish(500.0);
        let error = provider()
            .provide_actions(ShipId(42), &battle)
            .await
            .unwrap_err();
        assert!(matches!(error, RuntimeError::Provider(_)));
    }
}
