//! High-level battle driver.
//!
//! The driver owns the battle, asks the fleet's [`ActionProvider`] what the
//! playing ship does, applies the answer through the [`BattleEngine`] and
//! publishes every new log entry on the [`EventBus`]. It is the only place
//! that mutates the battle, so providers only ever see a settled state.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tactics_core::{
    ActionOutcome, ActionRef, Battle, BattleEngine, BattleOutcome, BattleStats, FleetId,
    RngOracle, ShipId, Target,
};

use crate::api::{ActionProvider, PlannedAction, Result, RuntimeError};
use crate::events::EventBus;
use crate::export::LogExporter;
use crate::providers::AgentProvider;

/// Runtime configuration shared by the driver and the agents it creates.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Work units one agent decision may use.
    pub agent_unit_budget: usize,
    /// Wall-clock time one agent decision may use.
    pub agent_time_budget: Duration,
    /// Capacity of each event bus topic.
    pub event_capacity: usize,
    /// Ship turns before the driver gives up on a battle.
    pub max_turns: u32,
    /// Decisions asked from a provider within one turn.
    pub max_actions_per_turn: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            agent_unit_budget: AgentProvider::DEFAULT_UNIT_BUDGET,
            agent_time_budget: AgentProvider::DEFAULT_TIME_BUDGET,
            event_capacity: 100,
            max_turns: 200,
            max_actions_per_turn: 10,
        }
    }
}

impl RuntimeConfig {
    pub fn with_agent_unit_budget(mut self, units: usize) -> Self {
        self.agent_unit_budget = units;
        self
    }

    pub fn with_agent_time_budget(mut self, budget: Duration) -> Self {
        self.agent_time_budget = budget;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    pub fn with_max_actions_per_turn(mut self, actions: u32) -> Self {
        self.max_actions_per_turn = actions;
        self
    }

    /// Tactical agent using this configuration's budgets.
    pub fn agent(&self, rng: Arc<dyn RngOracle>) -> AgentProvider {
        AgentProvider::new(rng)
            .with_unit_budget(self.agent_unit_budget)
            .with_time_budget(self.agent_time_budget)
    }
}

/// Summary of a driven battle.
#[derive(Debug, Clone, Serialize)]
pub struct BattleReport {
    /// `None` if the turn limit was reached first.
    pub outcome: Option<BattleOutcome>,
    pub turns: u32,
    pub actions: u32,
    pub log_len: usize,
    pub stats: BattleStats,
}

/// Drives a battle turn by turn.
pub struct BattleDriver {
    battle: Battle,
    config: RuntimeConfig,
    rng: Arc<dyn RngOracle>,
    providers: BTreeMap<FleetId, Arc<dyn ActionProvider>>,
    default_provider: Option<Arc<dyn ActionProvider>>,
    events: EventBus,
    exporter: Option<LogExporter>,
    turns: u32,
    actions: u32,
}

impl BattleDriver {
    pub fn builder(battle: Battle, rng: Arc<dyn RngOracle>) -> BattleDriverBuilder {
        BattleDriverBuilder::new(battle, rng)
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn into_battle(self) -> Battle {
        self.battle
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Bus the driver publishes on. Clones share the same channels.
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Starts the battle if it has not started yet.
    pub fn start(&mut self) {
        if self.battle.playing.is_none() && !self.battle.is_ended() {
            BattleEngine::new(&mut self.battle, self.rng.as_ref()).start();
            tracing::info!(
                ships = self.battle.play_order.len(),
                fleets = self.battle.fleets.len(),
                "battle started"
            );
        }
    }

    fn provider_for(&self, ship: ShipId) -> Result<Arc<dyn ActionProvider>> {
        let fleet = self
            .battle
            .ship(ship)
            .map(|ship| ship.fleet)
            .ok_or(RuntimeError::NoPlayingShip)?;
        self.providers
            .get(&fleet)
            .or(self.default_provider.as_ref())
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet { fleet })
    }

    /// Applies one action of the playing ship and publishes its log entries.
    pub fn apply(&mut self, action: ActionRef, target: Option<Target>) -> Result<ActionOutcome> {
        let outcome = BattleEngine::new(&mut self.battle, self.rng.as_ref())
            .apply_action(action, target)?;
        self.publish(outcome.log_start)?;
        Ok(outcome)
    }

    fn publish(&mut self, start: usize) -> Result<()> {
        self.events.publish_diffs(start, self.battle.log.since(start));
        if let Some(exporter) = self.exporter.as_mut() {
            exporter.export_new(&self.battle)?;
        }
        Ok(())
    }

    /// Plays the turn of the playing ship, up to its end.
    ///
    /// A decision that fails to apply is logged and ends the turn, so a
    /// confused provider cannot stall the battle.
    pub async fn play_turn(&mut self) -> Result<()> {
        let ship = self.battle.playing.ok_or(RuntimeError::NoPlayingShip)?;
        let provider = self.provider_for(ship)?;

        'decisions: for _ in 0..self.config.max_actions_per_turn {
            let plan = provider.provide_actions(ship, &self.battle).await?;
            if plan.is_empty() {
                break;
            }
            for PlannedAction { action, target } in plan {
                if self.battle.is_ended() || !self.battle.is_playing(ship) {
                    break 'decisions;
                }
                if action == ActionRef::EndTurn {
                    break 'decisions;
                }
                match self.apply(action, target) {
                    Ok(outcome) => {
                        self.actions += 1;
                        tracing::debug!(
                            %ship,
                            %action,
                            target = %outcome.target,
                            entries = outcome.log_end - outcome.log_start,
                            "action applied"
                        );
                    }
                    Err(RuntimeError::Action(error)) => {
                        tracing::warn!(%ship, %action, %error, "planned action failed, ending turn");
                        break 'decisions;
                    }
                    Err(error) => return Err(error),
                }
            }
        }

        if !self.battle.is_ended() && self.battle.is_playing(ship) {
            self.apply(ActionRef::EndTurn, None)?;
        }
        self.turns += 1;
        Ok(())
    }

    /// Runs the battle until it ends or the turn limit is reached.
    pub async fn run(&mut self) -> Result<BattleReport> {
        self.start();
        while !self.battle.is_ended() && self.turns < self.config.max_turns {
            self.play_turn().await?;
        }
        if let Some(exporter) = self.exporter.as_mut() {
            exporter.flush()?;
        }

        let report = self.report();
        match report.outcome {
            Some(outcome) => tracing::info!(
                winner = ?outcome.winner,
                cycle = outcome.cycle,
                turns = report.turns,
                "battle ended"
            ),
            None => tracing::warn!(turns = report.turns, "turn limit reached"),
        }
        Ok(report)
    }

    /// Runs the battle on its own task and hands the driver back with the
    /// report.
    pub async fn run_in_background(self) -> Result<(BattleReport, Self)> {
        let handle = tokio::spawn(async move {
            let mut driver = self;
            let report = driver.run().await?;
            Ok::<_, RuntimeError>((report, driver))
        });
        handle.await.map_err(RuntimeError::WorkerJoin)?
    }

    pub fn report(&self) -> BattleReport {
        BattleReport {
            outcome: self.battle.outcome,
            turns: self.turns,
            actions: self.actions,
            log_len: self.battle.log.len(),
            stats: BattleStats::from_battle(&self.battle),
        }
    }
}

/// Builder for [`BattleDriver`].
pub struct BattleDriverBuilder {
    battle: Battle,
    rng: Arc<dyn RngOracle>,
    config: RuntimeConfig,
    providers: BTreeMap<FleetId, Arc<dyn ActionProvider>>,
    default_provider: Option<Arc<dyn ActionProvider>>,
    exporter: Option<LogExporter>,
}

impl BattleDriverBuilder {
    fn new(battle: Battle, rng: Arc<dyn RngOracle>) -> Self {
        Self {
            battle,
            rng,
            config: RuntimeConfig::default(),
            providers: BTreeMap::new(),
            default_provider: None,
            exporter: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provider for the ships of one fleet.
    pub fn provider(mut self, fleet: FleetId, provider: impl ActionProvider + 'static) -> Self {
        self.providers.insert(fleet, Arc::new(provider));
        self
    }

    /// Provider for fleets without their own.
    pub fn default_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.default_provider = Some(Arc::new(provider));
        self
    }

    /// Tactical agents (from the configured budgets) for fleets without
    /// their own provider.
    pub fn agents(mut self) -> Self {
        let agent = self.config.agent(Arc::clone(&self.rng));
        self.default_provider = Some(Arc::new(agent));
        self
    }

    /// Exports the log as JSON lines to `path` while the battle runs.
    pub fn export_to(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.exporter = Some(LogExporter::create(path)?);
        Ok(self)
    }

    pub fn build(self) -> BattleDriver {
        BattleDriver {
            events: EventBus::with_capacity(self.config.event_capacity),
            battle: self.battle,
            config: self.config,
            rng: self.rng,
            providers: self.providers,
            default_provider: self.default_provider,
            exporter: self.exporter,
            turns: 0,
            actions: 0,
        }
    }
}
