//! Runtime orchestration for tactical battles.
//!
//! This crate wires the action provider abstraction, the tactical search
//! agent, the event bus and the log exporter around the deterministic rules
//! of `tactics-core`. Consumers build a [`BattleDriver`] to run a battle and
//! subscribe to its [`EventBus`] to follow it.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the driver and its builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`providers`] holds the tactical agent and scripted providers
//! - [`events`] provides topic-based event bus for log entries
//! - [`export`] writes the battle log as JSON lines
pub mod api;
pub mod events;
pub mod export;
pub mod providers;
pub mod runtime;

pub use api::{ActionProvider, EndTurnProvider, PlannedAction, Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use export::LogExporter;
pub use providers::{AgentProvider, ScriptedProvider};
pub use runtime::{BattleDriver, BattleDriverBuilder, BattleReport, RuntimeConfig};
