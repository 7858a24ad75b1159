//! Action provider implementations.

pub mod ai;
pub mod scripted;

pub use ai::AgentProvider;
pub use scripted::ScriptedProvider;
