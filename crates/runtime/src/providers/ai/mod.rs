//! Tactical search agent.
//!
//! The agent looks for the best next maneuver of the playing ship:
//!
//! 1. **Production**: [`producers`] lazily propose maneuvers (end turn,
//!    direct and blast shots, toggles, drone deployments, moves)
//! 2. **Simulation**: each maneuver is checked by the move-fire
//!    [`simulator`] (approach move first if out of range) and played on a
//!    detached copy of the battle to predict its diffs
//! 3. **Evaluation**: weighted [`evaluators`] score the prediction
//! 4. **Selection**: the first maneuver reaching the best score wins
//!
//! [`TacticalAi`] runs this one maneuver per work unit; [`AgentProvider`]
//! drives it cooperatively on the async runtime.

pub mod agent;
pub mod evaluators;
pub mod maneuver;
pub mod producers;
pub mod provider;
pub mod simulator;

pub use agent::{SearchState, TacticalAi};
pub use evaluators::Evaluator;
pub use maneuver::{Maneuver, SearchContext};
pub use producers::Producer;
pub use provider::AgentProvider;
pub use simulator::{MoveFirePart, MoveFireResult};
