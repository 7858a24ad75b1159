//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from action resolution, providers, worker tasks and log
//! export so clients can bubble them up with consistent context.
use thiserror::Error;

use tactics_core::{ActionError, BattleError, ErrorSeverity, FleetId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no ship is playing")]
    NoPlayingShip,

    #[error("no action provider set for fleet {fleet}")]
    ProviderNotSet { fleet: FleetId },

    #[error("action provider failed: {0}")]
    Provider(String),

    #[error("event channel closed")]
    ChannelClosed,

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("log export failed")]
    Export(#[source] std::io::Error),

    #[error("log entry encoding failed")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl BattleError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoPlayingShip => ErrorSeverity::Internal,
            Self::ProviderNotSet { .. } => ErrorSeverity::Validation,
            Self::Provider(_) | Self::ChannelClosed => ErrorSeverity::Recoverable,
            Self::WorkerJoin(_) => ErrorSeverity::Fatal,
            Self::Export(_) | Self::Encode(_) => ErrorSeverity::Recoverable,
            Self::Action(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoPlayingShip => "RUNTIME_NO_PLAYING_SHIP",
            Self::ProviderNotSet { .. } => "RUNTIME_PROVIDER_NOT_SET",
            Self::Provider(_) => "RUNTIME_PROVIDER_FAILED",
            Self::ChannelClosed => "RUNTIME_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::Export(_) => "RUNTIME_EXPORT_IO",
            Self::Encode(_) => "RUNTIME_EXPORT_ENCODE",
            Self::Action(error) => error.error_code(),
        }
    }
}
