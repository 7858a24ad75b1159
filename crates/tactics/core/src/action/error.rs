//! Action resolution errors.

use crate::error::{BattleError, ErrorSeverity};
use crate::state::ShipId;

use super::ActionRef;

/// Why an action cannot be used at all, whatever the target.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionUnavailability {
    Dead,
    NotPlaying,
    Overheated,
    Power,
    Pinned,
    Vigilance,
}

impl ActionUnavailability {
    /// Human-readable reason, for tooltips and logs.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Dead => "ship destroyed",
            Self::NotPlaying => "ship not playing",
            Self::Overheated => "overheated",
            Self::Power => "not enough power",
            Self::Pinned => "pinned",
            Self::Vigilance => "vigilance active",
        }
    }
}

/// Errors raised when resolving an action.
///
/// Validation failures are soft rejections: nothing was applied and the
/// caller may pick another action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("ship {0} is not in the battle")]
    ShipMissing(ShipId),

    #[error("ship {0} has no action {1}")]
    UnknownAction(ShipId, ActionRef),

    #[error("ship {0} is not playing")]
    NotPlaying(ShipId),

    #[error("no ship is playing")]
    NoPlayingShip,

    #[error("action unavailable: {}", .0.message())]
    Unavailable(ActionUnavailability),

    #[error("target rejected for {0}")]
    TargetRejected(ActionRef),

    #[error("action {0} produced no diffs")]
    NoDiffs(ActionRef),

    #[error("battle already ended")]
    BattleEnded,
}

impl BattleError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ShipMissing(_) | Self::UnknownAction(..) => ErrorSeverity::Validation,
            Self::NotPlaying(_) | Self::Unavailable(_) => ErrorSeverity::Recoverable,
            Self::NoPlayingShip => ErrorSeverity::Internal,
            Self::TargetRejected(_) => ErrorSeverity::Validation,
            Self::NoDiffs(_) => ErrorSeverity::Internal,
            Self::BattleEnded => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ShipMissing(_) => "ACTION_SHIP_MISSING",
            Self::UnknownAction(..) => "ACTION_UNKNOWN",
            Self::NotPlaying(_) => "ACTION_NOT_PLAYING",
            Self::NoPlayingShip => "ACTION_NO_PLAYING_SHIP",
            Self::Unavailable(_) => "ACTION_UNAVAILABLE",
            Self::TargetRejected(_) => "ACTION_TARGET_REJECTED",
            Self::NoDiffs(_) => "ACTION_NO_DIFFS",
            Self::BattleEnded => "ACTION_BATTLE_ENDED",
        }
    }
}
