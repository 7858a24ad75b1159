//! Common error infrastructure for tactics-core.
//!
//! Domain errors (e.g. [`crate::action::ActionError`]) live next to the code
//! that produces them. This module only holds the shared classification.
//!
//! Resolution itself never fails hard: diffs that cannot find their entity
//! report [`DiffOutcome::Skipped`] and log a warning, so a single bad entry
//! never aborts replay of the rest of the log.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (e.g. after power recharge)
/// - **Validation**: the request was invalid and should not be retried as-is
/// - **Internal**: state inconsistency, indicates an authoring or replay bug
/// - **Fatal**: the battle state cannot be trusted anymore
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all tactics-core errors.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Result of applying or reverting a single diff.
///
/// `Skipped` is not an error: the entity was missing (stale reference) or the
/// diff did not match the entity it found (invariant violation). Both cases
/// are logged where they are detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffOutcome {
    Applied,
    Skipped(SkipReason),
}

impl DiffOutcome {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why a diff was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Referenced ship, drone or equipment is not in the battle.
    StaleReference,
    /// Referenced entity exists but is not in the expected shape.
    InvariantViolation,
}

impl SkipReason {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::StaleReference => ErrorSeverity::Recoverable,
            Self::InvariantViolation => ErrorSeverity::Internal,
        }
    }
}
