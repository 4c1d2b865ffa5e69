//! Common error infrastructure for battle-core.
//!
//! Phase-specific errors (`ReservationError`, `PredictionError`, `TurnError`)
//! live next to the operations they validate. Every one of them is returned
//! before any state is touched, so an `Err` always means "nothing changed".

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may pick another choice and retry
/// - **Validation**: the input was malformed for the current turn
/// - **Internal**: the caller drove the state machine out of order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Resource exhausted (hands, queue slots). Offer a different choice.
    Recoverable,

    /// Invalid input such as unknown combatants or slots.
    Validation,

    /// Phase ordering violated by the caller.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a caller bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
