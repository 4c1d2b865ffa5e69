//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine, repositories, and decision providers so
//! clients can bubble them up with consistent context.
use std::fmt;

use battle_core::{CombatantId, Side, TurnError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} provider not set for the {side} side")]
    ProviderNotSet { kind: ProviderKind, side: Side },

    #[error("{0} has no living opponent to attack")]
    NoTarget(CombatantId),

    #[error("{kind} provider failed: {message}")]
    Provider { kind: ProviderKind, message: String },

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("no save repository configured")]
    RepositoryNotSet,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("saved roster is invalid: {0}")]
    InvalidSave(#[from] battle_core::RosterError),
}

impl RuntimeError {
    pub fn provider(kind: ProviderKind, message: impl Into<String>) -> Self {
        Self::Provider {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Reservation,
    Prediction,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Reservation => "reservation",
            ProviderKind::Prediction => "prediction",
        };
        write!(f, "{}", label)
    }
}
