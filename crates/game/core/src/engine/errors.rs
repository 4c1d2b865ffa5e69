//! Errors surfaced by the battle engine's turn state machine.

use crate::error::{BattleError, ErrorSeverity};
use crate::state::{CombatantId, Side};
use crate::turn::{PredictionError, ReservationError, TurnPhase};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("turn {0} is still in progress")]
    TurnInProgress(u32),

    #[error("no turn is active")]
    NoActiveTurn,

    #[error("expected {expected} phase, turn is in {actual} phase")]
    WrongPhase {
        expected: TurnPhase,
        actual: TurnPhase,
    },

    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    #[error("{0} is already defeated")]
    Defeated(CombatantId),

    #[error("{target} is not an opponent of {actor}")]
    InvalidTarget {
        actor: CombatantId,
        target: CombatantId,
    },

    #[error("battle is over ({0:?} won)")]
    BattleOver(Option<Side>),

    #[error(transparent)]
    Reservation(#[from] ReservationError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl TurnError {
    pub(crate) fn wrong_phase(expected: TurnPhase, actual: TurnPhase) -> Self {
        Self::WrongPhase { expected, actual }
    }
}

impl BattleError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Reservation(err) => err.severity(),
            Self::Prediction(err) => err.severity(),
            Self::UnknownCombatant(_) | Self::Defeated(_) | Self::InvalidTarget { .. } => {
                ErrorSeverity::Validation
            }
            Self::TurnInProgress(_)
            | Self::NoActiveTurn
            | Self::WrongPhase { .. }
            | Self::BattleOver(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TurnInProgress(_) => "TURN_IN_PROGRESS",
            Self::NoActiveTurn => "TURN_NOT_ACTIVE",
            Self::WrongPhase { .. } => "TURN_WRONG_PHASE",
            Self::UnknownCombatant(_) => "TURN_UNKNOWN_COMBATANT",
            Self::Defeated(_) => "TURN_DEFEATED",
            Self::InvalidTarget { .. } => "TURN_INVALID_TARGET",
            Self::BattleOver(_) => "TURN_BATTLE_OVER",
            Self::Reservation(err) => err.error_code(),
            Self::Prediction(err) => err.error_code(),
        }
    }
}
