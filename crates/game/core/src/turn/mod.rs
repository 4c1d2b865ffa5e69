//! The reservation/prediction turn protocol.
//!
//! ```text
//! begin_turn ─▶ Reservation ─close─▶ Prediction ─resolve─▶ Resolved ─end_turn─▶ (none)
//!                    └──────────── abandon_turn ────────────┘
//! ```

pub mod context;
pub mod prediction;
pub mod reservation;

pub use context::{
    BattleContext, PlannedAction, PredictQueue, PredictedResponse, ReserveQueue, SlotView,
    TurnPhase,
};
pub use prediction::{CoverFallback, PredictionAck, PredictionError, PredictionInput, predict};
pub use reservation::{ReservationError, is_revealed, reserve};
