//! Public runtime API surface.

pub mod errors;
pub mod providers;

pub use errors::{ProviderKind, Result, RuntimeError};
pub use providers::{
    PassiveProvider, PredictionProvider, PredictionRequest, ReservationChoice,
    ReservationProvider, ReservationRequest, ScriptedProvider,
};
