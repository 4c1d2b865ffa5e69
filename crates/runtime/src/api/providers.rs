//! Asynchronous abstraction for sourcing reservations and predictions.
//!
//! Runtime users plug in provider implementations so battles can run with
//! human input, scripted fixtures, or AI policies. Providers only see
//! read-only views; the session submits their choices to the engine and
//! reports rejections on the event bus.
use std::collections::VecDeque;

use async_trait::async_trait;
use battle_core::{
    AttackType, CombatantId, InteractionTable, PredictionInput, Roster, SlotView,
};
use tokio::sync::Mutex;

use super::errors::{ProviderKind, Result, RuntimeError};

/// One reservation a provider wants to make.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservationChoice {
    pub attack: AttackType,
    pub target: CombatantId,
}

impl ReservationChoice {
    pub const fn new(attack: AttackType, target: CombatantId) -> Self {
        Self { attack, target }
    }
}

/// What the acting side sees when planning a turn.
#[derive(Clone, Copy, Debug)]
pub struct ReservationRequest<'a> {
    pub turn_number: u32,
    pub actor: CombatantId,
    /// Default target chosen when the turn began.
    pub target: CombatantId,
    pub max_reservations: u32,
    pub roster: &'a Roster,
    pub table: &'a InteractionTable,
}

/// What the defending side sees when answering a turn.
#[derive(Clone, Copy, Debug)]
pub struct PredictionRequest<'a> {
    pub turn_number: u32,
    pub attacker: CombatantId,
    /// Reservation queue with unrevealed attack types masked.
    pub slots: &'a [SlotView],
    pub cover_remaining: u32,
    pub roster: &'a Roster,
    pub table: &'a InteractionTable,
}

/// Trait for planning the acting side's reservations.
///
/// Choices are submitted in order; rejected ones are skipped.
#[async_trait]
pub trait ReservationProvider: Send + Sync {
    async fn provide_reservations(
        &self,
        request: &ReservationRequest<'_>,
    ) -> Result<Vec<ReservationChoice>>;
}

/// Trait for answering the slots of the opposing side.
///
/// Slots left without an input resolve undefended.
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn provide_predictions(
        &self,
        request: &PredictionRequest<'_>,
    ) -> Result<Vec<PredictionInput>>;
}

/// Never reserves and never responds.
/// Useful for testing or as a fallback.
pub struct PassiveProvider;

#[async_trait]
impl ReservationProvider for PassiveProvider {
    async fn provide_reservations(
        &self,
        _request: &ReservationRequest<'_>,
    ) -> Result<Vec<ReservationChoice>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl PredictionProvider for PassiveProvider {
    async fn provide_predictions(
        &self,
        _request: &PredictionRequest<'_>,
    ) -> Result<Vec<PredictionInput>> {
        Ok(Vec::new())
    }
}

/// Replays pre-recorded turns in order (fixtures, replays, player input
/// collected ahead of time).
///
/// Fails once a script runs out so that the session can abandon the turn.
#[derive(Default)]
pub struct ScriptedProvider {
    reservations: Mutex<VecDeque<Vec<ReservationChoice>>>,
    predictions: Mutex<VecDeque<Vec<PredictionInput>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reservations(mut self, turn: Vec<ReservationChoice>) -> Self {
        self.reservations.get_mut().push_back(turn);
        self
    }

    pub fn with_predictions(mut self, turn: Vec<PredictionInput>) -> Self {
        self.predictions.get_mut().push_back(turn);
        self
    }

    pub async fn push_reservations(&self, turn: Vec<ReservationChoice>) {
        self.reservations.lock().await.push_back(turn);
    }

    pub async fn push_predictions(&self, turn: Vec<PredictionInput>) {
        self.predictions.lock().await.push_back(turn);
    }
}

#[async_trait]
impl ReservationProvider for ScriptedProvider {
    async fn provide_reservations(
        &self,
        request: &ReservationRequest<'_>,
    ) -> Result<Vec<ReservationChoice>> {
        self.reservations.lock().await.pop_front().ok_or_else(|| {
            RuntimeError::provider(
                ProviderKind::Reservation,
                format!("script exhausted at turn {}", request.turn_number),
            )
        })
    }
}

#[async_trait]
impl PredictionProvider for ScriptedProvider {
    async fn provide_predictions(
        &self,
        request: &PredictionRequest<'_>,
    ) -> Result<Vec<PredictionInput>> {
        self.predictions.lock().await.pop_front().ok_or_else(|| {
            RuntimeError::provider(
                ProviderKind::Prediction,
                format!("script exhausted at turn {}", request.turn_number),
            )
        })
    }
}
