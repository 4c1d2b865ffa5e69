//! Battle session: drives the engine turn by turn.
//!
//! The session awaits providers only between engine calls; the engine itself
//! never suspends. Every choice the engine rejects is reported on the event
//! bus and skipped, so one bad choice never aborts a turn.

use std::collections::HashMap;
use std::sync::Arc;

use battle_core::{
    BattleEngine, BattleError as _, CombatantId, PredictionAck, ReservationError, Side, TurnError,
    TurnResolution,
};
use tracing::{debug, info, warn};

use crate::api::{
    PredictionProvider, PredictionRequest, ProviderKind, ReservationProvider, ReservationRequest,
    Result, RuntimeError,
};
use crate::events::{BattleEvent, EventBus};
use crate::repository::{RosterRecord, SaveRepository};

/// Result of one completed turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnSummary {
    pub turn_number: u32,
    pub actor: CombatantId,
    pub target: CombatantId,
    pub resolution: TurnResolution,
}

/// Result of a whole battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleReport {
    /// `None` on a draw (turn limit or mutual defeat).
    pub winner: Option<Side>,
    pub turns: u32,
}

pub struct BattleSession {
    engine: BattleEngine,
    events: EventBus,
    reservation: HashMap<Side, Arc<dyn ReservationProvider>>,
    prediction: HashMap<Side, Arc<dyn PredictionProvider>>,
    repository: Option<Arc<dyn SaveRepository>>,
}

impl BattleSession {
    pub fn new(engine: BattleEngine) -> Self {
        Self {
            engine,
            events: EventBus::new(),
            reservation: HashMap::new(),
            prediction: HashMap::new(),
            repository: None,
        }
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_repository(mut self, repository: Arc<dyn SaveRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Uses one provider for both phases of `side`.
    pub fn with_provider<P>(mut self, side: Side, provider: Arc<P>) -> Self
    where
        P: ReservationProvider + PredictionProvider + 'static,
    {
        self.reservation.insert(side, provider.clone());
        self.prediction.insert(side, provider);
        self
    }

    pub fn set_reservation_provider(&mut self, side: Side, provider: Arc<dyn ReservationProvider>) {
        self.reservation.insert(side, provider);
    }

    pub fn set_prediction_provider(&mut self, side: Side, provider: Arc<dyn PredictionProvider>) {
        self.prediction.insert(side, provider);
    }

    pub fn engine(&self) -> &BattleEngine {
        &self.engine
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn into_engine(self) -> BattleEngine {
        self.engine
    }

    fn side_of(&self, id: CombatantId) -> Result<Side> {
        self.engine
            .roster()
            .get(id)
            .map(|c| c.side)
            .ok_or(RuntimeError::Turn(TurnError::UnknownCombatant(id)))
    }

    /// Plays one full turn with `actor` attacking.
    ///
    /// A provider failure abandons the turn (hands are refunded) and is
    /// returned to the caller.
    pub async fn run_turn(&mut self, actor: CombatantId) -> Result<TurnSummary> {
        let side = self.side_of(actor)?;
        let reservation = self
            .reservation
            .get(&side)
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet {
                kind: ProviderKind::Reservation,
                side,
            })?;
        let prediction = self
            .prediction
            .get(&side.opponent())
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet {
                kind: ProviderKind::Prediction,
                side: side.opponent(),
            })?;
        let target = self
            .engine
            .default_target(actor)
            .ok_or(RuntimeError::NoTarget(actor))?;

        let ctx = self.engine.begin_turn(actor, target)?;
        let turn_number = ctx.turn_number;
        let max_reservations = ctx.current_max_reservations;
        info!(turn = turn_number, %actor, %target, "turn started");
        self.events.publish(BattleEvent::TurnStarted {
            turn_number,
            actor,
            target,
            max_reservations,
        });

        if let Err(err) = self.reservation_phase(reservation.as_ref(), turn_number).await {
            self.abandon(turn_number, &err)?;
            return Err(err);
        }

        self.engine.close_reservations()?;

        if let Err(err) = self.prediction_phase(prediction.as_ref(), actor, turn_number).await {
            self.abandon(turn_number, &err)?;
            return Err(err);
        }

        let unanswered: Vec<usize> = self
            .engine
            .context()
            .map(|ctx| ctx.unanswered_slots().collect())
            .unwrap_or_default();
        let resolution = self.engine.resolve()?;
        self.publish_resolution(turn_number, &resolution);

        let finished = self.engine.end_turn()?;
        info!(
            turn = turn_number,
            slots = finished.reserve_queue.len(),
            defeated = resolution.defeated.len(),
            "turn ended"
        );
        self.events.publish(BattleEvent::TurnEnded {
            turn_number,
            slots: finished.reserve_queue.len(),
            unanswered,
        });

        Ok(TurnSummary {
            turn_number,
            actor,
            target,
            resolution,
        })
    }

    fn abandon(&mut self, turn_number: u32, cause: &RuntimeError) -> Result<()> {
        warn!(turn = turn_number, error = %cause, "abandoning turn");
        self.engine.abandon_turn()?;
        Ok(())
    }

    async fn reservation_phase(
        &mut self,
        provider: &dyn ReservationProvider,
        turn_number: u32,
    ) -> Result<()> {
        let choices = {
            let Some(ctx) = self.engine.context() else {
                return Err(TurnError::NoActiveTurn.into());
            };
            let request = ReservationRequest {
                turn_number,
                actor: ctx.current_actor,
                target: ctx.current_target,
                max_reservations: ctx.current_max_reservations,
                roster: self.engine.roster(),
                table: &self.engine.config().interaction,
            };
            provider.provide_reservations(&request).await?
        };

        for choice in choices {
            match self.engine.reserve(choice.attack, choice.target) {
                Ok(slot_index) => {
                    let revealed = self
                        .engine
                        .context()
                        .and_then(|ctx| ctx.planned(slot_index))
                        .is_some_and(|action| action.revealed);
                    debug!(slot = slot_index, attack = %choice.attack, target = %choice.target, revealed, "reserved");
                    self.events.publish(BattleEvent::ReservationAccepted {
                        turn_number,
                        slot_index,
                        attack: choice.attack,
                        target: choice.target,
                        revealed,
                    });
                }
                Err(TurnError::Reservation(err)) => {
                    warn!(attack = %choice.attack, target = %choice.target, error = %err, "reservation rejected");
                    self.events.publish(BattleEvent::ReservationRejected {
                        turn_number,
                        attack: choice.attack,
                        target: choice.target,
                        error_code: err.error_code().to_owned(),
                        reason: err.to_string(),
                    });
                    if matches!(err, ReservationError::QueueFull { .. }) {
                        break;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    async fn prediction_phase(
        &mut self,
        provider: &dyn PredictionProvider,
        attacker: CombatantId,
        turn_number: u32,
    ) -> Result<()> {
        let inputs = {
            let slots = self.engine.defender_view()?;
            let cover_remaining = self
                .engine
                .context()
                .map(|ctx| ctx.cover_remaining)
                .unwrap_or_default();
            let request = PredictionRequest {
                turn_number,
                attacker,
                slots: &slots,
                cover_remaining,
                roster: self.engine.roster(),
                table: &self.engine.config().interaction,
            };
            provider.provide_predictions(&request).await?
        };

        for input in inputs {
            match self.engine.predict(input) {
                Ok(ack) => {
                    match ack {
                        PredictionAck::Accepted {
                            slot_index,
                            responder,
                            response,
                        } => {
                            debug!(slot = slot_index, %responder, ?response, "prediction accepted")
                        }
                        PredictionAck::CoverFallback { slot_index, reason } => {
                            warn!(slot = slot_index, ?reason, "cover fell back to self-response")
                        }
                    }
                    self.events
                        .publish(BattleEvent::PredictionAccepted { turn_number, ack });
                }
                Err(TurnError::Prediction(err)) => {
                    warn!(slot = input.slot_index, error = %err, "prediction rejected");
                    self.events.publish(BattleEvent::PredictionRejected {
                        turn_number,
                        input,
                        error_code: err.error_code().to_owned(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn publish_resolution(&self, turn_number: u32, resolution: &TurnResolution) {
        for slot in &resolution.slots {
            debug!(
                slot = slot.slot_index,
                attacker = %slot.attacker_id,
                defender = %slot.defender_id,
                attack = %slot.attack,
                response = ?slot.response,
                outcome = slot.outcome.tag(),
                "slot resolved"
            );
            self.events.publish(BattleEvent::SlotResolved {
                turn_number,
                resolution: slot.clone(),
            });
        }
        for &combatant in &resolution.defeated {
            info!(turn = turn_number, %combatant, "combatant defeated");
            self.events.publish(BattleEvent::CombatantDefeated {
                turn_number,
                combatant,
            });
        }
    }

    /// Plays rounds in speed order until one side falls or the configured
    /// turn limit is reached.
    pub async fn run_battle(&mut self) -> Result<BattleReport> {
        let max_turns = self.engine.config().max_turns;

        'rounds: while !self.engine.is_over() && self.engine.turn_number() < max_turns {
            for actor in self.engine.turn_order() {
                if self.engine.is_over() || self.engine.turn_number() >= max_turns {
                    break 'rounds;
                }
                let alive = self
                    .engine
                    .roster()
                    .get(actor)
                    .is_some_and(|c| c.is_alive());
                if alive {
                    self.run_turn(actor).await?;
                }
            }
        }

        let report = BattleReport {
            winner: self.engine.winner(),
            turns: self.engine.turn_number(),
        };
        info!(winner = ?report.winner, turns = report.turns, "battle finished");
        self.events.publish(BattleEvent::BattleFinished {
            winner: report.winner,
            turns: report.turns,
        });
        Ok(report)
    }

    /// Writes the current roster to `slot`.
    pub fn save(&self, slot: &str) -> Result<()> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(RuntimeError::RepositoryNotSet)?;
        let record = RosterRecord::capture(self.engine.roster(), self.engine.turn_number());
        repository.save(slot, &record)?;
        info!(slot, turn = record.turn_number, "roster saved");
        Ok(())
    }

    /// Replaces the roster and turn counter with the ones stored in `slot`.
    /// Returns `false` when the slot is empty.
    pub fn restore(&mut self, slot: &str) -> Result<bool> {
        let repository = self
            .repository
            .clone()
            .ok_or(RuntimeError::RepositoryNotSet)?;
        let Some(record) = repository.load(slot)? else {
            return Ok(false);
        };
        let restored = record.to_roster()?;
        self.engine.resume(restored, record.turn_number)?;
        info!(slot, turn = record.turn_number, "roster restored");
        Ok(true)
    }
}
