//! Battle event payloads.

use battle_core::{
    AttackType, CombatantId, PredictionAck, PredictionInput, Side, SlotResolution,
};
use serde::{Deserialize, Serialize};

use super::Topic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted {
        turn_number: u32,
        actor: CombatantId,
        target: CombatantId,
        max_reservations: u32,
    },

    ReservationAccepted {
        turn_number: u32,
        slot_index: usize,
        attack: AttackType,
        target: CombatantId,
        revealed: bool,
    },

    ReservationRejected {
        turn_number: u32,
        attack: AttackType,
        target: CombatantId,
        error_code: String,
        reason: String,
    },

    PredictionAccepted {
        turn_number: u32,
        ack: PredictionAck,
    },

    PredictionRejected {
        turn_number: u32,
        input: PredictionInput,
        error_code: String,
        reason: String,
    },

    /// One slot after resolution, in slot order.
    SlotResolved {
        turn_number: u32,
        resolution: SlotResolution,
    },

    CombatantDefeated {
        turn_number: u32,
        combatant: CombatantId,
    },

    TurnEnded {
        turn_number: u32,
        slots: usize,
        unanswered: Vec<usize>,
    },

    BattleFinished {
        winner: Option<Side>,
        turns: u32,
    },
}

impl BattleEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BattleEvent::TurnStarted { .. } | BattleEvent::TurnEnded { .. } => Topic::Turn,
            BattleEvent::ReservationAccepted { .. }
            | BattleEvent::ReservationRejected { .. }
            | BattleEvent::PredictionAccepted { .. }
            | BattleEvent::PredictionRejected { .. } => Topic::Input,
            BattleEvent::SlotResolved { .. } | BattleEvent::CombatantDefeated { .. } => {
                Topic::Resolution
            }
            BattleEvent::BattleFinished { .. } => Topic::Battle,
        }
    }
}
