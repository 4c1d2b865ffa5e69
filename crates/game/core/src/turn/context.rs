//! Per-turn state shared by the reservation, prediction and resolution phases.

use arrayvec::ArrayVec;

use crate::combat::ActionOutcome;
use crate::config::BattleConfig;
use crate::state::{AttackType, CombatantId, ResponseType};

/// Where the active turn currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// The acting side is filling reservation slots.
    Reservation,
    /// The defending side is answering slots.
    Prediction,
    /// Outcomes have been applied; only `end_turn` remains.
    Resolved,
}

/// One committed attack of the acting side.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedAction {
    pub attacker_id: CombatantId,
    /// Current target. Reassigned when an ally covers.
    pub target_id: CombatantId,
    /// Target chosen at reservation time.
    pub original_target_id: CombatantId,
    pub attack: AttackType,
    pub slot_index: usize,
    pub revealed: bool,
}

impl PlannedAction {
    pub fn is_covered(&self) -> bool {
        self.target_id != self.original_target_id
    }
}

/// The defending side's answer to one slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictedResponse {
    pub responder_id: CombatantId,
    pub response: ResponseType,
    pub slot_index: usize,
    /// Filled in by the resolver.
    pub outcome: ActionOutcome,
}

impl PredictedResponse {
    pub fn new(responder_id: CombatantId, response: ResponseType, slot_index: usize) -> Self {
        Self {
            responder_id,
            response,
            slot_index,
            outcome: ActionOutcome::default(),
        }
    }

    /// Default for unanswered slots.
    pub fn undefended(action: &PlannedAction) -> Self {
        Self::new(action.target_id, ResponseType::None, action.slot_index)
    }
}

pub type ReserveQueue = ArrayVec<PlannedAction, { BattleConfig::MAX_SLOTS }>;
pub type PredictQueue = ArrayVec<PredictedResponse, { BattleConfig::MAX_SLOTS }>;

/// A slot as the defending side sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotView {
    pub slot_index: usize,
    pub attacker_id: CombatantId,
    pub target_id: CombatantId,
    /// `None` when the slot is not revealed to the defender.
    pub attack: Option<AttackType>,
}

/// State of the single active turn.
///
/// Created by `BattleEngine::begin_turn` and dropped by `end_turn` or
/// `abandon_turn`.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleContext {
    pub turn_number: u32,
    pub current_actor: CombatantId,
    pub current_target: CombatantId,
    pub player_is_reservation_side: bool,
    pub current_max_reservations: u32,
    pub reserve_queue: ReserveQueue,
    pub predict_queue: PredictQueue,
    pub reveal_count: u32,
    pub cover_remaining: u32,
    pub phase: TurnPhase,
}

impl BattleContext {
    pub fn new(
        turn_number: u32,
        current_actor: CombatantId,
        current_target: CombatantId,
        player_is_reservation_side: bool,
        current_max_reservations: u32,
        cover_remaining: u32,
    ) -> Self {
        Self {
            turn_number,
            current_actor,
            current_target,
            player_is_reservation_side,
            current_max_reservations: BattleConfig::slot_limit(current_max_reservations),
            reserve_queue: ReserveQueue::new(),
            predict_queue: PredictQueue::new(),
            reveal_count: 0,
            cover_remaining,
            phase: TurnPhase::Reservation,
        }
    }

    pub fn is_reservation_full(&self) -> bool {
        self.reserve_queue.len() as u32 >= self.current_max_reservations
            || self.reserve_queue.is_full()
    }

    pub fn planned(&self, slot_index: usize) -> Option<&PlannedAction> {
        self.reserve_queue.iter().find(|a| a.slot_index == slot_index)
    }

    pub fn prediction(&self, slot_index: usize) -> Option<&PredictedResponse> {
        self.predict_queue.iter().find(|p| p.slot_index == slot_index)
    }

    /// Slots that have no response yet, in slot order.
    pub fn unanswered_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.reserve_queue
            .iter()
            .map(|a| a.slot_index)
            .filter(|slot| self.prediction(*slot).is_none())
    }

    /// The reservation queue with unrevealed attack types masked.
    pub fn defender_view(&self) -> Vec<SlotView> {
        self.reserve_queue
            .iter()
            .map(|action| SlotView {
                slot_index: action.slot_index,
                attacker_id: action.attacker_id,
                target_id: action.target_id,
                attack: action.revealed.then_some(action.attack),
            })
            .collect()
    }
}
