//! Reservation phase: the acting side commits attacks slot by slot.
//!
//! A hand is spent the moment a reservation is accepted, so a combatant can
//! never queue more attacks of a type than it has hands for. Every rejection
//! happens before any mutation.

use super::context::{BattleContext, PlannedAction, TurnPhase};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{AttackType, CombatantId, Roster};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReservationError {
    #[error("no reservation phase is open")]
    PhaseClosed,

    #[error("reservation queue is full ({max} slots)")]
    QueueFull { max: u32 },

    #[error("{actor} has no {attack} hands left")]
    NoHands {
        actor: CombatantId,
        attack: AttackType,
    },

    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    #[error("{target} is not an opponent of {actor}")]
    InvalidTarget {
        actor: CombatantId,
        target: CombatantId,
    },

    #[error("{0} is already defeated")]
    Defeated(CombatantId),
}

impl BattleError for ReservationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::QueueFull { .. } | Self::NoHands { .. } => ErrorSeverity::Recoverable,
            Self::UnknownCombatant(_) | Self::InvalidTarget { .. } | Self::Defeated(_) => {
                ErrorSeverity::Validation
            }
            Self::PhaseClosed => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseClosed => "RESERVATION_PHASE_CLOSED",
            Self::QueueFull { .. } => "RESERVATION_QUEUE_FULL",
            Self::NoHands { .. } => "RESERVATION_NO_HANDS",
            Self::UnknownCombatant(_) => "RESERVATION_UNKNOWN_COMBATANT",
            Self::InvalidTarget { .. } => "RESERVATION_INVALID_TARGET",
            Self::Defeated(_) => "RESERVATION_DEFEATED",
        }
    }
}

/// Whether the defender gets to see the attack type of a slot.
pub fn is_revealed(actor_insight: i32, defender_confuse: i32, threshold: i32) -> bool {
    i64::from(actor_insight) - i64::from(defender_confuse) >= i64::from(threshold)
}

/// Appends a planned action for the turn's current actor.
///
/// Returns the slot index assigned to the reservation.
pub fn reserve(
    ctx: &mut BattleContext,
    roster: &mut Roster,
    attack: AttackType,
    target: CombatantId,
    reveal_threshold: i32,
) -> Result<usize, ReservationError> {
    if ctx.phase != TurnPhase::Reservation {
        return Err(ReservationError::PhaseClosed);
    }
    if ctx.is_reservation_full() {
        return Err(ReservationError::QueueFull {
            max: ctx.current_max_reservations,
        });
    }

    let actor_id = ctx.current_actor;
    let actor = roster
        .get(actor_id)
        .ok_or(ReservationError::UnknownCombatant(actor_id))?;
    let defender = roster
        .get(target)
        .ok_or(ReservationError::UnknownCombatant(target))?;

    if !actor.is_alive() {
        return Err(ReservationError::Defeated(actor_id));
    }
    if defender.side == actor.side {
        return Err(ReservationError::InvalidTarget {
            actor: actor_id,
            target,
        });
    }
    if !defender.is_alive() {
        return Err(ReservationError::Defeated(target));
    }

    let revealed = is_revealed(actor.stats.insight, defender.stats.confuse, reveal_threshold);

    let actor = roster
        .get_mut(actor_id)
        .ok_or(ReservationError::UnknownCombatant(actor_id))?;
    if !actor.stats.hands.try_consume(attack) {
        return Err(ReservationError::NoHands {
            actor: actor_id,
            attack,
        });
    }

    let slot_index = ctx.reserve_queue.len();
    ctx.reserve_queue.push(PlannedAction {
        attacker_id: actor_id,
        target_id: target,
        original_target_id: target,
        attack,
        slot_index,
        revealed,
    });
    if revealed {
        ctx.reveal_count += 1;
    }

    Ok(slot_index)
}
