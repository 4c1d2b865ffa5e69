//! Prediction phase: the defending side answers each reservation slot.
//!
//! At most one response per slot. Counters spend a hand of the matching type
//! on the responder (unless it has 反撃無制限). Cover hands the slot to an
//! ally and spends one cover charge; without charges, or with an unusable
//! redirect, it quietly degrades to an undefended self-response.

use super::context::{BattleContext, PredictedResponse, TurnPhase};
use crate::error::{BattleError, ErrorSeverity};
use crate::skill::CombatFlags;
use crate::state::{AttackType, CombatantId, ResponseType, Roster};

/// A defender's submission for one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionInput {
    pub slot_index: usize,
    pub response: ResponseType,
    /// Ally taking over the slot; only read for `Cover`.
    pub redirect: Option<CombatantId>,
}

impl PredictionInput {
    pub const fn new(slot_index: usize, response: ResponseType) -> Self {
        Self {
            slot_index,
            response,
            redirect: None,
        }
    }

    pub const fn cover(slot_index: usize, ally: CombatantId) -> Self {
        Self {
            slot_index,
            response: ResponseType::Cover,
            redirect: Some(ally),
        }
    }
}

/// Why a cover request fell back to a self-response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoverFallback {
    NoCoverRemaining,
    InvalidRedirect,
}

/// Result of an accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PredictionAck {
    Accepted {
        slot_index: usize,
        responder: CombatantId,
        response: ResponseType,
    },
    CoverFallback {
        slot_index: usize,
        reason: CoverFallback,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    #[error("no prediction phase is open")]
    PhaseClosed,

    #[error("slot {0} has no reservation")]
    UnknownSlot(usize),

    #[error("slot {0} already has a response")]
    AlreadyAnswered(usize),

    #[error("{responder} has no {hand} hands left to counter")]
    NoCounterHands {
        responder: CombatantId,
        hand: AttackType,
    },

    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),
}

impl BattleError for PredictionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoCounterHands { .. } => ErrorSeverity::Recoverable,
            Self::UnknownSlot(_) | Self::AlreadyAnswered(_) | Self::UnknownCombatant(_) => {
                ErrorSeverity::Validation
            }
            Self::PhaseClosed => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseClosed => "PREDICTION_PHASE_CLOSED",
            Self::UnknownSlot(_) => "PREDICTION_UNKNOWN_SLOT",
            Self::AlreadyAnswered(_) => "PREDICTION_ALREADY_ANSWERED",
            Self::NoCounterHands { .. } => "PREDICTION_NO_COUNTER_HANDS",
            Self::UnknownCombatant(_) => "PREDICTION_UNKNOWN_COMBATANT",
        }
    }
}

/// Records the defending side's response for one slot.
pub fn predict(
    ctx: &mut BattleContext,
    roster: &mut Roster,
    input: PredictionInput,
) -> Result<PredictionAck, PredictionError> {
    if ctx.phase != TurnPhase::Prediction {
        return Err(PredictionError::PhaseClosed);
    }
    let position = ctx
        .reserve_queue
        .iter()
        .position(|a| a.slot_index == input.slot_index)
        .ok_or(PredictionError::UnknownSlot(input.slot_index))?;
    if ctx.prediction(input.slot_index).is_some() {
        return Err(PredictionError::AlreadyAnswered(input.slot_index));
    }

    let slot_index = input.slot_index;
    let target = ctx.reserve_queue[position].target_id;

    let ack = match input.response {
        ResponseType::Cover => {
            let fallback = if ctx.cover_remaining == 0 {
                Some(CoverFallback::NoCoverRemaining)
            } else if !valid_cover(roster, target, input.redirect) {
                Some(CoverFallback::InvalidRedirect)
            } else {
                None
            };

            match (fallback, input.redirect) {
                (None, Some(ally)) => {
                    ctx.cover_remaining -= 1;
                    ctx.reserve_queue[position].target_id = ally;
                    push(ctx, PredictedResponse::new(ally, ResponseType::Cover, slot_index));
                    PredictionAck::Accepted {
                        slot_index,
                        responder: ally,
                        response: ResponseType::Cover,
                    }
                }
                (reason, _) => {
                    push(ctx, PredictedResponse::new(target, ResponseType::None, slot_index));
                    PredictionAck::CoverFallback {
                        slot_index,
                        reason: reason.unwrap_or(CoverFallback::InvalidRedirect),
                    }
                }
            }
        }
        response => {
            if let Some(hand) = response.counter_hand() {
                let responder = roster
                    .get_mut(target)
                    .ok_or(PredictionError::UnknownCombatant(target))?;
                let unlimited = responder.flags().contains(CombatFlags::UNLIMITED_COUNTER);
                if !unlimited && !responder.stats.hands.try_consume(hand) {
                    return Err(PredictionError::NoCounterHands {
                        responder: target,
                        hand,
                    });
                }
            }
            push(ctx, PredictedResponse::new(target, response, slot_index));
            PredictionAck::Accepted {
                slot_index,
                responder: target,
                response,
            }
        }
    };

    Ok(ack)
}

fn valid_cover(roster: &Roster, target: CombatantId, redirect: Option<CombatantId>) -> bool {
    let Some(ally) = redirect else {
        return false;
    };
    roster.are_allies(target, ally) && roster.get(ally).is_some_and(|c| c.is_alive())
}

fn push(ctx: &mut BattleContext, response: PredictedResponse) {
    // Capacity matches the reservation queue and each slot is answered once.
    let pushed = ctx.predict_queue.try_push(response);
    debug_assert!(pushed.is_ok(), "prediction queue outgrew the reservations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::{Skill, SkillCategory, SkillTrigger, names};
    use crate::state::{Combatant, Side};
    use crate::stats::{HandsLedger, StatBlock};
    use crate::turn::context::PlannedAction;

    const ATTACKER: CombatantId = CombatantId(1);
    const DEFENDER: CombatantId = CombatantId(2);
    const ALLY: CombatantId = CombatantId(3);

    fn setup(defender_hands: [u32; 3], defender_skills: Vec<Skill>) -> (BattleContext, Roster) {
        let block = |hands| StatBlock::with_max_hp(30).with_hands(HandsLedger::new(hands));
        let roster = Roster::from_combatants([
            Combatant::new(ATTACKER, "a", Side::Enemy, block([3, 3, 3]), Vec::new()),
            Combatant::new(DEFENDER, "d", Side::Player, block(defender_hands), defender_skills),
            Combatant::new(ALLY, "ally", Side::Player, block([1, 1, 1]), Vec::new()),
        ])
        .unwrap();

        let mut ctx = BattleContext::new(1, ATTACKER, DEFENDER, false, 6, 1);
        for (slot_index, attack) in [AttackType::Slash, AttackType::Down, AttackType::Thrust]
            .into_iter()
            .enumerate()
        {
            ctx.reserve_queue.push(PlannedAction {
                attacker_id: ATTACKER,
                target_id: DEFENDER,
                original_target_id: DEFENDER,
                attack,
                slot_index,
                revealed: true,
            });
        }
        ctx.phase = TurnPhase::Prediction;
        (ctx, roster)
    }

    fn hands(roster: &Roster, id: CombatantId, attack: AttackType) -> u32 {
        roster.get(id).unwrap().stats.remaining_hands(attack)
    }

    #[test]
    fn counter_spends_matching_hand() {
        let (mut ctx, mut roster) = setup([0, 1, 0], Vec::new());

        predict(&mut ctx, &mut roster, PredictionInput::new(0, ResponseType::CounterSlash)).unwrap();

        assert_eq!(hands(&roster, DEFENDER, AttackType::Slash), 0);
        assert_eq!(ctx.prediction(0).unwrap().response, ResponseType::CounterSlash);
    }

    #[test]
    fn counter_without_hands_is_rejected() {
        let (mut ctx, mut roster) = setup([0, 0, 0], Vec::new());

        let err = predict(&mut ctx, &mut roster, PredictionInput::new(1, ResponseType::CounterDown))
            .unwrap_err();

        assert_eq!(
            err,
            PredictionError::NoCounterHands {
                responder: DEFENDER,
                hand: AttackType::Down
            }
        );
        assert!(ctx.predict_queue.is_empty());
    }

    #[test]
    fn unlimited_counter_keeps_hands() {
        let skill = Skill::new(names::UNLIMITED_COUNTER, SkillCategory::Character, SkillTrigger::OnBattle);
        let (mut ctx, mut roster) = setup([0, 0, 0], vec![skill]);

        predict(&mut ctx, &mut roster, PredictionInput::new(0, ResponseType::CounterSlash)).unwrap();

        assert_eq!(hands(&roster, DEFENDER, AttackType::Slash), 0);
        assert_eq!(ctx.predict_queue.len(), 1);
    }

    #[test]
    fn unknown_slot_and_duplicates_are_rejected() {
        let (mut ctx, mut roster) = setup([1, 1, 1], Vec::new());

        let err = predict(&mut ctx, &mut roster, PredictionInput::new(7, ResponseType::Evade)).unwrap_err();
        assert_eq!(err, PredictionError::UnknownSlot(7));

        predict(&mut ctx, &mut roster, PredictionInput::new(2, ResponseType::Evade)).unwrap();
        let err = predict(&mut ctx, &mut roster, PredictionInput::new(2, ResponseType::Evade)).unwrap_err();
        assert_eq!(err, PredictionError::AlreadyAnswered(2));
    }

    #[test]
    fn cover_redirects_and_spends_charge() {
        let (mut ctx, mut roster) = setup([1, 1, 1], Vec::new());

        let ack = predict(&mut ctx, &mut roster, PredictionInput::cover(0, ALLY)).unwrap();

        assert_eq!(
            ack,
            PredictionAck::Accepted {
                slot_index: 0,
                responder: ALLY,
                response: ResponseType::Cover
            }
        );
        assert_eq!(ctx.cover_remaining, 0);
        assert_eq!(ctx.reserve_queue[0].target_id, ALLY);
        assert_eq!(ctx.reserve_queue[0].original_target_id, DEFENDER);
    }

    #[test]
    fn cover_without_charges_falls_back_to_self() {
        let (mut ctx, mut roster) = setup([1, 1, 1], Vec::new());
        predict(&mut ctx, &mut roster, PredictionInput::cover(0, ALLY)).unwrap();

        let ack = predict(&mut ctx, &mut roster, PredictionInput::cover(1, ALLY)).unwrap();

        assert_eq!(
            ack,
            PredictionAck::CoverFallback {
                slot_index: 1,
                reason: CoverFallback::NoCoverRemaining
            }
        );
        let response = ctx.prediction(1).unwrap();
        assert_eq!(response.responder_id, DEFENDER);
        assert_eq!(response.response, ResponseType::None);
        assert_eq!(ctx.reserve_queue[1].target_id, DEFENDER);
    }

    #[test]
    fn cover_by_enemy_or_self_falls_back() {
        let (mut ctx, mut roster) = setup([1, 1, 1], Vec::new());

        let ack = predict(&mut ctx, &mut roster, PredictionInput::cover(0, ATTACKER)).unwrap();
        assert!(matches!(
            ack,
            PredictionAck::CoverFallback {
                reason: CoverFallback::InvalidRedirect,
                ..
            }
        ));
        assert_eq!(ctx.cover_remaining, 1);

        let ack = predict(&mut ctx, &mut roster, PredictionInput::cover(1, DEFENDER)).unwrap();
        assert!(matches!(ack, PredictionAck::CoverFallback { .. }));
    }
}
