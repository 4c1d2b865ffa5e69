//! Heuristic battle AI.
//!
//! Plans reservations and predictions greedily from the pure scores in
//! [`scoring`]. Resources (hands, cover charges) are tracked locally while
//! planning so the plan never asks for more than the engine will accept.

pub mod scoring;

use async_trait::async_trait;
use battle_core::{
    AttackType, CombatFlags, Combatant, CombatantId, PredictionInput, ResponseType, Roster,
    SlotView,
};
use tracing::debug;

use crate::api::{
    PredictionProvider, PredictionRequest, ReservationChoice, ReservationProvider,
    ReservationRequest, Result,
};

use scoring::{RESPONSES, can_afford, score_attack, score_response};

/// Greedy AI usable on either side.
#[derive(Clone, Debug)]
pub struct HeuristicAi {
    /// Attacks scoring at or below this are not reserved.
    pub min_attack_score: u32,
    /// Cover is only considered when the responder's remaining HP share is
    /// below this.
    pub cover_below_hp: f32,
}

impl Default for HeuristicAi {
    fn default() -> Self {
        Self {
            min_attack_score: 50,
            cover_below_hp: 0.5,
        }
    }
}

fn hp_share(combatant: &Combatant) -> f32 {
    let max = combatant.stats.max_hp();
    if max == 0 {
        return 0.0;
    }
    (combatant.stats.residual_hp() + combatant.stats.fatal_hp()) as f32 / max as f32
}

/// Living opponent with the least HP left (lowest id on ties).
fn weakest_opponent(roster: &Roster, actor: &Combatant) -> Option<CombatantId> {
    roster
        .living(actor.side.opponent())
        .min_by_key(|c| (c.stats.residual_hp() + c.stats.fatal_hp(), c.id))
        .map(|c| c.id)
}

/// Healthiest living ally of `responder` able to take a hit for it.
fn cover_partner(roster: &Roster, responder: &Combatant) -> Option<CombatantId> {
    roster
        .living(responder.side)
        .filter(|c| c.id != responder.id)
        .max_by(|a, b| hp_share(a).total_cmp(&hp_share(b)).then(b.id.cmp(&a.id)))
        .filter(|ally| hp_share(ally) > hp_share(responder))
        .map(|c| c.id)
}

impl HeuristicAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans one turn of reservations.
    pub fn plan_reservations(&self, request: &ReservationRequest<'_>) -> Vec<ReservationChoice> {
        let Some(actor) = request.roster.get(request.actor) else {
            return Vec::new();
        };
        let target_id = weakest_opponent(request.roster, actor).unwrap_or(request.target);
        let Some(target) = request.roster.get(target_id) else {
            return Vec::new();
        };
        let cover_available = cover_partner(request.roster, target).is_some();

        let mut hands = actor.stats.hands.clone();
        let mut plan = Vec::new();
        while (plan.len() as u32) < request.max_reservations {
            let best = AttackType::ALL
                .into_iter()
                .filter(|&attack| hands.has(attack))
                .map(|attack| {
                    let score =
                        score_attack(request.table, attack, actor.flags(), target, cover_available);
                    (score, attack)
                })
                .max_by(|(a, attack_a), (b, attack_b)| {
                    a.cmp(b).then(attack_b.index().cmp(&attack_a.index()))
                });

            let Some((score, attack)) = best else { break };
            if score <= self.min_attack_score {
                break;
            }
            hands.try_consume(attack);
            debug!(actor = %actor.id, target = %target_id, %attack, score, "planned reservation");
            plan.push(ReservationChoice::new(attack, target_id));
        }
        plan
    }

    /// Answers every slot of the request.
    pub fn plan_predictions(&self, request: &PredictionRequest<'_>) -> Vec<PredictionInput> {
        let attacker_flags = request
            .roster
            .get(request.attacker)
            .map(Combatant::flags)
            .unwrap_or_else(CombatFlags::empty);

        let mut roster = request.roster.clone();
        let mut cover_remaining = request.cover_remaining;
        let mut inputs = Vec::new();

        for slot in request.slots {
            let Some(input) =
                self.answer_slot(slot, &mut roster, &mut cover_remaining, request, attacker_flags)
            else {
                continue;
            };
            inputs.push(input);
        }
        inputs
    }

    fn answer_slot(
        &self,
        slot: &SlotView,
        roster: &mut Roster,
        cover_remaining: &mut u32,
        request: &PredictionRequest<'_>,
        attacker_flags: CombatFlags,
    ) -> Option<PredictionInput> {
        let responder = roster.get(slot.target_id)?;
        let partner = if *cover_remaining > 0 && hp_share(responder) < self.cover_below_hp {
            cover_partner(roster, responder)
        } else {
            None
        };

        let (score, response) = RESPONSES
            .into_iter()
            .filter(|&response| can_afford(responder, response, partner.is_some()))
            .map(|response| {
                (
                    score_response(request.table, slot.attack, response, attacker_flags),
                    response,
                )
            })
            .max_by(|(a, ra), (b, rb)| {
                let rank = |r: &ResponseType| RESPONSES.iter().position(|x| x == r);
                a.cmp(b).then(rank(rb).cmp(&rank(ra)))
            })?;

        debug!(
            slot = slot.slot_index,
            responder = %slot.target_id,
            ?response,
            score,
            "planned prediction"
        );

        let responder_id = slot.target_id;
        match (response, partner) {
            (ResponseType::Cover, Some(ally)) => {
                *cover_remaining -= 1;
                Some(PredictionInput::cover(slot.slot_index, ally))
            }
            (response, _) => {
                if let Some(hand) = response.counter_hand() {
                    if let Some(responder) = roster.get_mut(responder_id) {
                        if !responder.flags().contains(CombatFlags::UNLIMITED_COUNTER) {
                            responder.stats.hands.try_consume(hand);
                        }
                    }
                }
                Some(PredictionInput::new(slot.slot_index, response))
            }
        }
    }
}

#[async_trait]
impl ReservationProvider for HeuristicAi {
    async fn provide_reservations(
        &self,
        request: &ReservationRequest<'_>,
    ) -> Result<Vec<ReservationChoice>> {
        Ok(self.plan_reservations(request))
    }
}

#[async_trait]
impl PredictionProvider for HeuristicAi {
    async fn provide_predictions(
        &self,
        request: &PredictionRequest<'_>,
    ) -> Result<Vec<PredictionInput>> {
        Ok(self.plan_predictions(request))
    }
}
