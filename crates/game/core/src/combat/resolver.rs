//! Outcome resolution: applies the interaction table to every slot in order.
//!
//! Slots resolve strictly by increasing slot index. Hand and cover spending
//! already happened in earlier phases, so resolution itself only rolls
//! evasion and applies damage.

use super::damage::{DamageFormula, scale_damage};
use super::interaction::InteractionTable;
use super::outcome::{ActionOutcome, DamageDealt, OutcomeKind};
use crate::env::{RngOracle, compute_seed};
use crate::skill::SkillEffects;
use crate::state::{AttackType, CombatantId, ResponseType, Roster};
use crate::turn::{BattleContext, PlannedAction, PredictedResponse};

/// What happened in one slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotResolution {
    pub slot_index: usize,
    pub attacker_id: CombatantId,
    /// Combatant that received (or would have received) the attack.
    pub defender_id: CombatantId,
    pub attack: AttackType,
    pub response: ResponseType,
    pub outcome: ActionOutcome,
}

/// Result of resolving a full turn.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnResolution {
    pub slots: Vec<SlotResolution>,
    /// Combatants that died during this resolution, in order of death.
    pub defeated: Vec<CombatantId>,
}

pub struct OutcomeResolver<'a> {
    table: &'a InteractionTable,
    formula: &'a dyn DamageFormula,
    rng: &'a dyn RngOracle,
    game_seed: u64,
}

impl<'a> OutcomeResolver<'a> {
    pub fn new(
        table: &'a InteractionTable,
        formula: &'a dyn DamageFormula,
        rng: &'a dyn RngOracle,
        game_seed: u64,
    ) -> Self {
        Self {
            table,
            formula,
            rng,
            game_seed,
        }
    }

    /// Resolves every reserved slot and writes each outcome back into the
    /// context's prediction queue.
    ///
    /// Unanswered slots are filled with an undefended response first.
    pub fn resolve(&self, ctx: &mut BattleContext, roster: &mut Roster) -> TurnResolution {
        let missing: Vec<PredictedResponse> = ctx
            .reserve_queue
            .iter()
            .filter(|action| ctx.prediction(action.slot_index).is_none())
            .map(PredictedResponse::undefended)
            .collect();
        for response in missing {
            // Both queues share `MAX_SLOTS` and each slot is answered at most once.
            let pushed = ctx.predict_queue.try_push(response);
            debug_assert!(pushed.is_ok(), "prediction queue outgrew the reservations");
        }
        ctx.predict_queue.sort_by_key(|p| p.slot_index);

        let mut report = TurnResolution::default();
        let mut actions: Vec<PlannedAction> = ctx.reserve_queue.iter().cloned().collect();
        actions.sort_by_key(|a| a.slot_index);

        for action in &actions {
            let Some(position) = ctx
                .predict_queue
                .iter()
                .position(|p| p.slot_index == action.slot_index)
            else {
                continue;
            };
            let response = ctx.predict_queue[position].clone();

            let alive_before: Vec<CombatantId> =
                roster.iter().filter(|c| c.is_alive()).map(|c| c.id).collect();

            let (defender_id, effective, outcome) =
                self.resolve_slot(ctx.turn_number, action, &response, roster);

            for id in alive_before {
                if roster.get(id).is_some_and(|c| !c.is_alive()) {
                    report.defeated.push(id);
                }
            }

            ctx.predict_queue[position].outcome = outcome.clone();
            report.slots.push(SlotResolution {
                slot_index: action.slot_index,
                attacker_id: action.attacker_id,
                defender_id,
                attack: action.attack,
                response: effective,
                outcome,
            });
        }

        report
    }

    /// Returns the combatant that received the attack, the response that
    /// actually applied and the outcome.
    ///
    /// A responder that died earlier in the turn cannot act: its response
    /// collapses to `None` against the original target.
    fn resolve_slot(
        &self,
        turn: u32,
        action: &PlannedAction,
        response: &PredictedResponse,
        roster: &mut Roster,
    ) -> (CombatantId, ResponseType, ActionOutcome) {
        let Some(attacker) = roster.get(action.attacker_id).filter(|c| c.is_alive()) else {
            return (
                response.responder_id,
                response.response,
                ActionOutcome::new(OutcomeKind::AttackerDown),
            );
        };
        let attacker_effects = *attacker.effects();

        let responder_alive = roster
            .get(response.responder_id)
            .is_some_and(|c| c.is_alive());
        let (responder_id, effective) = if responder_alive {
            (response.responder_id, response.response)
        } else {
            (action.original_target_id, ResponseType::None)
        };

        let mut outcome = self
            .table
            .outcome_for(action.attack, effective, attacker_effects.flags);

        let defender_id = match outcome.kind {
            OutcomeKind::CoverPierced => action.original_target_id,
            _ => responder_id,
        };

        if effective == ResponseType::Evade && outcome.evade_rate > 0.0 {
            let seed = compute_seed(
                self.game_seed,
                u64::from(turn),
                action.attacker_id.0,
                action.slot_index as u32,
            );
            if self.rng.chance(seed, outcome.evade_rate) {
                outcome.mark_evaded();
                return (defender_id, effective, outcome);
            }
        }

        if outcome.hits_defender() {
            outcome.defender_damage = self.strike(
                roster,
                action.attacker_id,
                defender_id,
                &attacker_effects,
                (outcome.defender_residual_ratio, outcome.defender_fatal_ratio),
            );
        }
        if outcome.hits_attacker() {
            let responder_effects = roster
                .get(responder_id)
                .map(|c| *c.effects())
                .unwrap_or_default();
            outcome.attacker_damage = self.strike(
                roster,
                responder_id,
                action.attacker_id,
                &responder_effects,
                (outcome.attacker_residual_ratio, outcome.attacker_fatal_ratio),
            );
        }

        (defender_id, effective, outcome)
    }

    /// Applies `ratios × base damage` from `dealer` to `receiver`.
    ///
    /// Dead dealers deal nothing. Dead or missing receivers take nothing.
    fn strike(
        &self,
        roster: &mut Roster,
        dealer: CombatantId,
        receiver: CombatantId,
        dealer_effects: &SkillEffects,
        (residual_ratio, fatal_ratio): (f32, f32),
    ) -> DamageDealt {
        let (Some(dealer), Some(target)) = (roster.get(dealer), roster.get(receiver)) else {
            return DamageDealt::NONE;
        };
        if !dealer.is_alive() || !target.is_alive() {
            return DamageDealt::NONE;
        }

        let base = self.formula.base_damage(&dealer.stats, &target.stats);
        let (residual, fatal) = dealer_effects.shape_damage(
            scale_damage(base, residual_ratio),
            scale_damage(base, fatal_ratio),
        );

        let Some(target) = roster.get_mut(receiver) else {
            return DamageDealt::NONE;
        };
        target.stats.apply_mixed_damage(residual, fatal);
        DamageDealt { residual, fatal }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AttackMinusDefense, HitRatios};
    use crate::env::PcgRng;
    use crate::skill::{Skill, SkillCategory, SkillTrigger, names};
    use crate::state::{Combatant, Side};
    use crate::stats::{HandsLedger, StatBlock};
    use crate::turn::TurnPhase;

    const ATTACKER: CombatantId = CombatantId(1);
    const DEFENDER: CombatantId = CombatantId(2);
    const ALLY: CombatantId = CombatantId(3);

    /// Always rolls the same unit value.
    struct FixedRoll(f32);

    impl RngOracle for FixedRoll {
        fn next_u32(&self, _seed: u64) -> u32 {
            0
        }

        fn roll_unit(&self, _seed: u64) -> f32 {
            self.0
        }
    }

    fn fighter(id: CombatantId, side: Side, attack: i32, skills: Vec<&str>) -> Combatant {
        let mut stats = StatBlock::with_max_hp(100).with_hands(HandsLedger::uniform(3));
        stats.attack = attack;
        let skills = skills
            .into_iter()
            .map(|s| Skill::new(s, SkillCategory::Character, SkillTrigger::OnBattle))
            .collect();
        Combatant::new(id, format!("{id}"), side, stats, skills)
    }

    fn roster(attacker_skills: Vec<&str>) -> Roster {
        Roster::from_combatants([
            fighter(ATTACKER, Side::Player, 20, attacker_skills),
            fighter(DEFENDER, Side::Enemy, 10, Vec::new()),
            fighter(ALLY, Side::Enemy, 10, Vec::new()),
        ])
        .unwrap()
    }

    fn context(slots: &[(AttackType, ResponseType)]) -> BattleContext {
        let mut ctx = BattleContext::new(1, ATTACKER, DEFENDER, true, 6, 1);
        for (slot_index, (attack, response)) in slots.iter().enumerate() {
            ctx.reserve_queue.push(PlannedAction {
                attacker_id: ATTACKER,
                target_id: DEFENDER,
                original_target_id: DEFENDER,
                attack: *attack,
                slot_index,
                revealed: true,
            });
            ctx.predict_queue
                .push(PredictedResponse::new(DEFENDER, *response, slot_index));
        }
        ctx.phase = TurnPhase::Prediction;
        ctx
    }

    fn table() -> InteractionTable {
        InteractionTable {
            thrust_hit: HitRatios::new(0.5, 1.0),
            slash_hit: HitRatios::new(1.0, 0.0),
            down_hit: HitRatios::new(0.5, 0.5),
            slash_counter: HitRatios::new(1.0, 0.0),
            down_counter: HitRatios::new(0.5, 0.5),
            ..InteractionTable::default()
        }
    }

    fn hp(roster: &Roster, id: CombatantId) -> (u32, u32) {
        let stats = &roster.get(id).unwrap().stats;
        (stats.residual_hp(), stats.fatal_hp())
    }

    #[test]
    fn undefended_slash_converts_residual() {
        let table = table();
        let mut roster = roster(Vec::new());
        let mut ctx = context(&[(AttackType::Slash, ResponseType::None)]);

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(hp(&roster, DEFENDER), (80, 20));
        assert_eq!(report.slots[0].outcome.kind, OutcomeKind::Hit);
        assert_eq!(ctx.predict_queue[0].outcome.defender_damage.residual, 20);
    }

    #[test]
    fn counter_slash_damages_attacker() {
        let table = table();
        let mut roster = roster(Vec::new());
        let mut ctx = context(&[(AttackType::Slash, ResponseType::CounterSlash)]);

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        // Defender (attack 10) vs attacker (defense 0): base 10.
        assert_eq!(hp(&roster, ATTACKER), (90, 10));
        assert_eq!(hp(&roster, DEFENDER), (100, 0));
        assert_eq!(report.slots[0].outcome.kind, OutcomeKind::Countered);
    }

    #[test]
    fn successful_evade_nullifies_damage() {
        let table = table();
        let mut roster = roster(Vec::new());
        let mut ctx = context(&[(AttackType::Down, ResponseType::Evade)]);

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &FixedRoll(0.1), 0)
            .resolve(&mut ctx, &mut roster);

        let outcome = &report.slots[0].outcome;
        assert!(outcome.evaded);
        assert_eq!(outcome.kind, OutcomeKind::Evaded);
        assert_eq!(outcome.defender_anim_on_evade.as_deref(), Some("evade"));
        assert_eq!(hp(&roster, DEFENDER), (100, 0));
    }

    #[test]
    fn failed_evade_is_a_hit() {
        let table = table();
        let mut roster = roster(Vec::new());
        let mut ctx = context(&[(AttackType::Down, ResponseType::Evade)]);

        OutcomeResolver::new(&table, &AttackMinusDefense::default(), &FixedRoll(0.9), 0)
            .resolve(&mut ctx, &mut roster);

        // 10 residual → fatal, then 10 fatal drained.
        assert_eq!(hp(&roster, DEFENDER), (90, 0));
    }

    #[test]
    fn unavoidable_slash_ignores_evade() {
        let table = table();
        let mut roster = roster(vec![names::UNAVOIDABLE]);
        let mut ctx = context(&[(AttackType::Slash, ResponseType::Evade)]);

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &FixedRoll(0.0), 0)
            .resolve(&mut ctx, &mut roster);

        assert!(!report.slots[0].outcome.evaded);
        assert_eq!(hp(&roster, DEFENDER), (80, 20));
    }

    #[test]
    fn lethalize_routes_everything_to_fatal() {
        let table = table();
        let mut roster = roster(vec![names::LETHALIZE]);
        roster.get_mut(DEFENDER).unwrap().stats.set_hp(50, 50);
        let mut ctx = context(&[(AttackType::Slash, ResponseType::None)]);

        OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(hp(&roster, DEFENDER), (50, 30));
    }

    #[test]
    fn cover_hits_ally_for_slash_but_thrust_pierces() {
        let table = table();
        let mut roster = roster(Vec::new());
        let mut ctx = context(&[
            (AttackType::Slash, ResponseType::Cover),
            (AttackType::Thrust, ResponseType::Cover),
        ]);
        for slot in 0..2 {
            ctx.reserve_queue[slot].target_id = ALLY;
            ctx.predict_queue[slot].responder_id = ALLY;
        }

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(report.slots[0].defender_id, ALLY);
        assert_eq!(hp(&roster, ALLY), (90, 10));
        assert_eq!(report.slots[1].defender_id, DEFENDER);
        assert_eq!(report.slots[1].outcome.kind, OutcomeKind::CoverPierced);
        assert_eq!(hp(&roster, DEFENDER), (90, 0));
    }

    #[test]
    fn unavoidable_attacker_is_still_covered() {
        let table = table();
        let mut roster = roster(vec![names::UNAVOIDABLE]);
        let mut ctx = context(&[(AttackType::Slash, ResponseType::Cover)]);
        ctx.reserve_queue[0].target_id = ALLY;
        ctx.predict_queue[0].responder_id = ALLY;

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(report.slots[0].outcome.kind, OutcomeKind::Covered);
        assert_eq!(hp(&roster, ALLY), (90, 10));
        assert_eq!(hp(&roster, DEFENDER), (100, 0));
    }

    #[test]
    fn unanswered_slots_resolve_undefended() {
        let table = table();
        let mut roster = roster(Vec::new());
        let mut ctx = context(&[(AttackType::Slash, ResponseType::None)]);
        ctx.predict_queue.clear();

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(report.slots[0].response, ResponseType::None);
        assert_eq!(ctx.predict_queue.len(), 1);
        assert_eq!(hp(&roster, DEFENDER), (80, 20));
    }

    #[test]
    fn dead_defender_takes_no_further_damage() {
        let table = table();
        let mut roster = roster(Vec::new());
        roster.get_mut(DEFENDER).unwrap().stats.set_hp(0, 5);
        let mut ctx = context(&[
            (AttackType::Down, ResponseType::None),
            (AttackType::Down, ResponseType::None),
        ]);

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(report.defeated, vec![DEFENDER]);
        assert_eq!(report.slots[1].outcome.defender_damage, DamageDealt::NONE);
        assert_eq!(hp(&roster, DEFENDER), (0, 0));
    }

    #[test]
    fn defeated_responder_cannot_counter_later_slots() {
        let table = table();
        let mut roster = roster(Vec::new());
        roster.get_mut(DEFENDER).unwrap().stats.set_hp(0, 5);
        let mut ctx = context(&[
            (AttackType::Down, ResponseType::None),
            (AttackType::Slash, ResponseType::CounterSlash),
        ]);

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(report.defeated, vec![DEFENDER]);
        let slot = &report.slots[1];
        assert_eq!(slot.response, ResponseType::None);
        assert_ne!(slot.outcome.kind, OutcomeKind::Countered);
        assert_eq!(slot.outcome.attacker_damage, DamageDealt::NONE);
        assert_eq!(slot.outcome.defender_damage, DamageDealt::NONE);
        assert_eq!(hp(&roster, ATTACKER), (100, 0));
        assert_eq!(ctx.predict_queue[1].outcome.kind, OutcomeKind::Hit);
    }

    #[test]
    fn defeated_ally_cannot_cover_later_slots() {
        let table = table();
        let mut roster = roster(Vec::new());
        roster.get_mut(ALLY).unwrap().stats.set_hp(0, 5);
        let mut ctx = context(&[
            (AttackType::Down, ResponseType::None),
            (AttackType::Slash, ResponseType::Cover),
        ]);
        ctx.reserve_queue[0].target_id = ALLY;
        ctx.reserve_queue[0].original_target_id = ALLY;
        ctx.predict_queue[0].responder_id = ALLY;
        ctx.reserve_queue[1].target_id = ALLY;
        ctx.predict_queue[1].responder_id = ALLY;

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(report.defeated, vec![ALLY]);
        let slot = &report.slots[1];
        assert_eq!(slot.defender_id, DEFENDER);
        assert_eq!(slot.response, ResponseType::None);
        assert_eq!(slot.outcome.kind, OutcomeKind::Hit);
        assert_eq!(hp(&roster, DEFENDER), (80, 20));
        assert_eq!(hp(&roster, ALLY), (0, 0));
    }

    #[test]
    fn dead_attacker_slot_is_skipped() {
        let table = table();
        let mut roster = roster(Vec::new());
        roster.get_mut(ATTACKER).unwrap().stats.set_hp(0, 1);
        let mut ctx = context(&[
            (AttackType::Down, ResponseType::CounterDown),
            (AttackType::Slash, ResponseType::None),
        ]);

        let report = OutcomeResolver::new(&table, &AttackMinusDefense::default(), &PcgRng, 0)
            .resolve(&mut ctx, &mut roster);

        assert_eq!(report.defeated, vec![ATTACKER]);
        assert_eq!(report.slots[1].outcome.kind, OutcomeKind::AttackerDown);
        assert_eq!(hp(&roster, DEFENDER), (100, 0));
    }

    #[test]
    fn thrust_versus_evade_hit_rate_converges() {
        let table = InteractionTable::default();
        let formula = AttackMinusDefense::default();
        let trials = 1000;
        let mut hits = 0;

        for trial in 0..trials {
            let mut roster = roster(Vec::new());
            let mut ctx = context(&[(AttackType::Thrust, ResponseType::Evade)]);
            let report =
                OutcomeResolver::new(&table, &formula, &PcgRng, trial).resolve(&mut ctx, &mut roster);
            assert_eq!(report.slots[0].outcome.evade_rate, 0.3);
            if !report.slots[0].outcome.evaded {
                hits += 1;
            }
        }

        let rate = hits as f64 / trials as f64;
        assert!((rate - 0.7).abs() < 0.05, "hit rate {rate}");
    }
}
