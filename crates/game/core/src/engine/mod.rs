//! Battle state machine.
//!
//! [`BattleEngine`] owns the roster, configuration, damage formula and RNG of
//! one battle, plus the single active [`BattleContext`]. Every turn walks the
//! same phases:
//!
//! begin_turn → reserve* → close_reservations → predict* → resolve → end_turn
//!
//! `abandon_turn` may cancel a turn at any point before resolution. Every
//! method validates before it mutates, so an `Err` leaves the battle as it was.

mod errors;
mod turns;

pub use errors::TurnError;

use crate::combat::{AttackMinusDefense, DamageFormula, OutcomeResolver, TurnResolution};
use crate::config::BattleConfig;
use crate::env::{PcgRng, RngOracle};
use crate::state::{AttackType, CombatantId, Roster, Side};
use crate::stats::HandsLedger;
use crate::turn::{self, BattleContext, PredictionAck, PredictionInput, SlotView, TurnPhase};

/// Engine driving one battle.
pub struct BattleEngine {
    config: BattleConfig,
    roster: Roster,
    formula: Box<dyn DamageFormula>,
    rng: Box<dyn RngOracle>,
    context: Option<BattleContext>,
    /// Hands of every combatant as they were before `begin_turn`.
    hands_snapshot: Vec<(CombatantId, HandsLedger)>,
    turn_number: u32,
}

impl BattleEngine {
    pub fn new(config: BattleConfig, roster: Roster) -> Self {
        Self {
            config,
            roster,
            formula: Box::new(AttackMinusDefense::default()),
            rng: Box::new(PcgRng),
            context: None,
            hands_snapshot: Vec::new(),
            turn_number: 0,
        }
    }

    pub fn with_damage_formula(mut self, formula: impl DamageFormula + 'static) -> Self {
        self.formula = Box::new(formula);
        self
    }

    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable roster access between turns (loading saves, re-forging gear).
    pub fn roster_mut(&mut self) -> Result<&mut Roster, TurnError> {
        match &self.context {
            Some(ctx) => Err(TurnError::TurnInProgress(ctx.turn_number)),
            None => Ok(&mut self.roster),
        }
    }

    /// Replaces the roster and turn counter with a saved position.
    ///
    /// The next `begin_turn` continues from `turn_number + 1`, so a resumed
    /// battle keeps its remaining `max_turns` budget.
    pub fn resume(&mut self, roster: Roster, turn_number: u32) -> Result<(), TurnError> {
        if let Some(ctx) = &self.context {
            return Err(TurnError::TurnInProgress(ctx.turn_number));
        }
        self.roster = roster;
        self.turn_number = turn_number;
        self.hands_snapshot.clear();
        Ok(())
    }

    pub fn into_roster(self) -> Roster {
        self.roster
    }

    pub fn context(&self) -> Option<&BattleContext> {
        self.context.as_ref()
    }

    pub fn phase(&self) -> Option<TurnPhase> {
        self.context.as_ref().map(|ctx| ctx.phase)
    }

    /// Number of the active turn, or of the last finished one.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    fn active(&mut self, expected: TurnPhase) -> Result<&mut BattleContext, TurnError> {
        let ctx = self.context.as_mut().ok_or(TurnError::NoActiveTurn)?;
        if ctx.phase != expected {
            return Err(TurnError::wrong_phase(expected, ctx.phase));
        }
        Ok(ctx)
    }

    /// Opens a new turn in which `actor` attacks `target`'s side.
    ///
    /// Refills the hands of the acting side and grants the defending side its
    /// cover charges.
    pub fn begin_turn(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
    ) -> Result<&BattleContext, TurnError> {
        if let Some(ctx) = &self.context {
            return Err(TurnError::TurnInProgress(ctx.turn_number));
        }
        if self.is_over() {
            return Err(TurnError::BattleOver(self.winner()));
        }

        let acting = self
            .roster
            .get(actor)
            .ok_or(TurnError::UnknownCombatant(actor))?;
        let defending = self
            .roster
            .get(target)
            .ok_or(TurnError::UnknownCombatant(target))?;
        if !acting.is_alive() {
            return Err(TurnError::Defeated(actor));
        }
        if defending.side == acting.side {
            return Err(TurnError::InvalidTarget { actor, target });
        }
        if !defending.is_alive() {
            return Err(TurnError::Defeated(target));
        }

        let side = acting.side;
        let reservation_limit = acting.reservation_limit();

        self.hands_snapshot = self
            .roster
            .iter()
            .map(|c| (c.id, c.stats.hands.clone()))
            .collect();
        for combatant in self.roster.iter_mut().filter(|c| c.side == side) {
            combatant.stats.reset_hands();
        }

        self.turn_number += 1;
        let ctx = self.context.insert(BattleContext::new(
            self.turn_number,
            actor,
            target,
            side == Side::Player,
            reservation_limit,
            self.config.cover_per_turn,
        ));
        Ok(&*ctx)
    }

    /// Reserves one attack for the current actor. Returns the slot index.
    pub fn reserve(&mut self, attack: AttackType, target: CombatantId) -> Result<usize, TurnError> {
        let threshold = self.config.reveal_threshold;
        let ctx = self.context.as_mut().ok_or(TurnError::NoActiveTurn)?;
        Ok(turn::reserve(ctx, &mut self.roster, attack, target, threshold)?)
    }

    /// Ends the reservation phase and hands the turn to the defending side.
    pub fn close_reservations(&mut self) -> Result<&BattleContext, TurnError> {
        let ctx = self.active(TurnPhase::Reservation)?;
        ctx.phase = TurnPhase::Prediction;
        Ok(&*ctx)
    }

    /// Reservation queue as the defending side sees it.
    pub fn defender_view(&self) -> Result<Vec<SlotView>, TurnError> {
        self.context
            .as_ref()
            .map(BattleContext::defender_view)
            .ok_or(TurnError::NoActiveTurn)
    }

    pub fn predict(&mut self, input: PredictionInput) -> Result<PredictionAck, TurnError> {
        let ctx = self.context.as_mut().ok_or(TurnError::NoActiveTurn)?;
        Ok(turn::predict(ctx, &mut self.roster, input)?)
    }

    /// Resolves every slot in order and applies damage.
    pub fn resolve(&mut self) -> Result<TurnResolution, TurnError> {
        let ctx = self.context.as_mut().ok_or(TurnError::NoActiveTurn)?;
        if ctx.phase != TurnPhase::Prediction {
            return Err(TurnError::wrong_phase(TurnPhase::Prediction, ctx.phase));
        }

        let resolver = OutcomeResolver::new(
            &self.config.interaction,
            self.formula.as_ref(),
            self.rng.as_ref(),
            self.config.game_seed,
        );
        let resolution = resolver.resolve(ctx, &mut self.roster);
        ctx.phase = TurnPhase::Resolved;
        Ok(resolution)
    }

    /// Closes a resolved turn and returns its final context.
    pub fn end_turn(&mut self) -> Result<BattleContext, TurnError> {
        self.active(TurnPhase::Resolved)?;
        for combatant in self.roster.iter_mut() {
            combatant.stats.hands.snapshot_end_of_turn();
        }
        self.hands_snapshot.clear();
        self.context.take().ok_or(TurnError::NoActiveTurn)
    }

    /// Cancels an unresolved turn: every hand spent since `begin_turn` is
    /// returned and the turn number is rolled back.
    pub fn abandon_turn(&mut self) -> Result<(), TurnError> {
        let ctx = self.context.as_ref().ok_or(TurnError::NoActiveTurn)?;
        if ctx.phase == TurnPhase::Resolved {
            return Err(TurnError::wrong_phase(TurnPhase::Prediction, ctx.phase));
        }

        for (id, hands) in self.hands_snapshot.drain(..) {
            if let Some(combatant) = self.roster.get_mut(id) {
                combatant.stats.hands = hands;
            }
        }
        self.turn_number -= 1;
        self.context = None;
        Ok(())
    }
}
