//! The attack/response interaction table.
//!
//! ```text
//!              None   Evade          CounterSlash  CounterDown   Cover
//! Thrust       Hit    Evade(reduced) Hit           Hit           CoverPierced
//! Slash        Hit    Evade          Countered     CounterMissed Covered
//! Down         Hit    Evade          CounterMissed Countered     Covered
//! ```
//!
//! Ratios and rates are data so that game design can recalibrate them from
//! content files without touching the rules.

use super::outcome::{ActionOutcome, OutcomeKind};
use crate::skill::CombatFlags;
use crate::state::{AttackType, ResponseType};

/// Fractions of base damage applied to the residual and fatal layers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitRatios {
    pub residual: f32,
    pub fatal: f32,
}

impl HitRatios {
    pub const fn new(residual: f32, fatal: f32) -> Self {
        Self { residual, fatal }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.residual * factor, self.fatal * factor)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InteractionTable {
    pub thrust_hit: HitRatios,
    pub slash_hit: HitRatios,
    pub down_hit: HitRatios,
    /// Damage the original attacker takes when a Slash is counter-slashed.
    pub slash_counter: HitRatios,
    /// Damage the original attacker takes when a Down is counter-downed.
    pub down_counter: HitRatios,
    /// Evade rate against Slash and Down.
    pub evade_rate: f32,
    /// Evade rate against Thrust.
    pub thrust_evade_rate: f32,
    /// Share of the hit a covering ally takes.
    pub cover_ratio: f32,
    /// Multiplier on the Thrust evade rate when the attacker is unavoidable.
    pub unavoidable_thrust_factor: f32,
}

impl Default for InteractionTable {
    fn default() -> Self {
        Self {
            thrust_hit: HitRatios::new(0.5, 1.0),
            slash_hit: HitRatios::new(1.0, 0.25),
            down_hit: HitRatios::new(0.75, 0.75),
            slash_counter: HitRatios::new(1.0, 0.25),
            down_counter: HitRatios::new(0.75, 0.75),
            evade_rate: 0.6,
            thrust_evade_rate: 0.3,
            cover_ratio: 0.5,
            unavoidable_thrust_factor: 0.5,
        }
    }
}

fn anim(attack: AttackType) -> &'static str {
    attack.into()
}

impl InteractionTable {
    pub fn hit_ratios(&self, attack: AttackType) -> HitRatios {
        match attack {
            AttackType::Thrust => self.thrust_hit,
            AttackType::Slash => self.slash_hit,
            AttackType::Down => self.down_hit,
        }
    }

    /// Base evade rate for `attack` before attacker skills.
    pub fn base_evade_rate(&self, attack: AttackType) -> f32 {
        match attack {
            AttackType::Thrust => self.thrust_evade_rate,
            AttackType::Slash | AttackType::Down => self.evade_rate,
        }
    }

    /// Outcome template for `(attack, response)` given the attacker's flags.
    ///
    /// The template is unresolved: evasion has not been rolled and no damage
    /// has been applied.
    pub fn outcome_for(
        &self,
        attack: AttackType,
        response: ResponseType,
        attacker_flags: CombatFlags,
    ) -> ActionOutcome {
        let hit = self.hit_ratios(attack);
        let strike = anim(attack);

        let hit_outcome = |kind: OutcomeKind, ratios: HitRatios| {
            ActionOutcome::new(kind)
                .with_defender_ratios(ratios.residual, ratios.fatal)
                .with_hit_anims(strike, "damaged")
        };

        match response {
            ResponseType::None => hit_outcome(OutcomeKind::Hit, hit),
            ResponseType::Evade => {
                let unavoidable = attacker_flags.contains(CombatFlags::UNAVOIDABLE);
                let rate = match (attack, unavoidable) {
                    (_, false) => self.base_evade_rate(attack),
                    (AttackType::Thrust, true) => {
                        self.thrust_evade_rate * self.unavoidable_thrust_factor
                    }
                    (AttackType::Slash | AttackType::Down, true) => 0.0,
                };
                hit_outcome(OutcomeKind::Hit, hit)
                    .with_evade_rate(rate)
                    .with_evade_anims(strike, "evade")
            }
            ResponseType::CounterSlash | ResponseType::CounterDown => {
                if attack.countered_by() == Some(response) {
                    let counter = match attack {
                        AttackType::Down => self.down_counter,
                        _ => self.slash_counter,
                    };
                    ActionOutcome::new(OutcomeKind::Countered)
                        .with_attacker_ratios(counter.residual, counter.fatal)
                        .with_hit_anims("damaged", response.into())
                } else if attack == AttackType::Thrust {
                    hit_outcome(OutcomeKind::Hit, hit)
                } else {
                    hit_outcome(OutcomeKind::CounterMissed, hit)
                }
            }
            ResponseType::Cover => match attack {
                AttackType::Thrust => hit_outcome(OutcomeKind::CoverPierced, hit),
                AttackType::Slash | AttackType::Down => {
                    ActionOutcome::new(OutcomeKind::Covered)
                        .with_defender_ratios(
                            hit.residual * self.cover_ratio,
                            hit.fatal * self.cover_ratio,
                        )
                        .with_hit_anims(strike, "guard")
                }
            },
        }
    }
}
