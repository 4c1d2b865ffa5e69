//! Mechanical effects of skills.
//!
//! Skills are folded into a [`SkillEffects`] summary once per owner. Stat
//! bonuses are applied to a cloned [`StatBlock`], never to the base in place,
//! so previews and live combat state cannot alias.

use strum::EnumCount;

use super::catalog::names;
use super::forge::{ForgeProfile, rebuild_skills};
use super::types::Skill;
use super::SkillCatalog;
use crate::state::AttackType;
use crate::stats::StatBlock;

bitflags::bitflags! {
    /// Battle-time rule switches granted by skills.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatFlags: u8 {
        /// 不可避: Slash/Down cannot be evaded; Thrust evade rate is halved.
        const UNAVOIDABLE = 1 << 0;
        /// 致命化: residual damage dealt is converted to fatal damage.
        const LETHALIZE = 1 << 1;
        /// 反撃無制限: counters consume no hands.
        const UNLIMITED_COUNTER = 1 << 2;
    }
}

/// Aggregated effect of an owner's skill list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkillEffects {
    pub flags: CombatFlags,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub reservation_bonus: u32,
    pub hands_bonus: [u32; AttackType::COUNT],
    /// Percentage added to fatal damage this owner deals.
    pub fatal_boost: u32,
    /// Percentage added to residual damage this owner deals.
    pub residual_boost: u32,
}

fn level_i32(skill: &Skill) -> i32 {
    i32::try_from(skill.level).unwrap_or(i32::MAX)
}

impl SkillEffects {
    pub fn collect(skills: &[Skill]) -> Self {
        let mut effects = Self::default();
        for skill in skills {
            effects.absorb(skill);
        }
        effects
    }

    fn absorb(&mut self, skill: &Skill) {
        match skill.id.as_str() {
            names::ATTACK_UP => self.attack = self.attack.saturating_add(level_i32(skill)),
            names::DEFENSE_UP => self.defense = self.defense.saturating_add(level_i32(skill)),
            names::AGILITY_UP => self.speed = self.speed.saturating_add(level_i32(skill)),
            names::FATAL_UP => self.fatal_boost = self.fatal_boost.saturating_add(skill.level),
            names::RESIDUAL_UP => {
                self.residual_boost = self.residual_boost.saturating_add(skill.level)
            }
            names::MIND_MASTERY => self.reservation_bonus += 1,
            names::BODY_MASTERY | names::TECH_MASTERY_ALL => {
                for bonus in &mut self.hands_bonus {
                    *bonus += 1;
                }
            }
            names::TECH_MASTERY_PIERCE => self.hands_bonus[AttackType::Thrust.index()] += 1,
            names::TECH_MASTERY_SWIFT => self.hands_bonus[AttackType::Slash.index()] += 1,
            names::TECH_MASTERY_HEAVY => self.hands_bonus[AttackType::Down.index()] += 1,
            names::UNAVOIDABLE => self.flags |= CombatFlags::UNAVOIDABLE,
            names::LETHALIZE => self.flags |= CombatFlags::LETHALIZE,
            names::UNLIMITED_COUNTER => self.flags |= CombatFlags::UNLIMITED_COUNTER,
            _ => {}
        }
    }

    /// Returns a copy of `base` with stat bonuses applied.
    ///
    /// HP layers and remaining hands are copied unchanged (remaining hands are
    /// only raised by an explicit reset).
    pub fn apply_to(&self, base: &StatBlock) -> StatBlock {
        let mut block = base.clone();
        block.attack = block.attack.saturating_add(self.attack);
        block.defense = block.defense.saturating_add(self.defense);
        block.speed = block.speed.saturating_add(self.speed);
        block.max_reservation_per_turn = block
            .max_reservation_per_turn
            .saturating_add(self.reservation_bonus);
        for attack in AttackType::ALL {
            let max = block
                .hands
                .max(attack)
                .saturating_add(self.hands_bonus[attack.index()]);
            block.hands.set_max(attack, max);
        }
        block
    }

    /// Scales a dealt `(residual, fatal)` pair by this owner's damage boosts,
    /// then reroutes residual into fatal when [`CombatFlags::LETHALIZE`] is set.
    pub fn shape_damage(&self, residual: u32, fatal: u32) -> (u32, u32) {
        let boost = |amount: u32, percent: u32| -> u32 {
            let scaled = u64::from(amount) * (100 + u64::from(percent)) / 100;
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };
        let residual = boost(residual, self.residual_boost);
        let fatal = boost(fatal, self.fatal_boost);

        if self.flags.contains(CombatFlags::LETHALIZE) {
            (0, fatal.saturating_add(residual))
        } else {
            (residual, fatal)
        }
    }
}

/// Effective stats `base` would have if `skills` were re-forged to `profile`.
///
/// Pure: neither `base` nor `skills` is modified.
pub fn preview_forge(
    base: &StatBlock,
    skills: &[Skill],
    profile: &ForgeProfile,
    catalog: &SkillCatalog,
) -> StatBlock {
    let rebuilt = rebuild_skills(skills, profile, catalog);
    SkillEffects::collect(&rebuilt).apply_to(base)
}
