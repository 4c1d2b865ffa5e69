//! Durable projection of a [`StatBlock`] for the save collaborator.
//!
//! Records use signed, wide integers so that corrupted or hand-edited saves
//! (negative HP, layers exceeding the maximum) can still be read and are
//! clamped back into the invariants on load instead of failing.

use strum::EnumCount;

use super::block::StatBlock;
use super::hands::HandsLedger;
use crate::state::AttackType;

/// Persisted stat fields. Display ratios are deliberately absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatRecord {
    pub max_hp: i64,
    pub residual_hp: i64,
    pub fatal_hp: i64,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub insight: i32,
    pub confuse: i32,
    pub intelligence: i32,
    pub max_reservation_per_turn: i64,
    pub max_hands: [i64; AttackType::COUNT],
    pub remaining_hands: [i64; AttackType::COUNT],
    pub no_ningu_speed_bonus_value: i32,
    /// Amount the no-ningu bonus added to `speed`, when applied.
    pub no_ningu_speed_bonus_applied: Option<i32>,
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

impl From<&StatBlock> for StatRecord {
    fn from(block: &StatBlock) -> Self {
        Self {
            max_hp: block.max_hp().into(),
            residual_hp: block.residual_hp().into(),
            fatal_hp: block.fatal_hp().into(),
            attack: block.attack,
            defense: block.defense,
            speed: block.speed,
            insight: block.insight,
            confuse: block.confuse,
            intelligence: block.intelligence,
            max_reservation_per_turn: block.max_reservation_per_turn.into(),
            max_hands: block.hands.max_all().map(i64::from),
            remaining_hands: block.hands.remaining_all().map(i64::from),
            no_ningu_speed_bonus_value: block.no_ningu_speed_bonus_value,
            no_ningu_speed_bonus_applied: block.no_ningu_applied_amount(),
        }
    }
}

impl StatRecord {
    /// Rebuilds a live block, clamping every field into its invariants.
    ///
    /// Display ratios are recomputed from the clamped HP.
    pub fn to_stat_block(&self) -> StatBlock {
        let mut hands = HandsLedger::new(self.max_hands.map(clamp_u32));
        for attack in AttackType::ALL {
            hands.set_remaining(attack, clamp_u32(self.remaining_hands[attack.index()]));
        }

        let mut block = StatBlock::new().with_hands(hands);
        block.set_max_hp(clamp_u32(self.max_hp));
        block.set_hp(clamp_u32(self.residual_hp), clamp_u32(self.fatal_hp));
        block.attack = self.attack;
        block.defense = self.defense;
        block.speed = self.speed;
        block.insight = self.insight;
        block.confuse = self.confuse;
        block.intelligence = self.intelligence;
        block.max_reservation_per_turn = clamp_u32(self.max_reservation_per_turn);
        block.no_ningu_speed_bonus_value = self.no_ningu_speed_bonus_value;
        block.restore_no_ningu_applied(self.no_ningu_speed_bonus_applied);
        block
    }
}
