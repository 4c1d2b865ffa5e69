//! Base damage calculation.
//!
//! The Attack-vs-Defense formula is a balancing concern owned by game design,
//! so the resolver only depends on the [`DamageFormula`] trait.

use crate::stats::StatBlock;

/// Pluggable base-damage function.
///
/// The returned value is multiplied by the interaction ratios of a slot.
pub trait DamageFormula: Send + Sync {
    fn base_damage(&self, dealer: &StatBlock, receiver: &StatBlock) -> u32;
}

/// `max(attack - defense, minimum)`.
///
/// Placeholder until the balance formula is calibrated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackMinusDefense {
    pub minimum: u32,
}

impl Default for AttackMinusDefense {
    fn default() -> Self {
        Self { minimum: 1 }
    }
}

impl DamageFormula for AttackMinusDefense {
    fn base_damage(&self, dealer: &StatBlock, receiver: &StatBlock) -> u32 {
        let raw = i64::from(dealer.attack) - i64::from(receiver.defense);
        raw.max(i64::from(self.minimum)).min(i64::from(u32::MAX)) as u32
    }
}

/// `base × ratio`, rounded to the nearest integer. Negative ratios count as 0.
pub fn scale_damage(base: u32, ratio: f32) -> u32 {
    let scaled = (f64::from(base) * f64::from(ratio.max(0.0))).round();
    scaled.min(f64::from(u32::MAX)) as u32
}
