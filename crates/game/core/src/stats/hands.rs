//! Hands ledger: per-attack-type action tokens.
//!
//! Every type is always present. Storage is a fixed array indexed by
//! [`AttackType::index`], so lookups never miss and clones never alias.

use strum::EnumCount;

use crate::state::AttackType;

const TYPES: usize = AttackType::COUNT;

/// Remaining/maximum action counters for one combatant.
///
/// # Invariants
///
/// - `remaining[t] <= max[t]` for every type
/// - `end_of_turn` is a display cache; it never feeds back into `remaining`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandsLedger {
    max: [u32; TYPES],
    remaining: [u32; TYPES],
    end_of_turn: [Option<u32>; TYPES],
}

impl HandsLedger {
    /// Creates a full ledger with the given per-type maximums.
    pub const fn new(max: [u32; TYPES]) -> Self {
        Self {
            max,
            remaining: max,
            end_of_turn: [None; TYPES],
        }
    }

    /// Same maximum for every attack type.
    pub const fn uniform(max: u32) -> Self {
        Self::new([max; TYPES])
    }

    pub fn max(&self, attack: AttackType) -> u32 {
        self.max[attack.index()]
    }

    pub fn remaining(&self, attack: AttackType) -> u32 {
        self.remaining[attack.index()]
    }

    pub fn end_of_turn(&self, attack: AttackType) -> Option<u32> {
        self.end_of_turn[attack.index()]
    }

    pub fn max_all(&self) -> [u32; TYPES] {
        self.max
    }

    pub fn remaining_all(&self) -> [u32; TYPES] {
        self.remaining
    }

    pub fn has(&self, attack: AttackType) -> bool {
        self.remaining(attack) > 0
    }

    pub fn total_remaining(&self) -> u32 {
        self.remaining.iter().sum()
    }

    /// Changes a maximum, pulling `remaining` down if it would exceed it.
    pub fn set_max(&mut self, attack: AttackType, max: u32) {
        let i = attack.index();
        self.max[i] = max;
        self.remaining[i] = self.remaining[i].min(max);
    }

    /// Sets the remaining count, clamped to the maximum.
    pub fn set_remaining(&mut self, attack: AttackType, remaining: u32) {
        let i = attack.index();
        self.remaining[i] = remaining.min(self.max[i]);
    }

    /// Spends one hand of `attack`. Returns `false` (and changes nothing)
    /// when none remain.
    pub fn try_consume(&mut self, attack: AttackType) -> bool {
        let slot = &mut self.remaining[attack.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Adds `count` to every type, saturating at the maximum.
    ///
    /// The end-of-turn cache is refreshed only for types it already tracks.
    pub fn add(&mut self, count: u32) {
        for i in 0..TYPES {
            self.remaining[i] = self.remaining[i].saturating_add(count).min(self.max[i]);
            if let Some(cached) = self.end_of_turn[i].as_mut() {
                *cached = self.remaining[i];
            }
        }
    }

    /// Refills every type to its maximum.
    pub fn reset(&mut self) {
        self.remaining = self.max;
    }

    /// Starts tracking `attack` in the end-of-turn cache.
    pub fn track_end_of_turn(&mut self, attack: AttackType) {
        let i = attack.index();
        self.end_of_turn[i] = Some(self.remaining[i]);
    }

    /// Copies `remaining` into the end-of-turn cache for every type.
    pub fn snapshot_end_of_turn(&mut self) {
        for i in 0..TYPES {
            self.end_of_turn[i] = Some(self.remaining[i]);
        }
    }
}
