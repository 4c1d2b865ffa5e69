//! RNG oracle for deterministic random number generation.
//!
//! Evasion rolls must replay identically from the same battle seed, so every
//! roll derives its own seed from `(game_seed, turn, attacker, slot)` instead
//! of advancing shared mutable state.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must produce the same values given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)` built from the top 24 bits.
    fn roll_unit(&self, seed: u64) -> f32 {
        (self.next_u32(seed) >> 8) as f32 / (1u32 << 24) as f32
    }

    /// `true` with probability `chance` (clamped to `[0, 1]`).
    fn chance(&self, seed: u64, chance: f32) -> bool {
        self.roll_unit(seed) < chance.clamp(0.0, 1.0)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// `state' = state × multiplier + increment (mod 2^64)`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed for one roll.
///
/// * `game_seed` - battle seed from the config
/// * `turn` - turn number
/// * `actor` - raw id of the attacking combatant
/// * `slot` - reservation slot index
pub fn compute_seed(game_seed: u64, turn: u64, actor: u32, slot: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= turn.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (slot as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
