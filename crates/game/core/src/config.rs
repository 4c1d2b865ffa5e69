use crate::combat::InteractionTable;

/// Battle configuration constants and tunable balance parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Minimum `insight - confuse` margin for a reservation slot to be revealed
    /// to the defender.
    ///
    /// Calibration value owned by game design; the default only makes equal
    /// stats reveal.
    pub reveal_threshold: i32,

    /// Reservation limit given to freshly created stat blocks.
    pub default_max_reservations: u32,

    /// Cover charges the defending side receives at the start of every turn.
    pub cover_per_turn: u32,

    /// Upper bound on turns a session plays before declaring a draw.
    pub max_turns: u32,

    /// Base seed mixed into every evasion roll.
    pub game_seed: u64,

    /// Attack/response interaction rules.
    pub interaction: InteractionTable,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard capacity of the per-turn reservation and prediction queues.
    pub const MAX_SLOTS: usize = 12;
    pub const MAX_COMBATANTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_RESERVATIONS: u32 = 6;
    pub const DEFAULT_REVEAL_THRESHOLD: i32 = 0;
    pub const DEFAULT_COVER_PER_TURN: u32 = 1;
    pub const DEFAULT_MAX_TURNS: u32 = 30;

    pub fn new() -> Self {
        Self {
            reveal_threshold: Self::DEFAULT_REVEAL_THRESHOLD,
            default_max_reservations: Self::DEFAULT_MAX_RESERVATIONS,
            cover_per_turn: Self::DEFAULT_COVER_PER_TURN,
            max_turns: Self::DEFAULT_MAX_TURNS,
            game_seed: 0,
            interaction: InteractionTable::default(),
        }
    }

    pub fn with_reveal_threshold(mut self, reveal_threshold: i32) -> Self {
        self.reveal_threshold = reveal_threshold;
        self
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }

    pub fn with_cover_per_turn(mut self, cover_per_turn: u32) -> Self {
        self.cover_per_turn = cover_per_turn;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionTable) -> Self {
        self.interaction = interaction;
        self
    }

    /// Caps a combatant's reservation limit to the queue capacity.
    pub fn slot_limit(requested: u32) -> u32 {
        requested.min(Self::MAX_SLOTS as u32)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
