//! Deterministic rules of the reservation/prediction battle system.
//!
//! `battle-core` defines the canonical mechanics (stat blocks, hands, skills,
//! the turn protocol and outcome resolution) as pure APIs with no I/O. All
//! battle state mutation flows through [`engine::BattleEngine`]; the content
//! and runtime crates depend on the types re-exported here.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod skill;
pub mod state;
pub mod stats;
pub mod turn;

pub use combat::{
    ActionOutcome, AttackMinusDefense, DamageDealt, DamageFormula, HitRatios, InteractionTable,
    OutcomeKind, OutcomeResolver, SlotResolution, TurnResolution,
};
pub use config::BattleConfig;
pub use engine::{BattleEngine, TurnError};
pub use env::{PcgRng, RngOracle, compute_seed};
pub use error::{BattleError, ErrorSeverity};
pub use skill::{
    CombatFlags, EquipmentForge, ForgeProfile, Skill, SkillCatalog, SkillCategory,
    SkillDefinition, SkillEffects, SkillTrigger, Trend, derive_forge_skills, preview_forge,
    rebuild_skills, refresh_forge_skills,
};
pub use state::{AttackType, Combatant, CombatantId, ResponseType, Roster, RosterError, Side};
pub use stats::{HandsLedger, StatBlock, StatRecord};
pub use turn::{
    BattleContext, CoverFallback, PlannedAction, PredictedResponse, PredictionAck,
    PredictionError, PredictionInput, ReservationError, SlotView, TurnPhase,
};
