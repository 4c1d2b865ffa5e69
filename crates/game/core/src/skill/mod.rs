//! Skills: definitions, owned instances, forge derivation and effects.
//!
//! ```text
//! SkillCatalog ──instantiate──▶ Skill (owned by character/equipment)
//! ForgeProfile ──derive──────▶ Vec<Skill> (forge categories only)
//! &[Skill]     ──collect─────▶ SkillEffects ──apply_to──▶ StatBlock (clone)
//! ```

pub mod catalog;
pub mod effects;
pub mod forge;
pub mod types;

pub use catalog::{SkillCatalog, SkillDefinition, names};
pub use effects::{CombatFlags, SkillEffects, preview_forge};
pub use forge::{
    EquipmentForge, ForgeProfile, MASTERY_THRESHOLD, Trend, UnknownTrend, derive_forge_skills,
    rebuild_skills, refresh_forge_skills,
};
pub use types::{Skill, SkillCategory, SkillTrigger};
