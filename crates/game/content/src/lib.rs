//! Data-driven battle content and loaders.
//!
//! This crate houses the default battle data and provides loaders for RON/TOML files:
//! - Battle configuration and interaction table (TOML)
//! - Skill catalog (RON)
//! - Rosters with stats, skills and forged weapons (RON)
//!
//! Content is turned into battle-core values at load time and never appears in
//! battle state.

pub mod embedded;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CombatantSpec, ConfigLoader, ContentBundle, ContentFactory, ForgeSpec, RosterLoader,
    SkillCatalogLoader, SkillRef, StatSpec, Weapon, WeaponSpec,
};
