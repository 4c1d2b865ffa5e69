//! Default data files compiled into the binary.

pub const CONFIG_TOML: &str = include_str!("../data/battle.toml");
pub const SKILLS_RON: &str = include_str!("../data/skills.ron");
pub const ROSTER_RON: &str = include_str!("../data/roster.ron");
