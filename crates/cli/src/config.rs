//! Environment-driven settings for the battle binary.

use std::env;
use std::path::PathBuf;

/// Settings read from the process environment (after `.env` is loaded).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding `battle.toml`, `skills.ron` and `roster.ron`.
    /// Embedded content is used when unset.
    pub content_dir: Option<PathBuf>,
    /// Overrides `game_seed` from the content config.
    pub seed: Option<u64>,
    /// Overrides `max_turns` from the content config.
    pub max_turns: Option<u32>,
    /// Where the final roster is saved, if anywhere.
    pub save_dir: Option<PathBuf>,
    /// Print every battle event to stdout as one JSON line.
    pub json_events: bool,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            content_dir: env::var_os("BATTLE_CONTENT_DIR").map(PathBuf::from),
            seed: read_env("BATTLE_SEED"),
            max_turns: read_env::<u32>("BATTLE_MAX_TURNS").filter(|turns| *turns > 0),
            save_dir: env::var_os("BATTLE_SAVE_DIR").map(PathBuf::from),
            json_events: read_env_bool("BATTLE_JSON_EVENTS").unwrap_or(false),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_values_are_lenient() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
