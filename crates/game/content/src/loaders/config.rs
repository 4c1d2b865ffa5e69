//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
///
/// Missing keys fall back to [`BattleConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        anyhow::ensure!(
            (0.0..=1.0).contains(&config.interaction.evade_rate)
                && (0.0..=1.0).contains(&config.interaction.thrust_evade_rate),
            "Evade rates must lie in [0, 1]"
        );
        anyhow::ensure!(
            config.max_turns > 0,
            "max_turns must be positive"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            reveal_threshold = 2
            game_seed = 99

            [interaction]
            evade_rate = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.reveal_threshold, 2);
        assert_eq!(config.game_seed, 99);
        assert_eq!(config.interaction.evade_rate, 0.5);
        assert_eq!(config.interaction.thrust_evade_rate, 0.3);
        assert_eq!(config.cover_per_turn, BattleConfig::DEFAULT_COVER_PER_TURN);
    }

    #[test]
    fn out_of_range_evade_rate_is_rejected() {
        let err = ConfigLoader::parse("[interaction]\nevade_rate = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("Evade rates"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/battle.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/battle.toml"));
    }
}
