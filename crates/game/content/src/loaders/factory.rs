//! Content factory for assembling a battle from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, Roster, SkillCatalog};

use crate::embedded;
use crate::loaders::{ConfigLoader, LoadResult, RosterLoader, SkillCatalogLoader};

/// Everything needed to construct a `BattleEngine`.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: BattleConfig,
    pub catalog: SkillCatalog,
    pub roster: Roster,
}

/// Content factory that loads battle content from a data directory, or from
/// the data compiled into the crate.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── skills.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// Factory backed by the embedded default data.
    pub fn builtin() -> Self {
        Self { data_dir: None }
    }

    /// Load battle configuration from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        match &self.data_dir {
            Some(dir) => ConfigLoader::load(&dir.join("battle.toml")),
            None => ConfigLoader::parse(embedded::CONFIG_TOML),
        }
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillCatalog> {
        match &self.data_dir {
            Some(dir) => SkillCatalogLoader::load(&dir.join("skills.ron")),
            None => SkillCatalogLoader::parse(embedded::SKILLS_RON),
        }
    }

    /// Load the roster from `roster.ron`.
    pub fn load_roster(&self, catalog: &SkillCatalog, config: &BattleConfig) -> LoadResult<Roster> {
        match &self.data_dir {
            Some(dir) => RosterLoader::load(&dir.join("roster.ron"), catalog, config),
            None => RosterLoader::parse(embedded::ROSTER_RON, catalog, config),
        }
    }

    /// Loads config, catalog and roster in dependency order.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let config = self.load_config()?;
        let catalog = self.load_skills()?;
        let roster = self.load_roster(&catalog, &config)?;
        Ok(ContentBundle {
            config,
            catalog,
            roster,
        })
    }

    /// Returns the data directory path, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{CombatantId, Side};

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Some(Path::new("/tmp/data")));
        assert_eq!(ContentFactory::builtin().data_dir(), None);
    }

    #[test]
    fn embedded_content_loads() {
        let bundle = ContentFactory::builtin().load_bundle().unwrap();

        assert_eq!(bundle.config.game_seed, 20240611);
        assert!(bundle.catalog.contains("煙玉"));
        assert_eq!(bundle.roster.living(Side::Player).count(), 2);
        assert_eq!(bundle.roster.living(Side::Enemy).count(), 2);

        let leader = bundle.roster.get(CombatantId(10)).unwrap();
        assert_eq!(leader.stats.max_reservation_per_turn, 5);
        assert!(leader.flags().contains(battle_core::CombatFlags::LETHALIZE));
    }

    #[test]
    fn embedded_data_directory_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let bundle = ContentFactory::new(dir).load_bundle().unwrap();
        assert_eq!(bundle.roster.len(), 4);
    }
}
