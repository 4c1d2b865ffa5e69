//! Skill catalog loader.

use std::path::Path;

use battle_core::{SkillCatalog, SkillDefinition};

use crate::loaders::{LoadResult, read_file};

/// Loader for skill definitions from RON files.
///
/// RON format: `Vec<SkillDefinition>`. Definitions are layered over
/// [`SkillCatalog::builtin`], so a file only needs to list additions and the
/// descriptions it wants to override.
pub struct SkillCatalogLoader;

impl SkillCatalogLoader {
    pub fn load(path: &Path) -> LoadResult<SkillCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<SkillCatalog> {
        let definitions: Vec<SkillDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let mut catalog = SkillCatalog::builtin();
        for definition in definitions {
            anyhow::ensure!(!definition.id.is_empty(), "Skill definition with empty id");
            catalog.register(definition);
        }
        Ok(catalog)
    }
}
