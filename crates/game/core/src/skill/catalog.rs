//! Static registry of skill definitions keyed by identifier.

use std::collections::BTreeMap;

use super::types::{Skill, SkillCategory, SkillTrigger};

/// Identifiers of skills the engine gives meaning to.
pub mod names {
    pub const ATTACK_UP: &str = "攻撃強化";
    pub const DEFENSE_UP: &str = "防御強化";
    pub const AGILITY_UP: &str = "敏捷強化";
    pub const FATAL_UP: &str = "致命強化";
    pub const RESIDUAL_UP: &str = "残痕強化";

    pub const MIND_MASTERY: &str = "心の極意";
    pub const BODY_MASTERY: &str = "体の極意";
    pub const TECH_MASTERY_PIERCE: &str = "技の極意(穿)";
    pub const TECH_MASTERY_SWIFT: &str = "技の極意(迅)";
    pub const TECH_MASTERY_HEAVY: &str = "技の極意(剛)";
    pub const TECH_MASTERY_ALL: &str = "技の極意(全)";

    pub const UNAVOIDABLE: &str = "不可避";
    pub const LETHALIZE: &str = "致命化";
    pub const UNLIMITED_COUNTER: &str = "反撃無制限";
}

/// Catalog entry describing a skill independent of any owner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: String,
    pub category: SkillCategory,
    pub trigger: SkillTrigger,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl SkillDefinition {
    pub fn new(
        id: impl Into<String>,
        category: SkillCategory,
        trigger: SkillTrigger,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            trigger,
            description: description.into(),
        }
    }
}

/// Skill definitions keyed by id. Iteration order is stable (sorted by id).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    definitions: BTreeMap<String, SkillDefinition>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog containing every skill the rules reference.
    pub fn builtin() -> Self {
        use SkillCategory::{Character, MaxForge, WeaponFixed, WeaponForge};
        use SkillTrigger::{OnBattle, OnForge};

        Self::from_definitions([
            SkillDefinition::new(names::ATTACK_UP, WeaponForge, OnForge, "攻撃+{level}"),
            SkillDefinition::new(names::DEFENSE_UP, WeaponForge, OnForge, "防御+{level}"),
            SkillDefinition::new(names::AGILITY_UP, WeaponForge, OnForge, "敏捷+{level}"),
            SkillDefinition::new(names::FATAL_UP, WeaponForge, OnForge, "致命ダメージ+{level}%"),
            SkillDefinition::new(names::RESIDUAL_UP, WeaponForge, OnForge, "残痕ダメージ+{level}%"),
            SkillDefinition::new(names::MIND_MASTERY, MaxForge, OnForge, "予約上限+1"),
            SkillDefinition::new(names::BODY_MASTERY, MaxForge, OnForge, "全ての手数+1"),
            SkillDefinition::new(names::TECH_MASTERY_PIERCE, MaxForge, OnForge, "突きの手数+1"),
            SkillDefinition::new(names::TECH_MASTERY_SWIFT, MaxForge, OnForge, "斬りの手数+1"),
            SkillDefinition::new(names::TECH_MASTERY_HEAVY, MaxForge, OnForge, "落としの手数+1"),
            SkillDefinition::new(names::TECH_MASTERY_ALL, MaxForge, OnForge, "全ての手数+1"),
            SkillDefinition::new(names::UNAVOIDABLE, WeaponFixed, OnBattle, "斬り・落としは回避されない"),
            SkillDefinition::new(names::LETHALIZE, Character, OnBattle, "与える残痕ダメージを致命ダメージにする"),
            SkillDefinition::new(names::UNLIMITED_COUNTER, Character, OnBattle, "反撃で手数を消費しない"),
        ])
    }

    /// Builds a catalog; later definitions replace earlier ones with the same id.
    pub fn from_definitions(definitions: impl IntoIterator<Item = SkillDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition);
        }
        catalog
    }

    /// Adds a definition, returning the one it replaced.
    pub fn register(&mut self, definition: SkillDefinition) -> Option<SkillDefinition> {
        self.definitions.insert(definition.id.clone(), definition)
    }

    pub fn get(&self, id: &str) -> Option<&SkillDefinition> {
        self.definitions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Creates an owned skill at `level` from a registered definition.
    pub fn instantiate(&self, id: &str, level: u32) -> Option<Skill> {
        self.get(id).map(|definition| {
            Skill::new(definition.id.clone(), definition.category, definition.trigger)
                .with_level(level)
                .with_description(definition.description.clone())
        })
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.definitions.values()
    }
}
