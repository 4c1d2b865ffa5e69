//! Skill value objects.
//!
//! Owners (characters, equipment) hold their own `Vec<Skill>`. Skills are
//! never shared by reference, so regenerating one owner's list cannot leak
//! into another's.

/// Where a skill comes from. Forge-derived categories are regenerated on every
/// forge change; all others are carried forward untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillCategory {
    Character,
    NinjaTool,
    WeaponFixed,
    WeaponSlot,
    MaxForge,
    WeaponForge,
}

impl SkillCategory {
    pub const fn is_forge_derived(self) -> bool {
        matches!(self, SkillCategory::MaxForge | SkillCategory::WeaponForge)
    }

    /// In-game label.
    pub const fn label(self) -> &'static str {
        match self {
            SkillCategory::Character => "キャラ",
            SkillCategory::NinjaTool => "忍具",
            SkillCategory::WeaponFixed => "武器固定",
            SkillCategory::WeaponSlot => "武器スロット",
            SkillCategory::MaxForge => "最大鍛錬",
            SkillCategory::WeaponForge => "武器鍛錬",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillTrigger {
    Passive,
    OnForge,
    OnBattle,
}

/// A skill instance held by a character or a piece of equipment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: String,
    /// Forge-derived intensity. `0` for skills without levels.
    pub level: u32,
    pub category: SkillCategory,
    pub trigger: SkillTrigger,
    /// Template; `{level}` is substituted by [`Skill::describe`].
    pub description: String,
}

impl Skill {
    pub fn new(id: impl Into<String>, category: SkillCategory, trigger: SkillTrigger) -> Self {
        Self {
            id: id.into(),
            level: 0,
            category,
            trigger,
            description: String::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// `Id`, or `Id＋Level` when the level is positive.
    pub fn display_name(&self) -> String {
        if self.level > 0 {
            format!("{}＋{}", self.id, self.level)
        } else {
            self.id.clone()
        }
    }

    pub fn describe(&self) -> String {
        self.description.replace("{level}", &self.level.to_string())
    }
}
