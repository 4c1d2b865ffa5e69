//! Roster loader.
//!
//! Turns RON combatant specs into live [`Combatant`]s: resolves skill ids
//! against the catalog, re-forges each weapon's derived skills and folds every
//! skill bonus into the starting stats.

use std::path::Path;

use battle_core::{
    BattleConfig, Combatant, CombatantId, EquipmentForge, ForgeProfile, HandsLedger, Roster,
    Side, Skill, SkillCatalog, StatBlock, refresh_forge_skills,
};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Base attributes as written in content files.
#[derive(Clone, Debug, Deserialize)]
pub struct StatSpec {
    pub max_hp: u32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub insight: i32,
    #[serde(default)]
    pub confuse: i32,
    #[serde(default)]
    pub intelligence: i32,
    /// Falls back to `BattleConfig::default_max_reservations`.
    #[serde(default)]
    pub max_reservation_per_turn: Option<u32>,
    /// Maximum hands as `(thrust, slash, down)`.
    pub hands: (u32, u32, u32),
    /// Speed granted while no ninja tool is carried.
    #[serde(default)]
    pub no_ningu_speed_bonus: i32,
}

impl StatSpec {
    pub fn to_stat_block(&self, config: &BattleConfig) -> StatBlock {
        let (thrust, slash, down) = self.hands;
        let mut block =
            StatBlock::with_max_hp(self.max_hp).with_hands(HandsLedger::new([thrust, slash, down]));
        block.attack = self.attack;
        block.defense = self.defense;
        block.speed = self.speed;
        block.insight = self.insight;
        block.confuse = self.confuse;
        block.intelligence = self.intelligence;
        block.max_reservation_per_turn = self
            .max_reservation_per_turn
            .unwrap_or(config.default_max_reservations);
        block.no_ningu_speed_bonus_value = self.no_ningu_speed_bonus;
        block
    }
}

/// Reference to a catalog skill.
#[derive(Clone, Debug, Deserialize)]
pub struct SkillRef {
    pub id: String,
    #[serde(default)]
    pub level: u32,
}

/// Forge values of a weapon. `trend` is the in-game label.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ForgeSpec {
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub sharp: i32,
    #[serde(default)]
    pub trend: String,
}

impl ForgeSpec {
    pub fn profile(&self) -> ForgeProfile {
        ForgeProfile::from_label(self.weight, self.sharp, &self.trend)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    /// Fixed and slot skills; forge skills are derived, never listed.
    #[serde(default)]
    pub skills: Vec<SkillRef>,
    #[serde(default)]
    pub forge: ForgeSpec,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CombatantSpec {
    pub id: u32,
    pub name: String,
    pub side: Side,
    pub stats: StatSpec,
    #[serde(default)]
    pub skills: Vec<SkillRef>,
    #[serde(default)]
    pub weapon: Option<WeaponSpec>,
    #[serde(default)]
    pub ninja_tools: Vec<SkillRef>,
}

/// A weapon during roster assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct Weapon {
    pub name: String,
    pub forge: ForgeProfile,
    skills: Vec<Skill>,
}

impl Weapon {
    pub fn new(name: impl Into<String>, forge: ForgeProfile, skills: Vec<Skill>) -> Self {
        Self {
            name: name.into(),
            forge,
            skills,
        }
    }

    pub fn into_skills(self) -> Vec<Skill> {
        self.skills
    }
}

impl EquipmentForge for Weapon {
    fn forge_profile(&self) -> ForgeProfile {
        self.forge
    }

    fn skills(&self) -> &[Skill] {
        &self.skills
    }

    fn replace_skills(&mut self, skills: Vec<Skill>) {
        self.skills = skills;
    }
}

fn resolve_skills(
    refs: &[SkillRef],
    catalog: &SkillCatalog,
    owner: &str,
) -> LoadResult<Vec<Skill>> {
    refs.iter()
        .map(|r| {
            catalog.instantiate(&r.id, r.level).ok_or_else(|| {
                anyhow::anyhow!("Unknown skill '{}' referenced by '{}'", r.id, owner)
            })
        })
        .collect()
}

/// Loader for rosters from RON files.
///
/// RON format: `Vec<CombatantSpec>`.
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path, catalog: &SkillCatalog, config: &BattleConfig) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content, catalog, config)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str, catalog: &SkillCatalog, config: &BattleConfig) -> LoadResult<Roster> {
        let specs: Vec<CombatantSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut roster = Roster::new();
        for spec in &specs {
            let combatant = Self::build(spec, catalog, config)?;
            roster
                .push(combatant)
                .map_err(|e| anyhow::anyhow!("Failed to add '{}' to roster: {}", spec.name, e))?;
        }

        for side in [Side::Player, Side::Enemy] {
            anyhow::ensure!(
                roster.living(side).next().is_some(),
                "Roster has no living combatant on the {} side",
                side
            );
        }
        Ok(roster)
    }

    /// Builds one combatant at full HP and full hands.
    pub fn build(
        spec: &CombatantSpec,
        catalog: &SkillCatalog,
        config: &BattleConfig,
    ) -> LoadResult<Combatant> {
        let mut skills = resolve_skills(&spec.skills, catalog, &spec.name)?;

        if let Some(weapon_spec) = &spec.weapon {
            let forge = weapon_spec.forge.profile();
            let fixed = resolve_skills(&weapon_spec.skills, catalog, &weapon_spec.name)?;
            let mut weapon = Weapon::new(weapon_spec.name.clone(), forge, fixed);
            refresh_forge_skills(&mut weapon, catalog);
            skills.extend(weapon.into_skills());
        }

        let ninja_tools = resolve_skills(&spec.ninja_tools, catalog, &spec.name)?;
        let carries_ninja_tool = !ninja_tools.is_empty();
        skills.extend(ninja_tools);

        let mut base = spec.stats.to_stat_block(config);
        base.apply_no_ningu_speed_bonus(!carries_ninja_tool);

        Ok(Combatant::from_base(
            CombatantId(spec.id),
            spec.name.clone(),
            spec.side,
            &base,
            skills,
        ))
    }
}
