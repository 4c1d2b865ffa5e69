//! Forge-driven skill derivation.
//!
//! Equipment exposes two forge axes (weight, sharp) plus a combat-style
//! trend. The derived skill subset is a pure function of that triple and is
//! always rebuilt from scratch: the threshold rules interact, so an
//! incremental patch could leave stale masteries behind.

use core::str::FromStr;

use super::catalog::{SkillCatalog, names};
use super::types::{Skill, SkillCategory, SkillTrigger};

/// Absolute forge value at which mastery skills unlock.
pub const MASTERY_THRESHOLD: u32 = 10;

/// Equipment combat-style affinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trend {
    /// 穿特化
    Pierce,
    /// 迅特化
    Swift,
    /// 剛特化
    Heavy,
    /// 万能型
    Balanced,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown trend label: {0}")]
pub struct UnknownTrend(pub String);

impl Trend {
    pub const fn label(self) -> &'static str {
        match self {
            Trend::Pierce => "穿特化",
            Trend::Swift => "迅特化",
            Trend::Heavy => "剛特化",
            Trend::Balanced => "万能型",
        }
    }

    /// Parses an in-game label. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    const fn mastery(self) -> &'static str {
        match self {
            Trend::Pierce => names::TECH_MASTERY_PIERCE,
            Trend::Swift => names::TECH_MASTERY_SWIFT,
            Trend::Heavy => names::TECH_MASTERY_HEAVY,
            Trend::Balanced => names::TECH_MASTERY_ALL,
        }
    }
}

impl FromStr for Trend {
    type Err = UnknownTrend;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "穿特化" => Ok(Trend::Pierce),
            "迅特化" => Ok(Trend::Swift),
            "剛特化" => Ok(Trend::Heavy),
            "万能型" => Ok(Trend::Balanced),
            other => Err(UnknownTrend(other.to_owned())),
        }
    }
}

/// Forge state supplied by the equipment collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForgeProfile {
    pub weight: i32,
    pub sharp: i32,
    pub trend: Option<Trend>,
}

impl ForgeProfile {
    pub const fn new(weight: i32, sharp: i32, trend: Option<Trend>) -> Self {
        Self {
            weight,
            sharp,
            trend,
        }
    }

    /// Builds a profile from a raw trend label, dropping unknown labels.
    pub fn from_label(weight: i32, sharp: i32, trend: &str) -> Self {
        Self::new(weight, sharp, Trend::parse(trend))
    }
}

/// Equipment-side seam: supplies the forge triple and accepts the rebuilt list.
///
/// The engine never owns equipment identity.
pub trait EquipmentForge {
    fn forge_profile(&self) -> ForgeProfile;
    fn skills(&self) -> &[Skill];
    fn replace_skills(&mut self, skills: Vec<Skill>);
}

fn forged(id: &str, level: u32, category: SkillCategory, catalog: &SkillCatalog) -> Skill {
    let description = catalog
        .get(id)
        .map(|definition| definition.description.clone())
        .unwrap_or_default();
    Skill::new(id, category, SkillTrigger::OnForge)
        .with_level(level)
        .with_description(description)
}

/// Derives the complete forge-category skill list for `profile`.
///
/// Rules:
///
/// ```text
/// weight > 0               → 攻撃強化 @ weight
/// weight < 0               → 防御強化, 敏捷強化 @ |weight|
/// sharp  > 0               → 致命強化 @ sharp
/// sharp  < 0               → 残痕強化 @ |sharp|
/// |weight|, |sharp| >= 10  → 心の極意
/// |weight| >= 10           → 体の極意
/// |sharp|  >= 10           → 技の極意(穿/迅/剛/全) by trend (none if unknown)
/// ```
pub fn derive_forge_skills(profile: &ForgeProfile, catalog: &SkillCatalog) -> Vec<Skill> {
    use SkillCategory::{MaxForge, WeaponForge};

    let weight = profile.weight.unsigned_abs();
    let sharp = profile.sharp.unsigned_abs();
    let mut skills = Vec::new();

    match profile.weight.signum() {
        1 => skills.push(forged(names::ATTACK_UP, weight, WeaponForge, catalog)),
        -1 => {
            skills.push(forged(names::DEFENSE_UP, weight, WeaponForge, catalog));
            skills.push(forged(names::AGILITY_UP, weight, WeaponForge, catalog));
        }
        _ => {}
    }

    match profile.sharp.signum() {
        1 => skills.push(forged(names::FATAL_UP, sharp, WeaponForge, catalog)),
        -1 => skills.push(forged(names::RESIDUAL_UP, sharp, WeaponForge, catalog)),
        _ => {}
    }

    if weight >= MASTERY_THRESHOLD && sharp >= MASTERY_THRESHOLD {
        skills.push(forged(names::MIND_MASTERY, 0, MaxForge, catalog));
    }
    if weight >= MASTERY_THRESHOLD {
        skills.push(forged(names::BODY_MASTERY, 0, MaxForge, catalog));
    }
    if sharp >= MASTERY_THRESHOLD {
        if let Some(trend) = profile.trend {
            skills.push(forged(trend.mastery(), 0, MaxForge, catalog));
        }
    }

    skills
}

/// Replaces the forge-derived subset of `existing`, carrying every other
/// category forward in its original order.
pub fn rebuild_skills(
    existing: &[Skill],
    profile: &ForgeProfile,
    catalog: &SkillCatalog,
) -> Vec<Skill> {
    existing
        .iter()
        .filter(|skill| !skill.category.is_forge_derived())
        .cloned()
        .chain(derive_forge_skills(profile, catalog))
        .collect()
}

/// Re-derives an equipment's skills after its forge values changed.
pub fn refresh_forge_skills<E>(equipment: &mut E, catalog: &SkillCatalog)
where
    E: EquipmentForge + ?Sized,
{
    let rebuilt = rebuild_skills(equipment.skills(), &equipment.forge_profile(), catalog);
    equipment.replace_skills(rebuilt);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blade {
        forge: ForgeProfile,
        skills: Vec<Skill>,
    }

    impl EquipmentForge for Blade {
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

    fn summary(skills: &[Skill]) -> Vec<(String, u32)> {
        let mut out: Vec<_> = skills.iter().map(|s| (s.id.clone(), s.level)).collect();
        out.sort();
        out
    }

    fn expected(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
        let mut out: Vec<_> = pairs.iter().map(|(id, l)| (id.to_string(), *l)).collect();
        out.sort();
        out
    }

    #[test]
    fn swift_mastery_profile() {
        let catalog = SkillCatalog::builtin();
        let profile = ForgeProfile::from_label(10, -10, "迅特化");

        let skills = derive_forge_skills(&profile, &catalog);

        assert_eq!(
            summary(&skills),
            expected(&[
                (names::ATTACK_UP, 10),
                (names::RESIDUAL_UP, 10),
                (names::BODY_MASTERY, 0),
                (names::MIND_MASTERY, 0),
                (names::TECH_MASTERY_SWIFT, 0),
            ])
        );
    }

    #[test]
    fn negative_weight_adds_defense_and_agility() {
        let catalog = SkillCatalog::builtin();
        let skills = derive_forge_skills(&ForgeProfile::new(-4, 3, None), &catalog);

        assert_eq!(
            summary(&skills),
            expected(&[
                (names::DEFENSE_UP, 4),
                (names::AGILITY_UP, 4),
                (names::FATAL_UP, 3),
            ])
        );
    }

    #[test]
    fn zero_forge_derives_nothing() {
        let skills = derive_forge_skills(&ForgeProfile::default(), &SkillCatalog::builtin());
        assert!(skills.is_empty());
    }

    #[test]
    fn body_mastery_ignores_sharp() {
        let skills = derive_forge_skills(&ForgeProfile::new(-12, 0, None), &SkillCatalog::builtin());
        let ids: Vec<_> = skills.iter().map(|s| s.id.as_str()).collect();

        assert!(ids.contains(&names::BODY_MASTERY));
        assert!(!ids.contains(&names::MIND_MASTERY));
    }

    #[test]
    fn unknown_trend_adds_no_technique_mastery() {
        let profile = ForgeProfile::from_label(0, 15, "居合特化");
        assert_eq!(profile.trend, None);

        let skills = derive_forge_skills(&profile, &SkillCatalog::builtin());

        assert_eq!(summary(&skills), expected(&[(names::FATAL_UP, 15)]));
    }

    #[test]
    fn rebuild_clears_stale_forge_skills_and_keeps_ninja_tools() {
        let catalog = SkillCatalog::builtin();
        let ninja = Skill::new("煙玉", SkillCategory::NinjaTool, SkillTrigger::OnBattle);
        let mut blade = Blade {
            forge: ForgeProfile::from_label(12, 14, "穿特化"),
            skills: vec![ninja.clone()],
        };

        refresh_forge_skills(&mut blade, &catalog);
        assert!(blade.skills.iter().any(|s| s.id == names::TECH_MASTERY_PIERCE));

        blade.forge = ForgeProfile::from_label(10, -10, "迅特化");
        refresh_forge_skills(&mut blade, &catalog);
        refresh_forge_skills(&mut blade, &catalog);

        assert_eq!(blade.skills[0], ninja);
        let forged: Vec<_> = blade.skills[1..].to_vec();
        assert_eq!(
            summary(&forged),
            expected(&[
                (names::ATTACK_UP, 10),
                (names::RESIDUAL_UP, 10),
                (names::BODY_MASTERY, 0),
                (names::MIND_MASTERY, 0),
                (names::TECH_MASTERY_SWIFT, 0),
            ])
        );
    }

    #[test]
    fn derived_skills_carry_catalog_descriptions() {
        let skills = derive_forge_skills(&ForgeProfile::new(5, 0, None), &SkillCatalog::builtin());
        assert_eq!(skills[0].describe(), "攻撃+5");

        let bare = derive_forge_skills(&ForgeProfile::new(5, 0, None), &SkillCatalog::new());
        assert_eq!(bare[0].description, "");
        assert_eq!(bare[0].category, SkillCategory::WeaponForge);
    }
}
