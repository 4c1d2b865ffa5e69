use super::ids::{CombatantId, Side};
use crate::config::BattleConfig;
use crate::skill::{CombatFlags, Skill, SkillEffects};
use crate::stats::StatBlock;

/// One participant of a battle.
///
/// `stats` are the live, effective stats (skill bonuses already folded in).
/// The skill list is kept private so that `effects` always matches it.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub stats: StatBlock,
    skills: Vec<Skill>,
    effects: SkillEffects,
}

impl Combatant {
    /// Wraps already-effective stats.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        side: Side,
        stats: StatBlock,
        skills: Vec<Skill>,
    ) -> Self {
        let effects = SkillEffects::collect(&skills);
        Self {
            id,
            name: name.into(),
            side,
            stats,
            skills,
            effects,
        }
    }

    /// Applies skill bonuses to `base` and starts the combatant fresh
    /// (full HP, full hands).
    pub fn from_base(
        id: CombatantId,
        name: impl Into<String>,
        side: Side,
        base: &StatBlock,
        skills: Vec<Skill>,
    ) -> Self {
        let effects = SkillEffects::collect(&skills);
        let mut stats = effects.apply_to(base);
        stats.reset_hp();
        stats.reset_hands();
        Self {
            id,
            name: name.into(),
            side,
            stats,
            skills,
            effects,
        }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn effects(&self) -> &SkillEffects {
        &self.effects
    }

    pub fn flags(&self) -> CombatFlags {
        self.effects.flags
    }

    pub fn is_alive(&self) -> bool {
        !self.stats.is_dead()
    }

    /// Reservation slots this combatant may fill in one turn.
    pub fn reservation_limit(&self) -> u32 {
        BattleConfig::slot_limit(self.stats.max_reservation_per_turn)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("combatant {0} is already in the roster")]
    DuplicateId(CombatantId),

    #[error("roster is full ({max} combatants)")]
    Full { max: usize },
}

/// All combatants of one battle, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_combatants(
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, RosterError> {
        let mut roster = Self::new();
        for combatant in combatants {
            roster.push(combatant)?;
        }
        Ok(roster)
    }

    pub fn push(&mut self, combatant: Combatant) -> Result<(), RosterError> {
        if self.get(combatant.id).is_some() {
            return Err(RosterError::DuplicateId(combatant.id));
        }
        if self.combatants.len() >= BattleConfig::MAX_COMBATANTS {
            return Err(RosterError::Full {
                max: BattleConfig::MAX_COMBATANTS,
            });
        }
        self.combatants.push(combatant);
        Ok(())
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Living members of `side`.
    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.is_alive())
    }

    pub fn is_side_defeated(&self, side: Side) -> bool {
        self.living(side).next().is_none()
    }

    /// True when `a` and `b` both exist, differ, and share a side.
    pub fn are_allies(&self, a: CombatantId, b: CombatantId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => x.id != y.id && x.side == y.side,
            _ => false,
        }
    }
}
