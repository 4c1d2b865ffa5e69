//! Serializable save records.

use battle_core::{Combatant, CombatantId, Roster, RosterError, Side, Skill, StatRecord};
use serde::{Deserialize, Serialize};

/// Durable state of one combatant. Stats are the live, effective values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantRecord {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub stats: StatRecord,
    pub skills: Vec<Skill>,
}

impl From<&Combatant> for CombatantRecord {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            name: combatant.name.clone(),
            side: combatant.side,
            stats: StatRecord::from(&combatant.stats),
            skills: combatant.skills().to_vec(),
        }
    }
}

impl CombatantRecord {
    /// Rebuilds the combatant; out-of-range stats are clamped.
    pub fn to_combatant(&self) -> Combatant {
        Combatant::new(
            self.id,
            self.name.clone(),
            self.side,
            self.stats.to_stat_block(),
            self.skills.clone(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    /// Turns played when the record was taken.
    pub turn_number: u32,
    pub combatants: Vec<CombatantRecord>,
}

impl RosterRecord {
    pub fn capture(roster: &Roster, turn_number: u32) -> Self {
        Self {
            turn_number,
            combatants: roster.iter().map(CombatantRecord::from).collect(),
        }
    }

    pub fn to_roster(&self) -> Result<Roster, RosterError> {
        Roster::from_combatants(self.combatants.iter().map(CombatantRecord::to_combatant))
    }
}
