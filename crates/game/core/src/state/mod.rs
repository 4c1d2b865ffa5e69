//! Battle participants and the closed enumerations shared by every phase.

pub mod combatant;
pub mod ids;
pub mod kinds;

pub use combatant::{Combatant, Roster, RosterError};
pub use ids::{CombatantId, Side};
pub use kinds::{AttackType, ResponseType};
