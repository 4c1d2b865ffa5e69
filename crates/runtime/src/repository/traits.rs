//! Repository contract for saving and loading rosters.

use super::Result;
use super::types::RosterRecord;

/// Repository for roster persistence, keyed by save slot name.
pub trait SaveRepository: Send + Sync {
    fn save(&self, slot: &str, record: &RosterRecord) -> Result<()>;

    /// Returns `None` when the slot is empty.
    fn load(&self, slot: &str) -> Result<Option<RosterRecord>>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<()>;

    /// All occupied slots, sorted.
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
