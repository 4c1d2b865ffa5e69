//! In-memory SaveRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::types::RosterRecord;
use super::{RepositoryError, Result, SaveRepository};

#[derive(Default)]
pub struct InMemorySaveRepo {
    slots: RwLock<BTreeMap<String, RosterRecord>>,
}

impl InMemorySaveRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepo {
    fn save(&self, slot: &str, record: &RosterRecord) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot.to_owned(), record.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<RosterRecord>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.keys().cloned().collect())
    }
}
