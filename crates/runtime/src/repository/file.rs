//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::RosterRecord;
use super::{RepositoryError, Result, SaveRepository};

/// Stores each save slot as `{slot}.json` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save never leaves a truncated slot behind.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Slot names become file names, so only `[A-Za-z0-9_-]` is accepted.
    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::InvalidSlot(slot.to_owned()));
        }
        Ok(self.base_dir.join(format!("{}.json", slot)))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, record: &RosterRecord) -> Result<()> {
        let path = self.slot_path(slot)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved slot '{}' to {}", slot, path.display());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<RosterRecord>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let record: RosterRecord = serde_json::from_slice(&bytes)?;

        tracing::debug!("Loaded slot '{}' from {}", slot, path.display());
        Ok(Some(record))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).map(|p| p.exists()).unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted slot '{}'", slot);
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                slots.push(stem.to_owned());
            }
        }
        slots.sort();
        Ok(slots)
    }
}
