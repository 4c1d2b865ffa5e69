//! Persistence for rosters between battles.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepo;
pub use traits::SaveRepository;
pub use types::{CombatantRecord, RosterRecord};
