//! Combatant statistics.
//!
//! - [`StatBlock`]: attributes plus the dual-tier HP model
//! - [`HandsLedger`]: per-attack-type action economy
//! - [`StatRecord`]: persisted form with clamp-on-load

pub mod block;
pub mod hands;
pub mod record;

pub use block::StatBlock;
pub use hands::HandsLedger;
pub use record::StatRecord;
