//! Event system for battle notifications.
//!
//! Events are grouped into topics so that consumers (renderers, loggers,
//! replay recorders) subscribe only to what they render.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::BattleEvent;
