//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::BattleEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Turn boundaries
    Turn,
    /// Reservation and prediction submissions
    Input,
    /// Slot outcomes and defeats
    Resolution,
    /// Battle end
    Battle,
}

struct Channels {
    turn: broadcast::Sender<BattleEvent>,
    input: broadcast::Sender<BattleEvent>,
    resolution: broadcast::Sender<BattleEvent>,
    battle: broadcast::Sender<BattleEvent>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<BattleEvent> {
        match topic {
            Topic::Turn => &self.turn,
            Topic::Input => &self.input,
            Topic::Resolution => &self.resolution,
            Topic::Battle => &self.battle,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front, so publishing
/// never blocks.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Channels {
                turn: broadcast::channel(capacity).0,
                input: broadcast::channel(capacity).0,
                resolution: broadcast::channel(capacity).0,
                battle: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: BattleEvent) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<BattleEvent>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
