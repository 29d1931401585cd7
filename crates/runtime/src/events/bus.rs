//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{MovementEvent, ScriptEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Path progress, layer switches and position updates
    Movement,
    /// Requests aimed at the script runner and the actor lifecycle
    Script,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Movement, Topic::Script];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    Movement(MovementEvent),

    /// Carries live waiter handles, so it never leaves the process.
    #[serde(skip)]
    Script(ScriptEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Movement(_) => Topic::Movement,
            Event::Script(_) => Topic::Script,
        }
    }
}

impl From<MovementEvent> for Event {
    fn from(event: MovementEvent) -> Self {
        Event::Movement(event)
    }
}

impl From<ScriptEvent> for Event {
    fn from(event: ScriptEvent) -> Self {
        Event::Script(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front and never change,
/// so the map is shared without a lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        // Every topic in `Topic::ALL` gets a channel in `with_capacity`.
        &self.channels[&topic]
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use nav_core::ActorId;

    use super::*;
    use crate::events::PathOutcome;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut movement = bus.subscribe(Topic::Movement);
        let mut script = bus.subscribe(Topic::Script);

        bus.publish(MovementEvent::PathFinished {
            actor: ActorId(4),
            outcome: PathOutcome::Completed,
        });

        let event = movement.recv().await.expect("movement event");
        assert_eq!(event.topic(), Topic::Movement);
        assert!(script.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(ScriptEvent::DeactivateRequested { actor: ActorId(1) });
    }
}
