//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use pasture_core::AgentEvent;

use super::types::WorldEvent;

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Topic {
    /// Goal selection, completion and resting
    Agent,
    /// Captures
    Predation,
    /// Spawns, removals, scent passes and tick heartbeats
    World,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Agent(AgentEvent),
    World(WorldEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Agent(AgentEvent::Captured { .. }) => Topic::Predation,
            Event::Agent(_) => Topic::Agent,
            Event::World(_) => Topic::World,
        }
    }
}

impl From<AgentEvent> for Event {
    fn from(event: AgentEvent) -> Self {
        Event::Agent(event)
    }
}

impl From<WorldEvent> for Event {
    fn from(event: WorldEvent) -> Self {
        Event::World(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Every topic's channel exists from construction on.
pub struct EventBus {
    channels: Arc<Channels>,
}

struct Channels {
    agent: broadcast::Sender<Event>,
    predation: broadcast::Sender<Event>,
    world: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Agent => &self.agent,
            Topic::Predation => &self.predation,
            Topic::World => &self.world,
        }
    }
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                agent: broadcast::channel(capacity).0,
                predation: broadcast::channel(capacity).0,
                world: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
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
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pasture_core::AgentId;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn captures_route_to_predation() {
        let capture = Event::from(AgentEvent::Captured {
            hunter: AgentId(1),
            prey: AgentId(2),
        });
        assert_eq!(capture.topic(), Topic::Predation);

        let resting = Event::from(AgentEvent::Resting {
            agent: AgentId(1),
            resting: true,
        });
        assert_eq!(resting.topic(), Topic::Agent);
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut world_rx = bus.subscribe(Topic::World);
        let mut agent_rx = bus.subscribe(Topic::Agent);

        bus.publish(Event::from(WorldEvent::Removed {
            agent: AgentId(3),
            by: AgentId(4),
        }));

        assert!(matches!(
            world_rx.recv().await.unwrap(),
            Event::World(WorldEvent::Removed { .. })
        ));
        assert!(agent_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        for topic in Topic::iter() {
            let rx = bus.subscribe_multiple(&[topic]);
            assert_eq!(rx.len(), 1);
        }
        bus.publish(Event::from(WorldEvent::PackDissolved {
            anchor: AgentId(0),
            members: Vec::new(),
        }));
    }
}
