//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the simulation or streaming events from specific topics.
use std::collections::HashMap;

use glam::Vec2;
use tokio::sync::{broadcast, mpsc, oneshot};

use pasture_core::AgentId;

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::view::{AgentView, PackView, StepReport, WorldSnapshot};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: Command, reply_rx: oneshot::Receiver<T>) -> Result<T> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Run `ticks` fixed-length steps and report where the world ended up
    pub async fn step(&self, ticks: u32) -> Result<StepReport> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(
            Command::Step {
                ticks,
                reply: reply_tx,
            },
            reply_rx,
        )
        .await?
    }

    /// Spawn one agent at `position`, or on a random walkable cell
    pub async fn spawn(&self, species: impl Into<String>, position: Option<Vec2>) -> Result<AgentId> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(
            Command::Spawn {
                species: species.into(),
                position,
                reply: reply_tx,
            },
            reply_rx,
        )
        .await?
    }

    /// Spawn a pack anchor of `species` followed by `member` agents
    pub async fn spawn_pack(
        &self,
        species: impl Into<String>,
        member: impl Into<String>,
        position: Option<Vec2>,
    ) -> Result<PackView> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(
            Command::SpawnPack {
                species: species.into(),
                member: member.into(),
                position,
                reply: reply_tx,
            },
            reply_rx,
        )
        .await?
    }

    /// Look at one agent; `None` once it has been captured
    pub async fn inspect(&self, agent: AgentId) -> Result<Option<AgentView>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(
            Command::Inspect {
                agent,
                reply: reply_tx,
            },
            reply_rx,
        )
        .await
    }

    /// Query the whole world (read-only snapshot)
    pub async fn snapshot(&self) -> Result<WorldSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(Command::Snapshot { reply: reply_tx }, reply_rx)
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Agent` - Goal selection, completion and resting
    /// - `Topic::Predation` - Captures
    /// - `Topic::World` - Spawns, removals, scent passes, tick heartbeats
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut captures = handle.subscribe(Topic::Predation);
    /// while let Ok(event) = captures.recv().await {
    ///     // Handle captures
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
