//! Event types for different topics.

use glam::Vec2;
use pasture_core::{AgentId, SmellKind};
use serde::{Deserialize, Serialize};

/// Events about the population and the world as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// An agent entered the world.
    Spawned {
        agent: AgentId,
        species: String,
        position: Vec2,
    },

    /// An agent was taken out of the world by a hunter.
    Removed { agent: AgentId, by: AgentId },

    /// A pack lost its anchor; its members now act alone.
    PackDissolved {
        anchor: AgentId,
        members: Vec<AgentId>,
    },

    /// A mobile scent started recomputing from fresh sources.
    RediffusionStarted { kind: SmellKind, sources: usize },

    /// One simulation step finished (lightweight heartbeat).
    TickCompleted {
        tick: u64,
        /// Simulated seconds after this tick.
        clock: f32,
        population: usize,
    },
}
