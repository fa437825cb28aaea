//! Read-only views handed out to runtime clients.

use std::collections::BTreeMap;

use glam::Vec2;
use pasture_core::{Agent, AgentId, Cell, GridDimensions, NeedKind, Tag};
use serde::{Deserialize, Serialize};

/// State of one agent at the moment it was inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub species: String,
    pub tag: Tag,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees, counter-clockwise from +x.
    pub orientation: f32,
    /// Name of the action being pursued.
    pub goal: Option<String>,
    pub target: Option<Cell>,
    pub needs: BTreeMap<NeedKind, f32>,
    /// Sum of squared need values.
    pub discontentment: f32,
    /// Pack anchor this agent is following, if any.
    pub anchor: Option<AgentId>,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        let kinematic = agent.kinematic();
        Self {
            id: agent.id(),
            species: agent.species().name.clone(),
            tag: agent.species().tag,
            position: kinematic.position,
            velocity: kinematic.velocity,
            orientation: kinematic.orientation,
            goal: agent.goal().map(|action| action.name.clone()),
            target: agent.decision().target,
            needs: agent.insistance().values().clone(),
            discontentment: agent.insistance().cost(),
            anchor: agent.formation().map(|slot| slot.anchor),
        }
    }
}

/// Ids of a freshly spawned pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackView {
    pub anchor: AgentId,
    pub members: Vec<AgentId>,
}

/// Outcome of one or more simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Ticks run since the simulation started.
    pub tick: u64,
    /// Simulated seconds since the simulation started.
    pub clock: f32,
    pub population: usize,
    /// Agents removed by hunters during the reported steps.
    pub captures: usize,
}

/// Whole-world view for inspection and summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub clock: f32,
    pub dimensions: GridDimensions,
    pub cell_size: f32,
    pub agents: Vec<AgentView>,
    pub packs: Vec<PackView>,
}

impl WorldSnapshot {
    /// Number of living agents per species name.
    pub fn census(&self) -> BTreeMap<String, usize> {
        let mut census = BTreeMap::new();
        for agent in &self.agents {
            *census.entry(agent.species.clone()).or_insert(0) += 1;
        }
        census
    }
}
