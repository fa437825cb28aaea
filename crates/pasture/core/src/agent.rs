//! Agent records and their per-tick output.

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use steering::{Kinematic, Wanderer};

use crate::behavior;
use crate::env::Env;
use crate::goal::Action;
use crate::grid::Cell;
use crate::needs::Insistance;
use crate::species::SpeciesConfig;

/// Unique identifier of an agent within one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Goal bookkeeping. Cleared in full whenever a goal completes.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DecisionState {
    /// Index into the species' action list; `None` while deciding.
    pub goal: Option<usize>,
    /// Resource cell the agent has seen and is walking to.
    pub target: Option<Cell>,
    /// Clock time the current timed goal (sleep, wander) began.
    pub started_at: Option<f32>,
}

impl DecisionState {
    pub fn is_deciding(&self) -> bool {
        self.goal.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Membership in a moving formation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationSlot {
    pub anchor: AgentId,
    /// Offset from the anchor's position.
    pub offset: Vec2,
    /// World point the member should currently occupy.
    pub point: Vec2,
}

/// Notable things that happened to an agent during a tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentEvent {
    GoalSelected {
        agent: AgentId,
        action: String,
        cost: f32,
    },
    GoalCompleted {
        agent: AgentId,
        action: String,
    },
    /// Sleeping started (`true`) or ended (`false`).
    Resting { agent: AgentId, resting: bool },
    Captured { hunter: AgentId, prey: AgentId },
}

/// One tick of steering output for an agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Thought {
    pub linear: Vec2,
    pub angular: f32,
    /// Angular velocity is zeroed before integration (sleeping agents).
    pub stop_rotation: bool,
    /// Body the host should remove once every agent has thought.
    pub capture: Option<AgentId>,
    pub events: Vec<AgentEvent>,
}

/// A creature: species tunables plus its own kinematic, need and decision
/// state.
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    species: Arc<SpeciesConfig>,
    pub(crate) kinematic: Kinematic,
    pub(crate) insistance: Insistance,
    pub(crate) decision: DecisionState,
    pub(crate) wanderer: Wanderer,
    pub(crate) formation: Option<FormationSlot>,
}

impl Agent {
    /// Spawns an agent at rest with randomised starting needs and wander
    /// angle.
    pub fn spawn<R: Rng + ?Sized>(
        id: AgentId,
        species: Arc<SpeciesConfig>,
        position: Vec2,
        rng: &mut R,
    ) -> Self {
        let insistance = Insistance::randomized(
            species.needs.iter().copied(),
            species.growth.clone(),
            species.max_start_insistance,
            rng,
        );
        Self::with_insistance(id, species, position, insistance, rng)
    }

    /// Spawns an agent with explicit need values.
    pub fn with_insistance<R: Rng + ?Sized>(
        id: AgentId,
        species: Arc<SpeciesConfig>,
        position: Vec2,
        insistance: Insistance,
        rng: &mut R,
    ) -> Self {
        let wanderer = Wanderer::new(species.wander, rng);
        Self {
            id,
            species,
            kinematic: Kinematic::at(position),
            insistance,
            decision: DecisionState::default(),
            wanderer,
            formation: None,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn species(&self) -> &SpeciesConfig {
        &self.species
    }

    pub fn species_arc(&self) -> &Arc<SpeciesConfig> {
        &self.species
    }

    pub fn kinematic(&self) -> &Kinematic {
        &self.kinematic
    }

    pub fn kinematic_mut(&mut self) -> &mut Kinematic {
        &mut self.kinematic
    }

    pub fn position(&self) -> Vec2 {
        self.kinematic.position
    }

    pub fn cell(&self, cell_size: f32) -> Cell {
        Cell::from_world(self.kinematic.position, cell_size)
    }

    pub fn insistance(&self) -> &Insistance {
        &self.insistance
    }

    pub fn decision(&self) -> &DecisionState {
        &self.decision
    }

    /// Action currently pursued, if any.
    pub fn goal(&self) -> Option<&Action> {
        self.decision
            .goal
            .and_then(|index| self.species.actions.get(index))
    }

    /// Forces a goal, bypassing selection. Unknown indices are ignored.
    pub fn set_goal(&mut self, index: usize) {
        if index < self.species.actions.len() {
            self.decision = DecisionState {
                goal: Some(index),
                ..DecisionState::default()
            };
        }
    }

    /// Remembers a resource cell as if it had been seen.
    pub fn set_target(&mut self, target: Option<Cell>) {
        self.decision.target = target;
    }

    pub fn formation(&self) -> Option<&FormationSlot> {
        self.formation.as_ref()
    }

    pub fn join_formation(&mut self, anchor: AgentId, offset: Vec2, anchor_position: Vec2) {
        self.formation = Some(FormationSlot {
            anchor,
            offset,
            point: anchor_position + offset,
        });
    }

    pub fn leave_formation(&mut self) {
        self.formation = None;
    }

    /// Moves the formation slot to follow its anchor.
    pub fn follow_anchor(&mut self, anchor_position: Vec2) {
        if let Some(slot) = self.formation.as_mut() {
            slot.point = anchor_position + slot.offset;
        }
    }

    /// Decides and steers for one tick without moving the agent.
    pub fn think<R: Rng + ?Sized>(&mut self, env: &Env<'_>, rng: &mut R) -> Thought {
        behavior::think(self, env, rng)
    }

    /// Integrates `thought` and lets needs grow by `dt`.
    pub fn advance(&mut self, thought: &Thought, dt: f32) {
        if thought.stop_rotation {
            self.kinematic.rotation = 0.0;
        }
        self.species
            .limits
            .apply(&mut self.kinematic, thought.linear, thought.angular, dt);
        self.insistance.grow(dt);
    }
}
