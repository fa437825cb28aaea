//! Engine-agnostic decision core for smell-driven foraging agents.
//!
//! `pasture-core` owns the static board ([`TerrainMap`]), the scent layers
//! ([`SmellField`]) and the agents that read them. Each tick a host builds an
//! [`Env`] and asks every [`Agent`] to [`think`](Agent::think), then
//! integrates the returned [`Thought`]s with [`Agent::advance`]. Nothing in
//! this crate owns a clock, a thread or a physics engine.
pub mod agent;
mod behavior;
pub mod env;
pub mod error;
pub mod goal;
pub mod grid;
pub mod needs;
pub mod propagation;
pub mod smell;
pub mod species;
pub mod terrain;

pub use agent::{Agent, AgentEvent, AgentId, DecisionState, FormationSlot, Thought};
pub use env::{BodySnapshot, EmptyPhysics, Env, Physics, Tag};
pub use error::{GridError, SpeciesError};
pub use goal::{Action, GoalKind, GoalSelector};
pub use grid::{Cell, DEFAULT_CELL_SIZE, DEFAULT_GRID_SIZE, Grid, GridDimensions, scan_square};
pub use needs::{Insistance, NeedKind};
pub use propagation::{Falloff, Rediffusion, propagate};
pub use smell::{SmellField, SmellKind};
pub use species::SpeciesConfig;
pub use terrain::{FoodMarker, TerrainKind, TerrainMap, TerrainSet};
