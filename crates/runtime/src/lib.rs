//! Runtime orchestration for the pasture simulation.
//!
//! This crate wires a generated world, the agents living on it and a
//! grid-backed physics service into a fixed-tick simulation, then puts that
//! simulation behind an async command API. Consumers embed [`Runtime`] to step
//! the world, subscribe to events, and inspect agents through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`simulation`] owns the world and runs one tick at a time
//! - [`physics`] answers ray casts and proximity queries from the grid
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod physics;
pub mod runtime;
pub mod simulation;
pub mod view;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, Topic, WorldEvent};
pub use physics::GridPhysics;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use simulation::Simulation;
pub use view::{AgentView, PackView, StepReport, WorldSnapshot};
