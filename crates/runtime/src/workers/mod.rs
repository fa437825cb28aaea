//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the [`Simulation`](crate::Simulation) and
//! serialises every command against it.

mod simulation;

pub use simulation::{Command, SimulationWorker};
