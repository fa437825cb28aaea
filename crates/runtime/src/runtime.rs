//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::env;
use std::str::FromStr;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use pasture_content::{SimConfig, presets};
use pasture_core::SpeciesConfig;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::simulation::Simulation;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub sim: SimConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            event_buffer_size: 1024,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    pub fn new(sim: SimConfig) -> Self {
        Self {
            sim,
            ..Self::default()
        }
    }

    /// Defaults overridden by `PASTURE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `PASTURE_SEED`, `PASTURE_TICK_HZ`, `PASTURE_EVENT_BUFFER` and
    /// `PASTURE_COMMAND_BUFFER` when set and parseable.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = read_env("PASTURE_SEED") {
            self.sim.seed = seed;
        }
        if let Some(tick_hz) = read_env::<f32>("PASTURE_TICK_HZ")
            && tick_hz.is_finite()
            && tick_hz > 0.0
        {
            self.sim.tick_hz = tick_hz;
        }
        if let Some(size) = read_env("PASTURE_EVENT_BUFFER") {
            self.event_buffer_size = size;
        }
        if let Some(size) = read_env("PASTURE_COMMAND_BUFFER") {
            self.command_buffer_size = size;
        }
        self
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that drives the simulation
///
/// Design: Runtime owns the worker task.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Background worker
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Build a runtime from `config` with the built-in species
    pub async fn start(config: RuntimeConfig) -> Result<Self> {
        Self::builder().config(config).build().await
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker exits once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    species: Option<Vec<SpeciesConfig>>,
    simulation: Option<Simulation>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            species: None,
            simulation: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Species catalog (defaults to the built-in presets)
    pub fn species(mut self, species: Vec<SpeciesConfig>) -> Self {
        self.species = Some(species);
        self
    }

    /// Provide a ready simulation instead of generating one from the config
    pub fn simulation(mut self, simulation: Simulation) -> Self {
        self.simulation = Some(simulation);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let sim_config = &self.config.sim;
        if !(sim_config.tick_hz.is_finite() && sim_config.tick_hz > 0.0) {
            return Err(RuntimeError::InvalidTickRate(sim_config.tick_hz));
        }

        let simulation = match self.simulation {
            Some(simulation) => simulation,
            None => {
                let species = self.species.unwrap_or_else(presets::all);
                Simulation::from_config(sim_config, species)?
            }
        };

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(simulation, sim_config.dt(), command_rx, event_bus);

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.sim, SimConfig::default());
        assert_eq!(config.command_buffer_size, 32);
    }

    #[test]
    fn test_read_env_parses_or_skips() {
        // SAFETY: the variable names are unique to this test
        unsafe {
            env::set_var("PASTURE_TEST_READ_ENV_OK", "17");
            env::set_var("PASTURE_TEST_READ_ENV_BAD", "many");
        }
        assert_eq!(read_env::<u64>("PASTURE_TEST_READ_ENV_OK"), Some(17));
        assert_eq!(read_env::<u64>("PASTURE_TEST_READ_ENV_BAD"), None);
        assert_eq!(read_env::<u64>("PASTURE_TEST_READ_ENV_MISSING"), None);
    }
}
