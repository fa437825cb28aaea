//! Simulation worker that owns the authoritative [`Simulation`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! against the simulation, and publishes the resulting events to the EventBus.

use glam::Vec2;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use pasture_core::AgentId;

use crate::api::Result;
use crate::events::EventBus;
use crate::simulation::Simulation;
use crate::view::{AgentView, PackView, StepReport, WorldSnapshot};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Run `ticks` fixed-length steps.
    Step {
        ticks: u32,
        reply: oneshot::Sender<Result<StepReport>>,
    },
    /// Spawn one agent. Without a position a random walkable cell is used.
    Spawn {
        species: String,
        position: Option<Vec2>,
        reply: oneshot::Sender<Result<AgentId>>,
    },
    /// Spawn a pack anchor with one member per formation slot.
    SpawnPack {
        species: String,
        member: String,
        position: Option<Vec2>,
        reply: oneshot::Sender<Result<PackView>>,
    },
    /// Look at one agent (read-only).
    Inspect {
        agent: AgentId,
        reply: oneshot::Sender<Option<AgentView>>,
    },
    /// Look at the whole world (read-only).
    Snapshot { reply: oneshot::Sender<WorldSnapshot> },
}

/// Background task that processes simulation commands.
pub struct SimulationWorker {
    simulation: Simulation,
    dt: f32,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker stepping `dt` seconds per tick.
    pub fn new(
        simulation: Simulation,
        dt: f32,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        tracing::info!(
            "SimulationWorker initialized with {} agents, dt {}s",
            simulation.agents().len(),
            dt
        );

        Self {
            simulation,
            dt,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        // Spawn events from the initial population
        self.publish_pending();

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!("SimulationWorker stopped at tick {}", self.simulation.tick());
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Step { ticks, reply } => {
                let result = self.handle_step(ticks);
                if reply.send(result).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::Spawn {
                species,
                position,
                reply,
            } => {
                let result = match position {
                    Some(position) => self.simulation.spawn(&species, position),
                    None => self.simulation.spawn_anywhere(&species),
                };
                self.publish_pending();
                if reply.send(result).is_err() {
                    debug!("Spawn reply channel closed (caller dropped)");
                }
            }
            Command::SpawnPack {
                species,
                member,
                position,
                reply,
            } => {
                let result = match position {
                    Some(position) => self.simulation.spawn_pack(&species, &member, position),
                    None => self.simulation.spawn_pack_anywhere(&species, &member),
                };
                self.publish_pending();
                if reply.send(result).is_err() {
                    debug!("SpawnPack reply channel closed (caller dropped)");
                }
            }
            Command::Inspect { agent, reply } => {
                if reply.send(self.simulation.inspect(agent)).is_err() {
                    debug!("Inspect reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.simulation.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Runs `ticks` steps, publishing each tick's events before the next.
    ///
    /// Zero ticks reports the current state without stepping.
    fn handle_step(&mut self, ticks: u32) -> Result<StepReport> {
        let mut report = StepReport {
            tick: self.simulation.tick(),
            clock: self.simulation.clock(),
            population: self.simulation.agents().len(),
            captures: 0,
        };

        for _ in 0..ticks {
            let step = self.simulation.step(self.dt)?;
            self.publish_pending();
            report = StepReport {
                captures: report.captures + step.captures,
                ..step
            };
        }

        Ok(report)
    }

    fn publish_pending(&mut self) {
        for event in self.simulation.drain_events() {
            self.event_bus.publish(event);
        }
    }
}
