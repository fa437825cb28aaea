//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, world setup and spawning so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use pasture_core::{AgentId, GridError, SpeciesError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("unknown species {0:?}")]
    UnknownSpecies(String),

    #[error("species {0:?} has no formation slots and cannot lead a pack")]
    NotAFormationAnchor(String),

    #[error("species {name:?} is invalid")]
    InvalidSpecies {
        name: String,
        #[source]
        source: SpeciesError,
    },

    #[error("duplicate species name {0:?}")]
    DuplicateSpecies(String),

    #[error("no passable cell left to spawn {0:?}")]
    NoSpawnRoom(String),

    #[error("agent {0} does not exist")]
    UnknownAgent(AgentId),

    #[error("tick length must be positive, got {0}")]
    InvalidTickLength(f32),

    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f32),

    #[error("re-diffusion interval must be positive, got {0}")]
    InvalidRediffusionInterval(f32),

    #[error("failed to generate the world")]
    World(#[from] GridError),
}
