//! Error types for grid construction and species validation.
//!
//! Only setup-time failures are errors. Once a simulation is running every
//! problem is reported through `tracing` and degrades to a no-op, so nothing
//! in the per-tick path returns these types.

use steering::BlendError;

use crate::goal::GoalKind;
use crate::grid::{Cell, GridDimensions};
use crate::needs::NeedKind;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("cell {cell} lies outside a {}x{} grid", dimensions.width, dimensions.height)]
    OutOfBounds {
        cell: Cell,
        dimensions: GridDimensions,
    },

    #[error("expected {expected} cells, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("terrain grid is {terrain:?} but food grid is {food:?}")]
    LayerMismatch {
        terrain: GridDimensions,
        food: GridDimensions,
    },

    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),

    #[error("grid has no cells")]
    Empty,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SpeciesError {
    #[error("species name must not be empty")]
    EmptyName,

    #[error("species `{species}`: {field} must be positive and finite, got {value}")]
    InvalidTunable {
        species: String,
        field: &'static str,
        value: f32,
    },

    #[error("species `{species}`: {source}")]
    InvalidWeights {
        species: String,
        #[source]
        source: BlendError,
    },

    #[error("species `{species}`: growth rate for {need} must be non-negative, got {rate}")]
    NegativeGrowth {
        species: String,
        need: NeedKind,
        rate: f32,
    },

    #[error("species `{species}`: action `{action}` has invalid duration {duration}")]
    InvalidDuration {
        species: String,
        action: String,
        duration: f32,
    },

    #[error("species `{species}`: action `{action}` uses {goal:?}, which needs {requirement}")]
    UnsupportedGoal {
        species: String,
        action: String,
        goal: GoalKind,
        requirement: &'static str,
    },
}
