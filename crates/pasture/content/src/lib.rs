//! Data-driven content for the pasture simulation.
//!
//! This crate houses the built-in species, the procedural board generator and
//! loaders for RON/TOML data files:
//! - Species tunables and action lists (data-driven via RON)
//! - Simulation configuration and initial population (data-driven via TOML)
//! - Seeded world generation with baked static smells
//!
//! All loaders use pasture-core types directly with serde for RON/TOML
//! deserialization.

pub mod config;
pub mod presets;
pub mod world;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use config::{PopulationEntry, SimConfig};
pub use world::{CountRange, GeneratorParams, Spread, World, WorldGenerator, bake_smells};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, SpeciesLoader};
