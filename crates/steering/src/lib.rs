//! Kinematic steering behaviors for foraging agents.
//!
//! Every primitive in this crate is a small computation over an agent's
//! [`Kinematic`] state that proposes an acceleration. Primitives never mutate
//! the world; the only function that moves an agent is
//! [`MovementLimits::apply`], the shared integrator.
//!
//! - **2D only**: positions and accelerations are [`glam::Vec2`]
//! - **Degrees**: orientations and rotations are expressed in degrees
//! - **No NaN leaks**: every division is guarded, degenerate inputs yield zero
//!
//! # Architecture
//!
//! - Linear primitives: [`seek`], [`flee`], [`Arrive`], [`pursue`], [`Wanderer`]
//! - Angular primitive: [`Align`]
//! - Reactive avoidance: [`WallAvoider`], [`CollisionAvoider`]
//! - Field navigation: [`follow_gradient`]
//! - Composition: [`BlendWeights`]
//! - Integration: [`MovementLimits`]

pub mod align;
pub mod avoid;
pub mod blend;
pub mod gradient;
pub mod kinematic;
pub mod mover;
pub mod seek;
pub mod wander;

// Re-export core types for ergonomic API
pub use align::Align;
pub use avoid::{CollisionAvoider, Neighbor, RayCaster, RayHit, WallAvoider};
pub use blend::{AVOIDANCE_EPSILON, BlendError, BlendWeights};
pub use gradient::follow_gradient;
pub use kinematic::{Kinematic, heading_of, wrap_degrees};
pub use mover::MovementLimits;
pub use seek::{Arrive, flee, pursue, seek};
pub use wander::{WanderParams, Wanderer};

pub use glam::{IVec2, Vec2};
