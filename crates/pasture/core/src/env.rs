//! World context handed to agents each tick.
//!
//! Agents never reach for global state. Everything a decision needs (the
//! static board, the scent field, a physics service and the clock) arrives
//! bundled in an [`Env`], so hosts can swap any piece for a test double.

use glam::Vec2;
use steering::{RayCaster, RayHit};

use crate::agent::AgentId;
use crate::smell::SmellField;
use crate::terrain::TerrainMap;

/// Tag carried by bodies and surfaces.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    Sheep,
    Wolf,
    WolfPack,
    HighElevation,
    Water,
}

/// Read-only view of one moving body, taken at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    pub id: AgentId,
    pub tag: Tag,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl BodySnapshot {
    pub fn as_neighbor(&self) -> steering::Neighbor {
        steering::Neighbor {
            position: self.position,
            velocity: self.velocity,
        }
    }
}

/// Physics queries an agent may issue.
///
/// Ray casts come from the [`RayCaster`] supertrait. Body removal is not part
/// of this trait: a capture is returned from
/// [`Agent::think`](crate::Agent::think) and executed by the host once every
/// agent has read the same snapshot.
pub trait Physics: RayCaster<Tag> {
    /// Bodies within `radius` of `origin` whose tag is in `tags`, in the
    /// service's own order.
    fn nearby_bodies(&self, origin: Vec2, radius: f32, tags: &[Tag]) -> Vec<BodySnapshot>;
}

/// Everything an agent reads during one tick.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub terrain: &'a TerrainMap,
    pub smell: &'a SmellField,
    pub physics: &'a dyn Physics,
    /// Seconds since the simulation started.
    pub clock: f32,
    /// Length of this tick in seconds.
    pub dt: f32,
}

impl<'a> Env<'a> {
    pub fn new(
        terrain: &'a TerrainMap,
        smell: &'a SmellField,
        physics: &'a dyn Physics,
        clock: f32,
        dt: f32,
    ) -> Self {
        Self {
            terrain,
            smell,
            physics,
            clock,
            dt,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.terrain.cell_size()
    }
}

/// A world with no walls and no other bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyPhysics;

impl RayCaster<Tag> for EmptyPhysics {
    fn cast_ray(&self, _origin: Vec2, _direction: Vec2, _max_distance: f32) -> Option<RayHit<Tag>> {
        None
    }
}

impl Physics for EmptyPhysics {
    fn nearby_bodies(&self, _origin: Vec2, _radius: f32, _tags: &[Tag]) -> Vec<BodySnapshot> {
        Vec::new()
    }
}
