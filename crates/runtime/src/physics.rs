//! Grid-backed physics service.
//!
//! Walls are the high-elevation and water cells of the terrain map; bodies are
//! the snapshot taken at the start of the tick. Everything outside the map is
//! treated as high ground so agents stay on the board.

use glam::Vec2;

use pasture_core::{BodySnapshot, Cell, Physics, Tag, TerrainMap};
use steering::{RayCaster, RayHit};

/// Ray marching resolution as a fraction of the cell size.
pub const RAY_STEP_CELLS: f32 = 0.05;

pub struct GridPhysics<'a> {
    terrain: &'a TerrainMap,
    bodies: &'a [BodySnapshot],
}

impl<'a> GridPhysics<'a> {
    pub fn new(terrain: &'a TerrainMap, bodies: &'a [BodySnapshot]) -> Self {
        Self { terrain, bodies }
    }

    /// Surface a ray stops on when it enters `cell`.
    fn surface(&self, cell: Cell) -> Option<Tag> {
        match self.terrain.terrain(cell) {
            Some(kind) => kind.surface_tag(),
            None => Some(Tag::HighElevation),
        }
    }
}

impl RayCaster<Tag> for GridPhysics<'_> {
    /// Marches from `origin` in small fixed steps. The cell the ray starts in
    /// never blocks it, so an agent standing in a pond can still walk out.
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit<Tag>> {
        let direction = direction.try_normalize()?;
        if !(max_distance.is_finite() && max_distance > 0.0) {
            return None;
        }

        let cell_size = self.terrain.cell_size();
        let step = RAY_STEP_CELLS * cell_size;
        let steps = (max_distance / step).floor() as u32;

        let start = Cell::from_world(origin, cell_size);
        let mut previous = start;
        for i in 1..=steps {
            let point = origin + direction * (step * i as f32);
            let cell = Cell::from_world(point, cell_size);
            if cell == previous {
                continue;
            }
            if cell != start
                && let Some(tag) = self.surface(cell)
            {
                return Some(RayHit {
                    point,
                    normal: crossing_normal(previous, cell, direction),
                    tag,
                });
            }
            previous = cell;
        }
        None
    }
}

impl Physics for GridPhysics<'_> {
    fn nearby_bodies(&self, origin: Vec2, radius: f32, tags: &[Tag]) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .filter(|body| tags.contains(&body.tag) && body.position.distance(origin) <= radius)
            .copied()
            .collect()
    }
}

/// Normal of the cell edge crossed when moving from `from` into `to`.
fn crossing_normal(from: Cell, to: Cell, direction: Vec2) -> Vec2 {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    match (dx, dy) {
        (0, 0) => -direction,
        (dx, 0) => Vec2::new(-dx as f32, 0.0),
        (0, dy) => Vec2::new(0.0, -dy as f32),
        // Corner crossing
        _ => -direction,
    }
}
