//! Scent diffusion from source cells.
//!
//! Two falloff policies are supported:
//!
//! - [`Falloff::PathLength`]: breadth-first over 4-connected cells, blocked by
//!   an impassable terrain mask. Intensity is `1 / d²` with `d` the number of
//!   steps from the nearest-enqueued source, floored at one.
//! - [`Falloff::Euclidean`]: straight-line inverse-square, ignoring terrain.
//!   Used for stationary sources whose scent carries over obstacles.
//!
//! [`Rediffusion`] spreads the recomputation of a mobile-source category over
//! several ticks, one source per step.

use std::collections::VecDeque;

use crate::grid::{Cell, Grid};
use crate::smell::{SmellField, SmellKind};
use crate::terrain::{TerrainMap, TerrainSet};

/// Euclidean distance under which a cell counts as the source itself.
const SOURCE_EPSILON: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Falloff {
    /// Obstruction-aware breadth-first falloff.
    PathLength { impassable: TerrainSet },
    /// Unobstructed straight-line falloff.
    Euclidean,
}

/// Adds the scent of `sources` to `field`.
///
/// With [`Falloff::PathLength`] all sources start a single traversal together
/// and every cell is visited at most once. Out-of-bounds sources are skipped
/// with a warning.
pub fn propagate(
    field: &mut SmellField,
    terrain: &TerrainMap,
    sources: &[Cell],
    kind: SmellKind,
    falloff: Falloff,
) {
    let sources: Vec<Cell> = sources
        .iter()
        .copied()
        .filter(|source| {
            let inside = terrain.contains(*source);
            if !inside {
                tracing::warn!(%source, %kind, "smell source outside the map");
            }
            inside
        })
        .collect();

    match falloff {
        Falloff::PathLength { impassable } => {
            breadth_first(field, terrain, &sources, kind, impassable)
        }
        Falloff::Euclidean => euclidean(field, terrain, &sources, kind),
    }
}

fn breadth_first(
    field: &mut SmellField,
    terrain: &TerrainMap,
    sources: &[Cell],
    kind: SmellKind,
    impassable: TerrainSet,
) {
    let mut closed = Grid::filled(terrain.dimensions(), false);
    let mut open: VecDeque<(Cell, u32)> = sources.iter().map(|cell| (*cell, 0)).collect();

    while let Some((cell, steps)) = open.pop_front() {
        match closed.get_mut(cell) {
            Some(seen) if !*seen => *seen = true,
            _ => continue,
        }

        let distance = steps.max(1) as f32;
        field.add(cell, kind, 1.0 / (distance * distance));

        for neighbor in cell.neighbors4() {
            let passable = terrain
                .terrain(neighbor)
                .is_some_and(|t| !impassable.has(t));
            if passable && closed.get(neighbor) == Some(&false) {
                open.push_back((neighbor, steps + 1));
            }
        }
    }
}

fn euclidean(field: &mut SmellField, terrain: &TerrainMap, sources: &[Cell], kind: SmellKind) {
    for cell in terrain.dimensions().cells() {
        let amount: f32 = sources
            .iter()
            .map(|source| {
                let distance = source.distance(cell);
                if distance < SOURCE_EPSILON {
                    1.0
                } else {
                    1.0 / (distance * distance)
                }
            })
            .sum();
        if amount > 0.0 {
            field.add(cell, kind, amount);
        }
    }
}

/// Resumable recomputation of one scent category.
///
/// [`start`](Self::start) zeroes the category and captures the source cells;
/// each [`step`](Self::step) diffuses exactly one of them. Only one pass can be
/// in flight: starting while sources remain is refused, and sources that
/// appear mid-pass wait for the next trigger.
#[derive(Clone, Debug)]
pub struct Rediffusion {
    kind: SmellKind,
    falloff: Falloff,
    pending: VecDeque<Cell>,
    in_flight: bool,
}

impl Rediffusion {
    pub fn new(kind: SmellKind, falloff: Falloff) -> Self {
        Self {
            kind,
            falloff,
            pending: VecDeque::new(),
            in_flight: false,
        }
    }

    pub fn kind(&self) -> SmellKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        !self.in_flight
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Begins a pass. Returns `false` if one is already running.
    pub fn start(&mut self, field: &mut SmellField, sources: impl IntoIterator<Item = Cell>) -> bool {
        if self.in_flight {
            tracing::debug!(kind = %self.kind, remaining = self.pending.len(), "re-diffusion already in flight");
            return false;
        }

        field.clear_kind(self.kind);
        self.pending = sources.into_iter().collect();
        self.in_flight = true;
        tracing::debug!(kind = %self.kind, sources = self.pending.len(), "re-diffusion started");
        true
    }

    /// Diffuses the next pending source. Returns `true` while more remain.
    pub fn step(&mut self, field: &mut SmellField, terrain: &TerrainMap) -> bool {
        if let Some(source) = self.pending.pop_front() {
            propagate(field, terrain, &[source], self.kind, self.falloff);
        }

        if self.pending.is_empty() && self.in_flight {
            self.in_flight = false;
            tracing::debug!(kind = %self.kind, "re-diffusion finished");
        }
        self.in_flight
    }
}
