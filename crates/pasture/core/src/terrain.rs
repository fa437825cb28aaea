//! Static board layout: elevation, water and food placement.

use bitflags::bitflags;

use crate::env::Tag;
use crate::error::GridError;
use crate::grid::{Cell, Grid, GridDimensions, scan_square};

/// Terrain class of one cell.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Low,
    Medium,
    High,
    Water,
}

impl TerrainKind {
    /// Surface tag reported by ray casts that hit this terrain, if it has a
    /// physical boundary at all.
    pub const fn surface_tag(self) -> Option<Tag> {
        match self {
            Self::High => Some(Tag::HighElevation),
            Self::Water => Some(Tag::Water),
            Self::Low | Self::Medium => None,
        }
    }

    pub const fn as_set(self) -> TerrainSet {
        match self {
            Self::Low => TerrainSet::LOW,
            Self::Medium => TerrainSet::MEDIUM,
            Self::High => TerrainSet::HIGH,
            Self::Water => TerrainSet::WATER,
        }
    }
}

bitflags! {
    /// Set of terrain kinds, used for impassable masks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TerrainSet: u8 {
        const LOW = 1 << 0;
        const MEDIUM = 1 << 1;
        const HIGH = 1 << 2;
        const WATER = 1 << 3;
    }
}

impl TerrainSet {
    /// Terrain that blocks ground movement.
    pub const IMPASSABLE: Self = Self::HIGH.union(Self::WATER);

    pub const fn has(self, kind: TerrainKind) -> bool {
        self.contains(kind.as_set())
    }
}

impl Default for TerrainSet {
    fn default() -> Self {
        Self::IMPASSABLE
    }
}

/// Food object placed on a cell.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FoodMarker {
    #[default]
    None,
    Tree,
    Bush,
}

/// Immutable terrain and food layers of one board.
///
/// Assembled from its grids once at world generation and only queried
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMap {
    terrain: Grid<TerrainKind>,
    food: Grid<FoodMarker>,
    cell_size: f32,
}

impl TerrainMap {
    pub fn new(
        terrain: Grid<TerrainKind>,
        food: Grid<FoodMarker>,
        cell_size: f32,
    ) -> Result<Self, GridError> {
        if terrain.dimensions() != food.dimensions() {
            return Err(GridError::LayerMismatch {
                terrain: terrain.dimensions(),
                food: food.dimensions(),
            });
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            terrain,
            food,
            cell_size,
        })
    }

    /// All-`Low`, food-free board.
    pub fn open(dimensions: GridDimensions, cell_size: f32) -> Result<Self, GridError> {
        Self::new(
            Grid::filled(dimensions, TerrainKind::Low),
            Grid::filled(dimensions, FoodMarker::None),
            cell_size,
        )
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.terrain.dimensions()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.terrain.contains(cell)
    }

    pub fn terrain(&self, cell: Cell) -> Option<TerrainKind> {
        self.terrain.get(cell).copied()
    }

    pub fn food(&self, cell: Cell) -> Option<FoodMarker> {
        self.food.get(cell).copied()
    }

    pub fn terrain_grid(&self) -> &Grid<TerrainKind> {
        &self.terrain
    }

    pub fn food_grid(&self) -> &Grid<FoodMarker> {
        &self.food
    }

    /// Cells carrying `marker`, x-major.
    pub fn food_cells(&self, marker: FoodMarker) -> Vec<Cell> {
        self.food
            .iter()
            .filter(|(_, m)| **m == marker)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Cells of terrain `kind`, x-major.
    pub fn terrain_cells(&self, kind: TerrainKind) -> Vec<Cell> {
        self.terrain
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// First cell within `radius` of `center` holding `marker`, in scan order.
    pub fn find_food(&self, center: Cell, radius: i32, marker: FoodMarker) -> Option<Cell> {
        scan_square(self.dimensions(), center, radius, |cell| {
            self.food(cell) == Some(marker)
        })
    }

    /// First cell within `radius` of `center` of terrain `kind`, in scan order.
    pub fn find_terrain(&self, center: Cell, radius: i32, kind: TerrainKind) -> Option<Cell> {
        scan_square(self.dimensions(), center, radius, |cell| {
            self.terrain(cell) == Some(kind)
        })
    }
}
