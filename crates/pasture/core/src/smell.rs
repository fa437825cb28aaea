//! Per-cell scent intensities.

use strum::{EnumCount, IntoEnumIterator};

use crate::grid::{Cell, Grid, GridDimensions};

/// Scent category. Every cell stores one intensity per variant.
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
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmellKind {
    GroundFood,
    TreeFood,
    MeatFood,
    Water,
}

impl SmellKind {
    const fn index(self) -> usize {
        self as usize
    }
}

type Intensities = [f32; SmellKind::COUNT];

/// Non-negative scent intensities over a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SmellField {
    cells: Grid<Intensities>,
}

impl SmellField {
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            cells: Grid::filled(dimensions, [0.0; SmellKind::COUNT]),
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.cells.dimensions()
    }

    /// Intensity of `kind` at `cell`, or `None` outside the field.
    pub fn intensity(&self, cell: Cell, kind: SmellKind) -> Option<f32> {
        self.cells.get(cell).map(|values| values[kind.index()])
    }

    /// Adds scent to a cell.
    ///
    /// Negative, non-finite and out-of-bounds contributions are dropped with a
    /// warning, keeping every stored intensity non-negative.
    pub fn add(&mut self, cell: Cell, kind: SmellKind, amount: f32) {
        if !amount.is_finite() || amount < 0.0 {
            tracing::warn!(%cell, %kind, amount, "rejected invalid smell contribution");
            return;
        }
        match self.cells.get_mut(cell) {
            Some(values) => values[kind.index()] += amount,
            None => tracing::warn!(%cell, %kind, "smell contribution outside the field"),
        }
    }

    /// Zeroes one category across the whole grid.
    pub fn clear_kind(&mut self, kind: SmellKind) {
        let dimensions = self.dimensions();
        for cell in dimensions.cells() {
            if let Some(values) = self.cells.get_mut(cell) {
                values[kind.index()] = 0.0;
            }
        }
    }

    /// Sum of one category over the grid.
    pub fn total(&self, kind: SmellKind) -> f32 {
        self.cells.iter().map(|(_, values)| values[kind.index()]).sum()
    }

    /// All intensities of one cell, in declaration order of [`SmellKind`].
    pub fn sample(&self, cell: Cell) -> Option<Vec<(SmellKind, f32)>> {
        let values = self.cells.get(cell)?;
        Some(SmellKind::iter().map(|kind| (kind, values[kind.index()])).collect())
    }
}
