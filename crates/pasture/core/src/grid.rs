//! Dense 2D grids addressed by integer cells.

use std::fmt;

use glam::{IVec2, Vec2};

use crate::error::GridError;

/// Side length of the default square board, in cells.
pub const DEFAULT_GRID_SIZE: u32 = 50;

/// World-space length of one cell edge.
pub const DEFAULT_CELL_SIZE: f32 = 1.2;

/// Integer grid coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a world position; each axis rounds to the nearest cell.
    pub fn from_world(position: Vec2, cell_size: f32) -> Self {
        let scaled = (position / cell_size).round();
        Self::new(scaled.x as i32, scaled.y as i32)
    }

    /// World position of the cell centre.
    pub fn to_world(self, cell_size: f32) -> Vec2 {
        self.as_ivec2().as_vec2() * cell_size
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Edge-adjacent neighbours in the fixed order up, right, down, left.
    ///
    /// The order matters: breadth-first propagation enqueues in this order
    /// and ties are therefore resolved identically on every run.
    pub const fn neighbors4(self) -> [Cell; 4] {
        [
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(-1, 0),
        ]
    }

    pub fn distance(self, other: Cell) -> f32 {
        self.as_ivec2().as_vec2().distance(other.as_ivec2().as_vec2())
    }

    pub const fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

impl From<IVec2> for Cell {
    fn from(value: IVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width as i32 && cell.y < self.height as i32
    }

    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Every cell, x-major then y.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..width).flat_map(move |x| (0..height).map(move |y| Cell::new(x, y)))
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::square(DEFAULT_GRID_SIZE)
    }
}

/// Row-major dense storage of one value per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    dimensions: GridDimensions,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(dimensions: GridDimensions, value: T) -> Self {
        Self {
            dimensions,
            cells: vec![value; dimensions.area()],
        }
    }
}

impl<T> Grid<T> {
    /// Wraps row-major values (`index = y * width + x`).
    pub fn from_vec(dimensions: GridDimensions, cells: Vec<T>) -> Result<Self, GridError> {
        if cells.len() != dimensions.area() {
            return Err(GridError::SizeMismatch {
                expected: dimensions.area(),
                actual: cells.len(),
            });
        }
        Ok(Self { dimensions, cells })
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.dimensions.contains(cell)
    }

    pub fn get(&self, cell: Cell) -> Option<&T> {
        self.dimensions.index(cell).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut T> {
        self.dimensions.index(cell).map(|i| &mut self.cells[i])
    }

    pub fn set(&mut self, cell: Cell, value: T) -> Result<(), GridError> {
        let dimensions = self.dimensions;
        let slot = self
            .get_mut(cell)
            .ok_or(GridError::OutOfBounds { cell, dimensions })?;
        *slot = value;
        Ok(())
    }

    /// Every cell with its value, x-major then y.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &T)> + '_ {
        self.dimensions
            .cells()
            .filter_map(move |cell| self.get(cell).map(|value| (cell, value)))
    }

    /// In-bounds edge neighbours of `cell`, up, right, down, left.
    pub fn neighbors4(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors4()
            .into_iter()
            .filter(move |neighbor| self.contains(*neighbor))
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            dimensions: self.dimensions,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

/// First cell of the Chebyshev square around `center` that satisfies
/// `predicate`.
///
/// Scans x-major then y from the lower-left corner, so ties go to scan order
/// rather than distance. Cells outside `dimensions` are skipped.
pub fn scan_square(
    dimensions: GridDimensions,
    center: Cell,
    radius: i32,
    mut predicate: impl FnMut(Cell) -> bool,
) -> Option<Cell> {
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            let cell = center.offset(dx, dy);
            if dimensions.contains(cell) && predicate(cell) {
                return Some(cell);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_round_trip_rounds_to_nearest_cell() {
        assert_eq!(Cell::from_world(Vec2::new(1.7, 0.5), 1.2), Cell::new(1, 0));
        assert_eq!(Cell::from_world(Vec2::new(1.9, 3.5), 1.2), Cell::new(2, 3));
        assert!((Cell::new(2, 3).to_world(1.2) - Vec2::new(2.4, 3.6)).length() < 1e-5);
        assert_eq!(Cell::from_world(Vec2::new(-0.7, 0.0), 1.2), Cell::new(-1, 0));
    }

    #[test]
    fn neighbor_order_is_up_right_down_left() {
        let c = Cell::new(5, 5);
        assert_eq!(
            c.neighbors4(),
            [Cell::new(5, 6), Cell::new(6, 5), Cell::new(5, 4), Cell::new(4, 5)]
        );
    }

    #[test]
    fn grid_bounds_are_enforced() {
        let mut grid = Grid::filled(GridDimensions::new(3, 2), 0u8);
        assert!(grid.set(Cell::new(2, 1), 7).is_ok());
        assert_eq!(grid.get(Cell::new(2, 1)), Some(&7));
        assert!(matches!(
            grid.set(Cell::new(3, 0), 1),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(grid.get(Cell::new(-1, 0)), None);
        assert_eq!(grid.neighbors4(Cell::ORIGIN).count(), 2);
    }

    #[test]
    fn from_vec_checks_length() {
        let dims = GridDimensions::new(2, 2);
        assert!(Grid::from_vec(dims, vec![1, 2, 3, 4]).is_ok());
        assert_eq!(
            Grid::from_vec(dims, vec![1, 2, 3]),
            Err(GridError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn scan_is_x_major_and_skips_out_of_bounds() {
        let dims = GridDimensions::square(10);
        let hits = [Cell::new(6, 4), Cell::new(4, 6)];
        // (4, 6) comes first in x-major order even though (6, 4) is equally far.
        let found = scan_square(dims, Cell::new(5, 5), 1, |c| hits.contains(&c));
        assert_eq!(found, Some(Cell::new(4, 6)));

        let mut visited = Vec::new();
        scan_square(dims, Cell::ORIGIN, 1, |c| {
            visited.push(c);
            false
        });
        assert_eq!(visited, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]);
    }
}
