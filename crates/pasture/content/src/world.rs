//! Procedural board generation and static smell baking.

use std::collections::VecDeque;

use pasture_core::{
    Cell, DEFAULT_CELL_SIZE, DEFAULT_GRID_SIZE, Falloff, FoodMarker, Grid, GridDimensions,
    GridError, SmellField, SmellKind, TerrainKind, TerrainMap, TerrainSet, propagate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random placement attempts allowed per cell before food placement gives up.
const PLACEMENT_ATTEMPTS_PER_CELL: usize = 16;

/// Half-open `[min, max)` count range. A degenerate range yields `min`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// How far one terrain kind spreads from its roots.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spread {
    /// Fraction of the board this terrain may claim.
    pub coverage: f32,
    /// Chance that a frontier neighbour joins the queue.
    pub expansion_chance: f32,
}

impl Spread {
    pub const fn new(coverage: f32, expansion_chance: f32) -> Self {
        Self {
            coverage,
            expansion_chance,
        }
    }
}

/// Board generation tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorParams {
    pub grid_size: u32,
    pub cell_size: f32,
    pub hills: CountRange,
    pub ponds: CountRange,
    pub trees: CountRange,
    pub bushes: CountRange,
    pub medium: Spread,
    pub high: Spread,
    pub water: Spread,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
            hills: CountRange::new(3, 6),
            ponds: CountRange::new(2, 4),
            trees: CountRange::new(10, 20),
            bushes: CountRange::new(15, 30),
            medium: Spread::new(0.2, 0.6),
            high: Spread::new(0.08, 0.45),
            water: Spread::new(0.08, 0.55),
        }
    }
}

/// A generated board with its baked static smells.
#[derive(Clone, Debug)]
pub struct World {
    pub terrain: TerrainMap,
    pub smell: SmellField,
}

/// Seeded board generator. The same parameters and seed always produce the
/// same world.
pub struct WorldGenerator {
    params: GeneratorParams,
    rng: StdRng,
}

impl WorldGenerator {
    pub fn new(params: GeneratorParams, seed: u64) -> Self {
        Self {
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    pub fn generate(&mut self) -> Result<World, GridError> {
        let dimensions = GridDimensions::square(self.params.grid_size);
        if dimensions.area() == 0 {
            return Err(GridError::Empty);
        }
        let mut terrain = Grid::filled(dimensions, TerrainKind::Low);

        let hill_count = self.params.hills.sample(&mut self.rng);
        let hills: Vec<Cell> = (0..hill_count)
            .map(|_| self.random_cell(dimensions))
            .collect();
        self.spread(&mut terrain, &hills, self.params.medium, TerrainKind::Medium);
        self.spread(&mut terrain, &hills, self.params.high, TerrainKind::High);

        let pond_count = self.params.ponds.sample(&mut self.rng);
        let ponds = self.water_roots(&terrain, pond_count);
        self.spread(&mut terrain, &ponds, self.params.water, TerrainKind::Water);

        let mut food = Grid::filled(dimensions, FoodMarker::None);
        let trees = self.params.trees.sample(&mut self.rng);
        self.place_food(&terrain, &mut food, FoodMarker::Tree, trees);
        let bushes = self.params.bushes.sample(&mut self.rng);
        self.place_food(&terrain, &mut food, FoodMarker::Bush, bushes);

        let terrain = TerrainMap::new(terrain, food, self.params.cell_size)?;
        let smell = bake_smells(&terrain);
        tracing::info!(
            size = self.params.grid_size,
            hills = hills.len(),
            ponds = ponds.len(),
            trees,
            bushes,
            "generated world"
        );
        Ok(World { terrain, smell })
    }

    fn random_cell(&mut self, dimensions: GridDimensions) -> Cell {
        Cell::new(
            self.rng.gen_range(0..dimensions.width) as i32,
            self.rng.gen_range(0..dimensions.height) as i32,
        )
    }

    /// Roots re-rolled until they land off high ground.
    fn water_roots(&mut self, terrain: &Grid<TerrainKind>, count: u32) -> Vec<Cell> {
        let dimensions = terrain.dimensions();
        let budget = dimensions.area() * PLACEMENT_ATTEMPTS_PER_CELL;
        let mut roots = Vec::new();

        for _ in 0..count {
            let root = (0..budget)
                .map(|_| self.random_cell(dimensions))
                .find(|cell| terrain.get(*cell) != Some(&TerrainKind::High));
            match root {
                Some(root) => roots.push(root),
                None => {
                    tracing::warn!("no room for another pond");
                    break;
                }
            }
        }
        roots
    }

    /// Random breadth-first growth of `kind` from `roots`.
    ///
    /// Neighbours are offered in the order down, left, up, right, each joining
    /// the queue with the spread's expansion chance. Water never overwrites
    /// high ground.
    fn spread(
        &mut self,
        terrain: &mut Grid<TerrainKind>,
        roots: &[Cell],
        spread: Spread,
        kind: TerrainKind,
    ) {
        let quota = (terrain.dimensions().area() as f32 * spread.coverage) as usize;
        let mut placed = 0;
        let mut open: VecDeque<Cell> = roots.iter().copied().collect();

        while placed < quota {
            let Some(cell) = open.pop_front() else {
                break;
            };
            let Some(slot) = terrain.get_mut(cell) else {
                continue;
            };
            if *slot == kind || (kind == TerrainKind::Water && *slot == TerrainKind::High) {
                continue;
            }
            *slot = kind;
            placed += 1;

            for neighbor in [
                cell.offset(0, -1),
                cell.offset(-1, 0),
                cell.offset(0, 1),
                cell.offset(1, 0),
            ] {
                let differs = terrain.get(neighbor).is_some_and(|t| *t != kind);
                if differs && self.rng.gen_range(0.0..1.0) < spread.expansion_chance {
                    open.push_back(neighbor);
                }
            }
        }
        tracing::debug!(%kind, placed, quota, "spread terrain");
    }

    /// Drops `count` markers on random free Low or Medium cells.
    fn place_food(
        &mut self,
        terrain: &Grid<TerrainKind>,
        food: &mut Grid<FoodMarker>,
        marker: FoodMarker,
        count: u32,
    ) {
        let dimensions = terrain.dimensions();
        let fits = |cell: Cell, food: &Grid<FoodMarker>| {
            food.get(cell) == Some(&FoodMarker::None)
                && matches!(
                    terrain.get(cell),
                    Some(TerrainKind::Low | TerrainKind::Medium)
                )
        };

        for placed in 0..count {
            let budget = dimensions.area() * PLACEMENT_ATTEMPTS_PER_CELL;
            let spot = (0..budget)
                .map(|_| self.random_cell(dimensions))
                .find(|cell| fits(*cell, &*food));
            match spot.and_then(|cell| food.get_mut(cell)) {
                Some(slot) => *slot = marker,
                None => {
                    tracing::warn!(%marker, placed, requested = count, "ran out of room for food");
                    return;
                }
            }
        }
    }
}

/// Static scents of a fresh board.
///
/// Trees radiate in straight lines, bushes spread around high ground and
/// water, water spreads around high ground only. Every source is propagated
/// on its own and the contributions add up.
pub fn bake_smells(terrain: &TerrainMap) -> SmellField {
    let mut smell = SmellField::new(terrain.dimensions());

    propagate(
        &mut smell,
        terrain,
        &terrain.food_cells(FoodMarker::Tree),
        SmellKind::TreeFood,
        Falloff::Euclidean,
    );
    for bush in terrain.food_cells(FoodMarker::Bush) {
        propagate(
            &mut smell,
            terrain,
            &[bush],
            SmellKind::GroundFood,
            Falloff::PathLength {
                impassable: TerrainSet::IMPASSABLE,
            },
        );
    }
    for water in terrain.terrain_cells(TerrainKind::Water) {
        propagate(
            &mut smell,
            terrain,
            &[water],
            SmellKind::Water,
            Falloff::PathLength {
                impassable: TerrainSet::HIGH,
            },
        );
    }
    smell
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GeneratorParams {
        GeneratorParams {
            grid_size: 20,
            ..GeneratorParams::default()
        }
    }

    #[test]
    fn same_seed_same_world() {
        let a = WorldGenerator::new(small(), 99).generate().unwrap();
        let b = WorldGenerator::new(small(), 99).generate().unwrap();
        assert_eq!(a.terrain, b.terrain);
        assert_eq!(a.smell, b.smell);
    }

    #[test]
    fn food_sits_on_low_or_medium_ground() {
        let world = WorldGenerator::new(small(), 7).generate().unwrap();
        let terrain = &world.terrain;
        for marker in [FoodMarker::Tree, FoodMarker::Bush] {
            for cell in terrain.food_cells(marker) {
                assert!(matches!(
                    terrain.terrain(cell),
                    Some(TerrainKind::Low | TerrainKind::Medium)
                ));
            }
        }
        let params = small();
        let trees = terrain.food_cells(FoodMarker::Tree).len() as u32;
        assert!(trees >= params.trees.min && trees < params.trees.max);
    }

    #[test]
    fn coverage_quota_bounds_growth() {
        let params = GeneratorParams {
            grid_size: 20,
            hills: CountRange::new(4, 4),
            ponds: CountRange::new(0, 0),
            medium: Spread::new(0.25, 1.0),
            high: Spread::new(0.0, 0.0),
            ..GeneratorParams::default()
        };
        let world = WorldGenerator::new(params, 3).generate().unwrap();
        let medium = world.terrain.terrain_cells(TerrainKind::Medium).len();
        assert!(medium <= 100);
        assert!(medium >= 1);
        assert!(world.terrain.terrain_cells(TerrainKind::Water).is_empty());
    }

    #[test]
    fn bush_scent_stops_at_high_ground_and_water() {
        let world = WorldGenerator::new(small(), 21).generate().unwrap();
        for kind in [TerrainKind::High, TerrainKind::Water] {
            for cell in world.terrain.terrain_cells(kind) {
                assert_eq!(world.smell.intensity(cell, SmellKind::GroundFood), Some(0.0));
            }
        }
        for cell in world.terrain.terrain_cells(TerrainKind::High) {
            assert_eq!(world.smell.intensity(cell, SmellKind::Water), Some(0.0));
        }
    }

    #[test]
    fn empty_board_is_rejected() {
        let params = GeneratorParams {
            grid_size: 0,
            ..GeneratorParams::default()
        };
        assert_eq!(
            WorldGenerator::new(params, 1).generate().map(|_| ()),
            Err(GridError::Empty)
        );
    }

    #[test]
    fn degenerate_ranges_yield_min() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(CountRange::new(5, 5).sample(&mut rng), 5);
        assert_eq!(CountRange::new(5, 2).sample(&mut rng), 5);
    }
}
