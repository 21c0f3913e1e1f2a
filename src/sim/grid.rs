//! Arena occupancy grid
//!
//! The arena is an ellipse of floor cells inside a rectangle of wall,
//! sprinkled with spike traps. Generated once per run and never mutated.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Floor,
    Wall,
    /// Walkable, but hurts the player when stepped on
    Trap,
}

/// Immutable-after-generation 2D occupancy grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMap {
    width: usize,
    height: usize,
    /// Row-major cells (`y * width + x`)
    cells: Vec<Cell>,
}

impl GridMap {
    /// Build a grid from explicit cells (row-major). Mostly useful for tests.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), width * height, "cell count must be width * height");
        Self {
            width,
            height,
            cells,
        }
    }

    /// Generate an elliptical arena with half-axes `(half_x, half_y)`
    /// centered in a `width` x `height` grid.
    pub fn generate_arena<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        half_x: f32,
        half_y: f32,
        rng: &mut R,
    ) -> Self {
        let cx = (width / 2) as f32;
        let cy = (height / 2) as f32;
        let mut cells = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let ratio = (dx / half_x).powi(2) + (dy / half_y).powi(2);

                let cell = if ratio >= 1.0 {
                    Cell::Wall
                } else if ratio < TRAP_INTERIOR_RATIO && rng.random_bool(TRAP_CHANCE) {
                    Cell::Trap
                } else {
                    Cell::Floor
                };
                cells.push(cell);
            }
        }

        let grid = Self {
            width,
            height,
            cells,
        };
        log::debug!(
            "Generated {}x{} arena with {} traps",
            width,
            height,
            grid.count(Cell::Trap)
        );
        grid
    }

    /// The default 128x128 arena
    pub fn arena<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::generate_arena(MAP_WIDTH, MAP_HEIGHT, ARENA_HALF_X, ARENA_HALF_Y, rng)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Arena center in world units
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Cell at integer coordinates; anything outside the grid reads as wall
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Cell::Wall;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Cell containing the world-space point `(x, y)`
    #[inline]
    pub fn cell_at(&self, x: f32, y: f32) -> Cell {
        // floor() keeps -0.5 out of cell 0
        self.cell(x.floor() as i32, y.floor() as i32)
    }

    /// True if movement into `(x, y)` is blocked (wall or out of bounds)
    #[inline]
    pub fn is_blocked(&self, x: f32, y: f32) -> bool {
        if !(x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32) {
            return true;
        }
        self.cell_at(x, y) == Cell::Wall
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Pick up to `count` spawn points on a ring around the arena center.
    ///
    /// Candidates landing on a wall or trap are rejected and retried a
    /// bounded number of times, so fewer than `count` points may come back.
    pub fn spawn_points<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Vec2> {
        let center = self.center();
        let mut points = Vec::with_capacity(count);

        for _ in 0..count {
            for _ in 0..SPAWN_ATTEMPTS {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let dist = rng.random_range(SPAWN_RADIUS_MIN..SPAWN_RADIUS_MAX);
                let candidate = Vec2::new(
                    center.x + angle.cos() * dist,
                    center.y + angle.sin() * dist * SPAWN_MINOR_SCALE,
                );

                if self.is_blocked(candidate.x, candidate.y)
                    || self.cell_at(candidate.x, candidate.y) == Cell::Trap
                {
                    continue;
                }
                points.push(candidate);
                break;
            }
        }

        if points.len() < count {
            log::warn!(
                "Spawn placed {} of {} enemies (too many rejected candidates)",
                points.len(),
                count
            );
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena(seed: u64) -> GridMap {
        GridMap::arena(&mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_arena_shape() {
        let grid = arena(1);
        // Center is open, corners are wall
        assert_ne!(grid.cell(64, 64), Cell::Wall);
        assert_eq!(grid.cell(0, 0), Cell::Wall);
        assert_eq!(grid.cell(127, 127), Cell::Wall);
        // Just inside / outside the major axis
        assert_ne!(grid.cell(64 + 39, 64), Cell::Wall);
        assert_eq!(grid.cell(64 + 40, 64), Cell::Wall);
        // Minor axis is shorter
        assert_eq!(grid.cell(64, 64 + 25), Cell::Wall);
    }

    #[test]
    fn test_traps_only_in_interior() {
        let grid = arena(7);
        assert!(grid.count(Cell::Trap) > 0, "expected a few traps");
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                if grid.cell(x, y) == Cell::Trap {
                    let dx = (x - 64) as f32 / ARENA_HALF_X;
                    let dy = (y - 64) as f32 / ARENA_HALF_Y;
                    assert!(dx * dx + dy * dy < TRAP_INTERIOR_RATIO);
                }
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let grid = arena(3);
        assert!(grid.is_blocked(-0.1, 64.0));
        assert!(grid.is_blocked(64.0, -0.1));
        assert!(grid.is_blocked(128.0, 64.0));
        assert!(grid.is_blocked(64.0, 128.5));
        assert!(grid.is_blocked(f32::NAN, 64.0));
        assert_eq!(grid.cell(-1, 5), Cell::Wall);
        assert!(!grid.is_blocked(64.5, 64.5));
    }

    #[test]
    fn test_traps_do_not_block() {
        let mut cells = vec![Cell::Floor; 9];
        cells[4] = Cell::Trap;
        let grid = GridMap::from_cells(3, 3, cells);
        assert!(!grid.is_blocked(1.5, 1.5));
        assert_eq!(grid.cell_at(1.5, 1.5), Cell::Trap);
    }

    #[test]
    fn test_same_seed_same_arena() {
        let a = arena(42);
        let b = arena(42);
        assert_eq!(a.cells, b.cells);
    }

    #[test]
    fn test_spawn_all_trap_grid_places_nothing() {
        let grid = GridMap::from_cells(128, 128, vec![Cell::Trap; 128 * 128]);
        let points = grid.spawn_points(5, &mut Pcg32::seed_from_u64(9));
        assert!(points.is_empty());
    }

    proptest! {
        #[test]
        fn spawn_never_lands_on_wall_or_trap(seed in any::<u64>(), count in 1_usize..12) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let grid = GridMap::arena(&mut rng);
            for p in grid.spawn_points(count, &mut rng) {
                prop_assert!(!grid.is_blocked(p.x, p.y), "spawn on wall at {p:?}");
                prop_assert_ne!(grid.cell_at(p.x, p.y), Cell::Trap);
            }
        }
    }
}
