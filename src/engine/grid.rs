// Tile grid: coordinates, bounds, and the static wall layout.
//
// Layout rule (deterministic from width/height alone):
//   - border ring is wall
//   - horizontal corridor wall at z = height/2, x in [3, width-3)
//   - vertical corridor wall at x = width/3, z in [3, height-3)
//
// Tile (x, z) covers world [x, x+1) × [z, z+1) on the ground plane (Y=0).

use glam::Vec3;

use super::error::GridError;

// ============================================================================
// TILE
// ============================================================================

/// Integer grid-cell coordinate on the XZ plane.
///
/// `Tile::NONE` is the "no tile" sentinel. It is out of bounds for every grid,
/// so anything that checks bounds through `GridBounds` rejects it for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i32,
    pub z: i32,
}

impl Tile {
    pub const NONE: Tile = Tile { x: -1, z: -1 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// `None` for the sentinel, `Some(self)` otherwise.
    pub fn to_option(self) -> Option<Tile> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::NONE
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Width × height of a grid. The one place the in-bounds rule lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
}

impl GridBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.width && z < self.height
    }

    #[inline]
    pub fn contains_tile(&self, tile: Tile) -> bool {
        self.contains(tile.x, tile.z)
    }

    /// Tile at (x, z) if it is inside the bounds, else `Tile::NONE`.
    pub fn normalize(&self, x: i32, z: i32) -> Tile {
        if self.contains(x, z) { Tile::new(x, z) } else { Tile::NONE }
    }
}

// ============================================================================
// GRID
// ============================================================================

pub const WALL: u8 = 1;
pub const FLOOR: u8 = 0;

/// Static tile occupancy. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    bounds: GridBounds,
    /// Row-major (z * width + x). `WALL` or `FLOOR`.
    cells: Vec<u8>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimension { width, height });
        }
        // Cell indices are computed in i32, so the whole grid must fit, not just each side
        if u64::from(width) * u64::from(height) > i32::MAX as u64 {
            return Err(GridError::TooLarge { width, height });
        }
        let (w, h) = (width as i32, height as i32);

        let mut grid = Self {
            bounds: GridBounds::new(w, h),
            cells: vec![FLOOR; width as usize * height as usize],
        };

        for z in 0..h {
            for x in 0..w {
                if x == 0 || z == 0 || x == w - 1 || z == h - 1 {
                    grid.set_wall(x, z);
                }
            }
        }
        for x in 3..w - 3 {
            grid.set_wall(x, h / 2);
        }
        for z in 3..h - 3 {
            grid.set_wall(w / 3, z);
        }

        Ok(grid)
    }

    fn set_wall(&mut self, x: i32, z: i32) {
        let idx = self.idx(x, z);
        self.cells[idx] = WALL;
    }

    #[inline]
    fn idx(&self, x: i32, z: i32) -> usize {
        (z * self.bounds.width + x) as usize
    }

    pub fn width(&self) -> i32 { self.bounds.width }
    pub fn height(&self) -> i32 { self.bounds.height }
    pub fn bounds(&self) -> GridBounds { self.bounds }

    #[inline]
    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        self.bounds.contains(x, z)
    }

    /// Wall test. Out-of-bounds coordinates are never walls (returns `false`).
    pub fn is_wall(&self, x: i32, z: i32) -> bool {
        self.in_bounds(x, z) && self.cells[self.idx(x, z)] == WALL
    }

    /// Row-major occupancy map, `WALL` / `FLOOR` per cell.
    pub fn occupancy(&self) -> &[u8] {
        &self.cells
    }

    /// Every tile with its wall flag, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (Tile, bool)> + '_ {
        let w = self.bounds.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (Tile::new(i as i32 % w, i as i32 / w), c == WALL))
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == WALL).count()
    }

    pub fn tile_count(&self) -> usize {
        self.cells.len()
    }

    /// World-space centre of the whole grid on the ground plane.
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.bounds.width as f32 * 0.5, 0.0, self.bounds.height as f32 * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_agree_with_definition_for_all_nearby_integers() {
        let grid = Grid::new(6, 4).unwrap();
        for z in -5..10 {
            for x in -5..12 {
                let expected = (0..6).contains(&x) && (0..4).contains(&z);
                assert_eq!(grid.in_bounds(x, z), expected, "({x}, {z})");
            }
        }
        assert!(!grid.in_bounds(i32::MIN, 0));
        assert!(!grid.in_bounds(0, i32::MAX));
    }

    #[test]
    fn small_grid_bounds() {
        let grid = Grid::new(3, 2).unwrap();
        assert!(grid.in_bounds(0, 0));
        assert!(!grid.in_bounds(3, 1));
    }

    #[test]
    fn sentinel_is_never_in_bounds() {
        let grid = Grid::new(1, 1).unwrap();
        assert!(!grid.bounds().contains_tile(Tile::NONE));
        assert_eq!(grid.bounds().normalize(-1, 0), Tile::NONE);
        assert_eq!(grid.bounds().normalize(0, 0), Tile::new(0, 0));
    }

    #[test]
    fn default_layout_walls_and_floor() {
        let grid = Grid::new(32, 20).unwrap();
        assert!(grid.is_wall(0, 0));
        assert!(grid.is_wall(31, 19));
        assert!(grid.is_wall(16, 10), "horizontal corridor at z = h/2");
        assert!(grid.is_wall(10, 5), "vertical corridor at x = w/3");
        assert!(!grid.is_wall(1, 1));
        assert!(!grid.is_wall(2, 10), "corridor starts at x = 3");
        assert!(!grid.is_wall(29, 10), "corridor stops before w - 3");
        assert!(!grid.is_wall(10, 2));
        assert!(!grid.is_wall(10, 17));
    }

    #[test]
    fn layout_is_reproducible() {
        let a = Grid::new(32, 20).unwrap();
        let b = Grid::new(32, 20).unwrap();
        assert_eq!(a.occupancy(), b.occupancy());
        // border: 2*32 + 2*18 = 100, horizontal: 26, vertical: 14 minus the shared cell (10,10)
        assert_eq!(a.wall_count(), 100 + 26 + 14 - 1);
    }

    #[test]
    fn out_of_range_is_not_a_wall() {
        let grid = Grid::new(4, 4).unwrap();
        assert!(!grid.is_wall(-1, 0));
        assert!(!grid.is_wall(4, 0));
        assert!(!grid.is_wall(Tile::NONE.x, Tile::NONE.z));
    }

    #[test]
    fn tiles_iterates_row_major() {
        let grid = Grid::new(3, 2).unwrap();
        let tiles: Vec<Tile> = grid.tiles().map(|(t, _)| t).collect();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], Tile::new(0, 0));
        assert_eq!(tiles[2], Tile::new(2, 0));
        assert_eq!(tiles[3], Tile::new(0, 1));
        // 3x2 is all border
        assert!(grid.tiles().all(|(_, wall)| wall));
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::EmptyDimension { width: 0, height: 5 })
        );
        assert!(matches!(Grid::new(u32::MAX, 1), Err(GridError::TooLarge { .. })));
    }

    #[test]
    fn rejects_cell_count_past_i32() {
        // each side fits in i32, the product does not
        assert_eq!(
            Grid::new(65_536, 32_769),
            Err(GridError::TooLarge { width: 65_536, height: 32_769 })
        );
        assert!(matches!(Grid::new(1, i32::MAX as u32 + 1), Err(GridError::TooLarge { .. })));
    }

    #[test]
    fn center_is_middle_of_grid() {
        let grid = Grid::new(32, 20).unwrap();
        assert_eq!(grid.center(), Vec3::new(16.0, 0.0, 10.0));
    }
}
