// Ground point → tile. Hover is recomputed from scratch every frame.

use glam::Vec3;

use super::grid::{Grid, Tile};
use super::raycast::{intersect_ground_plane, Ray};

/// Tile containing a ground-plane point, or `Tile::NONE` outside the grid.
pub fn pick_tile(point: Vec3, grid: &Grid) -> Tile {
    if !point.x.is_finite() || !point.z.is_finite() {
        return Tile::NONE;
    }
    // `as` saturates, and saturated values are out of bounds for any grid.
    let x = point.x.floor() as i32;
    let z = point.z.floor() as i32;
    grid.bounds().normalize(x, z)
}

/// Tile under a cursor ray this frame. No ground hit means no hover.
pub fn hover_tile(ray: Ray, grid: &Grid) -> Tile {
    intersect_ground_plane(ray).map_or(Tile::NONE, |p| pick_tile(p, grid))
}
