// Tile selection: one click-picked tile plus one drag rectangle.
//
// Drag lifecycle:
//   begin_rect(t)  anchor = start = end = t      (drag in progress)
//   update_rect(t) end = t                       (only while dragging, only valid t)
//   end_rect(t)    end = t if valid, anchor = NONE, corners kept as the result
//
// Invalid tiles never enter the state: anything out of bounds is treated as
// `Tile::NONE` and absorbed by the transition.

use super::grid::{GridBounds, Tile};

/// Inclusive tile rectangle with sorted corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub min: Tile,
    pub max: Tile,
}

impl TileRect {
    /// Rectangle spanning two corners given in any order.
    pub fn from_corners(a: Tile, b: Tile) -> Self {
        Self {
            min: Tile::new(a.x.min(b.x), a.z.min(b.z)),
            max: Tile::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    pub fn width(&self) -> i32 { self.max.x - self.min.x + 1 }
    pub fn height(&self) -> i32 { self.max.z - self.min.z + 1 }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    bounds: GridBounds,
    /// Single click selection.
    selected: Tile,
    /// Drag anchor. Valid exactly while a drag is in progress.
    anchor: Tile,
    rect_start: Tile,
    rect_end: Tile,
}

impl SelectionState {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            selected: Tile::NONE,
            anchor: Tile::NONE,
            rect_start: Tile::NONE,
            rect_end: Tile::NONE,
        }
    }

    fn is_valid(&self, tile: Tile) -> bool {
        self.bounds.contains_tile(tile)
    }

    /// Click-select one tile. An invalid tile clears the pick and any
    /// rectangle, including one still being dragged.
    pub fn select_single(&mut self, tile: Tile) {
        if self.is_valid(tile) {
            self.selected = tile;
        } else {
            self.clear();
        }
    }

    /// `select_single` from raw coordinates.
    pub fn select_tile(&mut self, x: i32, z: i32) {
        self.select_single(self.bounds.normalize(x, z));
    }

    pub fn begin_rect(&mut self, tile: Tile) {
        let tile = if self.is_valid(tile) { tile } else { Tile::NONE };
        self.anchor = tile;
        self.rect_start = tile;
        self.rect_end = tile;
    }

    /// Move the drag corner. Dragging off the grid freezes the last valid extent.
    pub fn update_rect(&mut self, tile: Tile) {
        if self.is_dragging() && self.is_valid(tile) {
            self.rect_end = tile;
        }
    }

    /// Commit the drag. The rectangle stays; the drag flag clears.
    pub fn end_rect(&mut self, tile: Tile) {
        if !self.is_dragging() {
            return;
        }
        if self.is_valid(tile) {
            self.rect_end = tile;
        }
        self.anchor = Tile::NONE;
    }

    /// Inclusive containment in the current rectangle. Corners are sorted
    /// here, so the drag corner may sit on either side of the start.
    pub fn is_in_rect(&self, x: i32, z: i32) -> bool {
        self.rect().is_some_and(|r| r.contains(x, z))
    }

    pub fn rect(&self) -> Option<TileRect> {
        if self.rect_start.is_none() || self.rect_end.is_none() {
            return None;
        }
        Some(TileRect::from_corners(self.rect_start, self.rect_end))
    }

    /// Raw (start, end) as supplied; not sorted.
    pub fn rect_corners(&self) -> (Tile, Tile) {
        (self.rect_start, self.rect_end)
    }

    pub fn selected(&self) -> Tile { self.selected }
    pub fn anchor(&self) -> Tile { self.anchor }

    pub fn is_dragging(&self) -> bool {
        !self.anchor.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.bounds);
    }
}
