// Frame context: owns the grid, camera, selection and hover tile, and runs the
// per-frame pipeline
//
//   input → camera.update → view/proj → cursor ray → ground hit → hover tile
//         → mouse gesture → selection → render instances
//
// Nothing here is cached between frames except the owned state itself.

use glam::{Mat4, UVec2, Vec2, Vec3};
use log::{debug, trace, warn};

use crate::engine::camera::{CameraSettings, OrbitCamera};
use crate::engine::error::AppError;
use crate::engine::grid::{Grid, Tile};
use crate::engine::input::{ActionSource, ButtonState};
use crate::engine::mesh::InstanceData;
use crate::engine::picking::hover_tile;
use crate::engine::raycast::screen_to_world_ray;
use crate::engine::selection::SelectionState;

// ============================================================================
// CONFIG
// ============================================================================

pub const GRID_WIDTH_VAR: &str = "TILE_GRID_WIDTH";
pub const GRID_HEIGHT_VAR: &str = "TILE_GRID_HEIGHT";

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub title: String,
    pub camera: CameraSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 20,
            window_width: 1280,
            window_height: 800,
            title: "Tile Orbit".to_string(),
            camera: CameraSettings::default(),
        }
    }
}

impl GameConfig {
    /// Defaults, with the grid size overridable from the environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for (key, slot) in [
            (GRID_WIDTH_VAR, &mut self.grid_width),
            (GRID_HEIGHT_VAR, &mut self.grid_height),
        ] {
            let Some(raw) = lookup(key) else { continue };
            match raw.trim().parse::<u32>() {
                Ok(v) if v > 0 => *slot = v,
                _ => warn!("ignoring {key}={raw:?}: expected a positive integer"),
            }
        }
        self
    }
}

// ============================================================================
// COLORS
// ============================================================================

pub const FLOOR_COLOR: [f32; 3] = [0.20, 0.22, 0.26];
pub const WALL_COLOR: [f32; 3] = [0.75, 0.75, 0.78];
pub const HOVER_FLOOR_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
pub const HOVER_WALL_COLOR: [f32; 3] = [1.0, 0.8, 0.2];
pub const SELECTED_COLOR: [f32; 3] = [1.0, 0.6, 0.1];
pub const RECT_FLOOR_COLOR: [f32; 3] = [0.25, 0.55, 0.90];
pub const RECT_WALL_COLOR: [f32; 3] = [0.45, 0.65, 0.95];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Floor,
    Wall,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    pub hover: bool,
    pub selected: bool,
    pub in_rect: bool,
}

/// Priority: hover, then single selection, then rectangle, then base color.
pub fn tile_color(kind: TileKind, highlight: Highlight) -> [f32; 3] {
    match (kind, highlight) {
        (TileKind::Floor, Highlight { hover: true, .. }) => HOVER_FLOOR_COLOR,
        (TileKind::Wall, Highlight { hover: true, .. }) => HOVER_WALL_COLOR,
        (_, Highlight { selected: true, .. }) => SELECTED_COLOR,
        (TileKind::Floor, Highlight { in_rect: true, .. }) => RECT_FLOOR_COLOR,
        (TileKind::Wall, Highlight { in_rect: true, .. }) => RECT_WALL_COLOR,
        (TileKind::Floor, _) => FLOOR_COLOR,
        (TileKind::Wall, _) => WALL_COLOR,
    }
}

/// Per-frame instance lists: one floor quad per tile, one block per wall.
#[derive(Debug, Default)]
pub struct TileInstances {
    pub floors: Vec<InstanceData>,
    pub walls: Vec<InstanceData>,
}

// ============================================================================
// FRAME
// ============================================================================

/// Mouse state for one frame, in framebuffer pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    pub cursor: Vec2,
    pub primary: ButtonState,
}

/// What the renderer needs from one `frame()`.
#[derive(Debug, Clone, Copy)]
pub struct FrameView {
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub hover: Tile,
}

pub struct TileWorld {
    grid: Grid,
    camera: OrbitCamera,
    selection: SelectionState,
    hover: Tile,
}

impl TileWorld {
    pub fn new(config: &GameConfig) -> Result<Self, AppError> {
        let grid = Grid::new(config.grid_width, config.grid_height)?;
        let camera = OrbitCamera::new(config.camera.clone(), grid.center())?;
        let selection = SelectionState::new(grid.bounds());
        debug!(
            "grid {}x{}: {} walls, camera at {}",
            grid.width(),
            grid.height(),
            grid.wall_count(),
            camera.eye_position()
        );
        Ok(Self { grid, camera, selection, hover: Tile::NONE })
    }

    /// Run one tick. `dt` should be 0 on the first frame.
    pub fn frame(
        &mut self,
        actions: &impl ActionSource,
        pointer: Pointer,
        viewport: UVec2,
        dt: f32,
    ) -> FrameView {
        self.camera.update(actions, dt);

        let aspect = if viewport.x > 0 && viewport.y > 0 {
            viewport.x as f32 / viewport.y as f32
        } else {
            1.0
        };
        let view = self.camera.view_matrix();
        let proj = self.camera.projection_matrix(aspect);

        let ray = screen_to_world_ray(pointer.cursor, viewport, view, proj);
        let hover = hover_tile(ray, &self.grid);
        if hover != self.hover {
            trace!("hover {:?} -> {:?}", self.hover, hover);
        }
        self.hover = hover;

        self.apply_pointer(pointer.primary);

        FrameView {
            view_proj: proj * view,
            eye: self.camera.eye_position(),
            hover,
        }
    }

    fn apply_pointer(&mut self, primary: ButtonState) {
        let hover = self.hover;
        if primary.pressed {
            self.selection.select_single(hover);
            self.selection.begin_rect(hover);
        }
        if primary.held {
            self.selection.update_rect(hover);
        }
        if primary.released && self.selection.is_dragging() {
            self.selection.end_rect(hover);
            match self.selection.rect() {
                Some(r) => debug!("selected {}x{} tiles from {:?} to {:?}", r.width(), r.height(), r.min, r.max),
                None => debug!("selection cleared"),
            }
        }
    }

    /// Re-centre the camera on the selection rectangle, or on the single
    /// pick when there is no rectangle. Does nothing with nothing selected.
    pub fn focus_selection(&mut self) {
        let target = match (self.selection.rect(), self.selection.selected().to_option()) {
            (Some(r), _) => Vec3::new(
                (r.min.x + r.max.x + 1) as f32 * 0.5,
                0.0,
                (r.min.z + r.max.z + 1) as f32 * 0.5,
            ),
            (None, Some(t)) => Vec3::new(t.x as f32 + 0.5, 0.0, t.z as f32 + 0.5),
            (None, None) => return,
        };
        debug!("focus camera on {target}");
        self.camera.focus(target);
    }

    /// Build the instance lists for the current hover and selection.
    pub fn tile_instances(&self) -> TileInstances {
        let mut out = TileInstances {
            floors: Vec::with_capacity(self.grid.tile_count()),
            walls: Vec::with_capacity(self.grid.wall_count()),
        };
        let selected = self.selection.selected();

        for (tile, is_wall) in self.grid.tiles() {
            let highlight = Highlight {
                hover: tile == self.hover,
                selected: tile == selected,
                in_rect: self.selection.is_in_rect(tile.x, tile.z),
            };
            let offset = Vec3::new(tile.x as f32, 0.0, tile.z as f32);
            out.floors.push(InstanceData::new(offset, tile_color(TileKind::Floor, highlight)));
            if is_wall {
                out.walls.push(InstanceData::new(offset, tile_color(TileKind::Wall, highlight)));
            }
        }
        out
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn camera(&self) -> &OrbitCamera { &self.camera }
    pub fn selection(&self) -> &SelectionState { &self.selection }
    pub fn hover(&self) -> Tile { self.hover }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Action;
    use crate::engine::raycast::world_to_screen;

    struct Idle;

    impl ActionSource for Idle {
        fn is_pressed(&self, _: Action) -> bool { false }
        fn scroll_delta(&self) -> f32 { 0.0 }
    }

    const VIEWPORT: UVec2 = UVec2::new(1280, 800);

    // Odd sizes put the grid centre in the middle of tile (16, 10) rather
    // than on a tile corner.
    fn world() -> TileWorld {
        let cfg = GameConfig { grid_width: 33, grid_height: 21, ..GameConfig::default() };
        TileWorld::new(&cfg).unwrap()
    }

    fn at_center(primary: ButtonState) -> Pointer {
        Pointer { cursor: VIEWPORT.as_vec2() * 0.5, primary }
    }

    fn press() -> ButtonState { ButtonState { held: true, pressed: true, released: false } }
    fn hold() -> ButtonState { ButtonState { held: true, pressed: false, released: false } }
    fn release() -> ButtonState { ButtonState { held: false, pressed: false, released: true } }

    #[test]
    fn cursor_at_screen_center_hovers_grid_center() {
        let mut w = world();
        let view = w.frame(&Idle, at_center(ButtonState::default()), VIEWPORT, 0.0);
        assert_eq!(view.hover, Tile::new(16, 10));
        assert_eq!(w.hover(), Tile::new(16, 10));
        assert!(view.eye.abs_diff_eq(w.camera().eye_position(), 1e-6));
    }

    #[test]
    fn hover_is_cleared_when_cursor_leaves_the_grid() {
        let mut w = world();
        w.frame(&Idle, at_center(ButtonState::default()), VIEWPORT, 0.0);
        // far above the horizon: the ray points at the sky
        let sky = Pointer { cursor: Vec2::new(640.0, -5000.0), primary: ButtonState::default() };
        let view = w.frame(&Idle, sky, VIEWPORT, 0.016);
        assert_eq!(view.hover, Tile::NONE);
    }

    #[test]
    fn click_selects_and_commits_a_single_tile_rect() {
        let mut w = world();
        w.frame(&Idle, at_center(press()), VIEWPORT, 0.0);
        assert!(w.selection().is_dragging());
        w.frame(&Idle, at_center(hold()), VIEWPORT, 0.016);
        w.frame(&Idle, at_center(release()), VIEWPORT, 0.016);

        let s = w.selection();
        assert!(!s.is_dragging());
        assert_eq!(s.selected(), Tile::new(16, 10));
        let rect = s.rect().unwrap();
        assert_eq!((rect.min, rect.max), (Tile::new(16, 10), Tile::new(16, 10)));
    }

    fn over_tile(view: &FrameView, x: i32, z: i32, primary: ButtonState) -> Pointer {
        let centre = Vec3::new(x as f32 + 0.5, 0.0, z as f32 + 0.5);
        let cursor = world_to_screen(centre, view.view_proj, VIEWPORT).unwrap();
        Pointer { cursor, primary }
    }

    #[test]
    fn dragging_across_tiles_spans_the_rectangle() {
        let mut w = world();
        let view = w.frame(&Idle, at_center(press()), VIEWPORT, 0.0);
        assert_eq!(view.hover, Tile::new(16, 10));

        let view = w.frame(&Idle, over_tile(&view, 18, 11, hold()), VIEWPORT, 0.016);
        assert_eq!(view.hover, Tile::new(18, 11));
        assert!(w.selection().is_dragging());
        assert!(w.selection().is_in_rect(17, 11));

        let view = w.frame(&Idle, over_tile(&view, 20, 13, hold()), VIEWPORT, 0.016);
        w.frame(&Idle, over_tile(&view, 20, 13, release()), VIEWPORT, 0.016);

        let s = w.selection();
        assert!(!s.is_dragging());
        let rect = s.rect().unwrap();
        assert_eq!((rect.min, rect.max), (Tile::new(16, 10), Tile::new(20, 13)));
        assert_eq!(rect.area(), 5 * 4);
        assert_eq!(s.selected(), Tile::new(16, 10));
    }

    #[test]
    fn dragging_backwards_sorts_the_corners() {
        let mut w = world();
        let view = w.frame(&Idle, at_center(ButtonState::default()), VIEWPORT, 0.0);
        let view = w.frame(&Idle, over_tile(&view, 20, 13, press()), VIEWPORT, 0.0);
        let view = w.frame(&Idle, over_tile(&view, 14, 8, hold()), VIEWPORT, 0.016);
        w.frame(&Idle, over_tile(&view, 14, 8, release()), VIEWPORT, 0.016);

        let rect = w.selection().rect().unwrap();
        assert_eq!((rect.min, rect.max), (Tile::new(14, 8), Tile::new(20, 13)));
    }

    #[test]
    fn focus_selection_recentres_camera() {
        let mut w = world();
        w.focus_selection();
        assert_eq!(w.camera().center(), w.grid().center());

        let view = w.frame(&Idle, at_center(ButtonState::default()), VIEWPORT, 0.0);
        let view = w.frame(&Idle, over_tile(&view, 2, 2, press()), VIEWPORT, 0.0);
        w.frame(&Idle, over_tile(&view, 5, 3, release()), VIEWPORT, 0.0);
        w.focus_selection();
        assert!(w.camera().center().abs_diff_eq(Vec3::new(4.0, 0.0, 3.0), 1e-6));
    }

    #[test]
    fn press_and_release_in_one_frame_still_commits() {
        let mut w = world();
        let click = ButtonState { held: false, pressed: true, released: true };
        w.frame(&Idle, at_center(click), VIEWPORT, 0.0);
        assert!(!w.selection().is_dragging());
        assert!(w.selection().is_in_rect(16, 10));
    }

    #[test]
    fn clicking_the_sky_clears_selection() {
        let mut w = world();
        w.frame(&Idle, at_center(press()), VIEWPORT, 0.0);
        w.frame(&Idle, at_center(release()), VIEWPORT, 0.0);
        assert!(w.selection().rect().is_some());

        let sky = Pointer { cursor: Vec2::new(640.0, -5000.0), primary: press() };
        w.frame(&Idle, sky, VIEWPORT, 0.0);
        assert_eq!(w.selection().selected(), Tile::NONE);
        assert_eq!(w.selection().rect(), None);
    }

    #[test]
    fn instances_cover_every_tile_and_wall() {
        let w = world();
        let inst = w.tile_instances();
        assert_eq!(inst.floors.len(), 33 * 21);
        assert_eq!(inst.walls.len(), w.grid().wall_count());
        assert_eq!(inst.floors[0].color[..3], FLOOR_COLOR);
        assert_eq!(inst.walls[0].color[..3], WALL_COLOR);
    }

    #[test]
    fn hovered_wall_is_highlighted() {
        let mut w = world();
        w.frame(&Idle, at_center(ButtonState::default()), VIEWPORT, 0.0);
        let inst = w.tile_instances();
        let idx = (10 * 33 + 16) as usize;
        assert_eq!(inst.floors[idx].color[..3], HOVER_FLOOR_COLOR);
        assert!(inst.walls.iter().any(|i| i.color[..3] == HOVER_WALL_COLOR));
    }

    #[test]
    fn color_priority() {
        let all = Highlight { hover: true, selected: true, in_rect: true };
        assert_eq!(tile_color(TileKind::Floor, all), HOVER_FLOOR_COLOR);
        let sel = Highlight { selected: true, in_rect: true, ..Highlight::default() };
        assert_eq!(tile_color(TileKind::Wall, sel), SELECTED_COLOR);
        let rect = Highlight { in_rect: true, ..Highlight::default() };
        assert_eq!(tile_color(TileKind::Floor, rect), RECT_FLOOR_COLOR);
        assert_eq!(tile_color(TileKind::Wall, Highlight::default()), WALL_COLOR);
    }

    #[test]
    fn env_overrides_grid_size() {
        let cfg = GameConfig::default().with_overrides(|key| match key {
            GRID_WIDTH_VAR => Some("12".to_string()),
            GRID_HEIGHT_VAR => Some("oops".to_string()),
            _ => None,
        });
        assert_eq!(cfg.grid_width, 12);
        assert_eq!(cfg.grid_height, 20);

        let zero = GameConfig::default().with_overrides(|_| Some("0".to_string()));
        assert_eq!((zero.grid_width, zero.grid_height), (32, 20));
    }

    #[test]
    fn invalid_config_fails_construction() {
        let cfg = GameConfig { grid_width: 0, ..GameConfig::default() };
        assert!(matches!(TileWorld::new(&cfg), Err(AppError::Grid(_))));

        let mut cfg = GameConfig::default();
        cfg.camera.fov_y = 0.0;
        assert!(matches!(TileWorld::new(&cfg), Err(AppError::Camera(_))));
    }
}
