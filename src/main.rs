// Tile grid viewer with an orbiting RTS camera and mouse tile picking.
//
// Controls:
//   WASD / arrows  pan        Shift  faster pan
//   Q / E          rotate     wheel  zoom
//   left click     select     left drag  rectangle select
//   F              centre on selection
//   F3             debug overlay        Esc  quit

use std::sync::Arc;
use std::time::Instant;

use glam::{UVec2, Vec3};
use log::{debug, error, info, warn};
use winit::{
    event::{Event as WinitEvent, WindowEvent, ElementState, KeyEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use tile_orbit::engine::debug_overlay::{DebugStats, SelectionOutline};
use tile_orbit::engine::error::AppError;
use tile_orbit::engine::input::InputState;
use tile_orbit::engine::raycast::world_to_screen;
use tile_orbit::game::{FrameView, GameConfig, Pointer, TileWorld};
use tile_orbit::renderer::Renderer;

/// Lifts the outline off the floor so it does not sit exactly on Y=0.
const OUTLINE_LIFT: f32 = 0.01;

// ============================================================================
// FRAME TIMING
// ============================================================================

/// Rolling one-second frame statistics for the overlay.
struct FrameTimer {
    window_start: Instant,
    frames: u32,
    sum_ms: f32,
    min_ms: f32,
    max_ms: f32,
    fps: u32,
    avg_ms: f32,
    last_min_ms: f32,
    last_max_ms: f32,
}

impl FrameTimer {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            sum_ms: 0.0,
            min_ms: f32::MAX,
            max_ms: 0.0,
            fps: 0,
            avg_ms: 0.0,
            last_min_ms: 0.0,
            last_max_ms: 0.0,
        }
    }

    fn tick(&mut self, dt: f32) {
        let ms = dt * 1000.0;
        self.frames += 1;
        self.sum_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);

        if self.window_start.elapsed().as_secs_f32() >= 1.0 {
            self.fps = self.frames;
            self.avg_ms = self.sum_ms / self.frames as f32;
            self.last_min_ms = self.min_ms;
            self.last_max_ms = self.max_ms;
            debug!("FPS: {} | frame {:.2} ms", self.fps, self.avg_ms);

            self.window_start = Instant::now();
            self.frames = 0;
            self.sum_ms = 0.0;
            self.min_ms = f32::MAX;
            self.max_ms = 0.0;
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct App {
    renderer: Renderer,
    world: TileWorld,
    input: InputState,
    /// `None` until the first frame, which then runs with dt = 0.
    last_update: Option<Instant>,
    timer: FrameTimer,
    draw_calls: u32,
}

impl App {
    fn redraw(&mut self, control_flow: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = self.last_update.map_or(0.0, |t| (now - t).as_secs_f32());
        self.last_update = Some(now);

        let size = self.renderer.size;
        let viewport = UVec2::new(size.width, size.height);
        let pointer = Pointer {
            cursor: self.input.mouse_position,
            primary: self.input.primary_button(),
        };

        let frame = self.world.frame(&self.input, pointer, viewport, dt);
        let instances = self.world.tile_instances();
        let outline = self.selection_outline(&frame, viewport);
        let stats = self.renderer.overlay.visible.then(|| self.debug_stats(viewport));

        match self.renderer.render(frame.view_proj, &instances, stats.as_ref(), outline.as_ref()) {
            Ok(draw_calls) => self.draw_calls = draw_calls,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.renderer.resize(self.renderer.size)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                control_flow.exit();
            }
            Err(e) => warn!("dropped frame: {e:?}"),
        }

        self.input.end_frame();
        self.timer.tick(dt);
    }

    /// Screen-space outline of the current rectangle, if every corner is visible.
    fn selection_outline(&self, frame: &FrameView, viewport: UVec2) -> Option<SelectionOutline> {
        let rect = self.world.selection().rect()?;
        let (x0, z0) = (rect.min.x as f32, rect.min.z as f32);
        let (x1, z1) = (rect.max.x as f32 + 1.0, rect.max.z as f32 + 1.0);
        let scale = self.renderer.window().scale_factor() as f32;

        let mut corners = [egui::Pos2::ZERO; 4];
        for (slot, (x, z)) in corners.iter_mut().zip([(x0, z0), (x1, z0), (x1, z1), (x0, z1)]) {
            let p = world_to_screen(Vec3::new(x, OUTLINE_LIFT, z), frame.view_proj, viewport)?;
            *slot = egui::pos2(p.x / scale, p.y / scale);
        }
        Some(SelectionOutline { corners, live: self.world.selection().is_dragging() })
    }

    fn debug_stats(&self, viewport: UVec2) -> DebugStats {
        let camera = self.world.camera();
        let selection = self.world.selection();
        DebugStats {
            fps: self.timer.fps,
            frame_time_avg_ms: self.timer.avg_ms,
            frame_time_min_ms: self.timer.last_min_ms,
            frame_time_max_ms: self.timer.last_max_ms,
            tile_count: self.world.grid().tile_count(),
            wall_count: self.world.grid().wall_count(),
            draw_calls: self.draw_calls,
            resolution: (viewport.x, viewport.y),
            camera_center: (camera.center().x, camera.center().z),
            camera_yaw: camera.yaw(),
            camera_distance: camera.distance(),
            camera_zoom_pct: camera.zoom_fraction() * 100.0,
            hover: self.world.hover(),
            selected: selection.selected(),
            rect: selection.rect(),
            dragging: selection.is_dragging(),
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn run() -> Result<(), AppError> {
    let config = GameConfig::from_env();
    let world = TileWorld::new(&config)?;
    info!(
        "grid {} x {} ({} walls)",
        world.grid().width(),
        world.grid().height(),
        world.grid().wall_count()
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;

    let window_attributes = Window::default_attributes()
        .with_title(config.title.as_str())
        .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let renderer = pollster::block_on(Renderer::new(window.clone(), world.grid().tile_count()))?;
    let mut app = App {
        renderer,
        world,
        input: InputState::new(),
        last_update: None,
        timer: FrameTimer::new(),
        draw_calls: 0,
    };

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let response = app.renderer.overlay.handle_window_event(&window, event);
                app.input.process_event_behind_overlay(event, response.consumed);

                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                ..
                            },
                        ..
                    } => control_flow.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::F3),
                                repeat: false,
                                ..
                            },
                        ..
                    } => app.renderer.overlay.toggle(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::KeyF),
                                repeat: false,
                                ..
                            },
                        ..
                    } => app.world.focus_selection(),
                    WindowEvent::Resized(physical_size) => {
                        app.renderer.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => app.redraw(control_flow),
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    }).map_err(AppError::EventLoopRun)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}
