use egui::epaint::Shadow;

use super::grid::Tile;
use super::selection::TileRect;

pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub tile_count: usize,
    pub wall_count: usize,
    pub draw_calls: u32,
    pub resolution: (u32, u32),
    pub camera_center: (f32, f32),
    pub camera_yaw: f32,
    pub camera_distance: f32,
    pub camera_zoom_pct: f32,
    pub hover: Tile,
    pub selected: Tile,
    pub rect: Option<TileRect>,
    pub dragging: bool,
}

/// Outline of the selection rectangle, already projected to egui screen points.
///
/// Corners that project behind the camera are dropped by the caller, so the
/// outline is only drawn when all four are visible.
pub struct SelectionOutline {
    pub corners: [egui::Pos2; 4],
    /// Drawn brighter while the drag is still in progress.
    pub live: bool,
}

fn tile_label(tile: Tile) -> String {
    match tile.to_option() {
        Some(t) => format!("({}, {})", t.x, t.z),
        None => "-".to_string(),
    }
}

pub struct DebugOverlay {
    pub visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(13.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame: the selection outline (`None` = hidden) and the
    /// F3 stats panel (`None` = hidden), in a single pass.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: Option<&DebugStats>,
        outline: Option<&SelectionOutline>,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(outline) = outline {
                let painter = ctx.layer_painter(egui::LayerId::new(
                    egui::Order::Background,
                    egui::Id::new("selection_outline"),
                ));
                let alpha = if outline.live { 230 } else { 140 };
                let stroke = egui::Stroke::new(
                    1.5,
                    egui::Color32::from_rgba_unmultiplied(90, 170, 255, alpha),
                );
                let c = outline.corners;
                for i in 0..4 {
                    painter.line_segment([c[i], c[(i + 1) % 4]], stroke);
                }
            }

            if let Some(stats) = stats {
                egui::Area::new(egui::Id::new("debug_overlay"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(8.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(format!("FPS: {}", stats.fps));
                                ui.label(format!(
                                    "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                                    stats.frame_time_avg_ms,
                                    stats.frame_time_min_ms,
                                    stats.frame_time_max_ms
                                ));
                                ui.label(format!(
                                    "Tiles: {}  Walls: {}  Draw calls: {}",
                                    stats.tile_count, stats.wall_count, stats.draw_calls
                                ));
                                ui.label(format!(
                                    "Resolution: {} x {}",
                                    stats.resolution.0, stats.resolution.1
                                ));
                                ui.label(format!(
                                    "Camera: ({:.1}, {:.1})  yaw {:.0}  dist {:.1}  zoom {:.0}%",
                                    stats.camera_center.0, stats.camera_center.1,
                                    stats.camera_yaw, stats.camera_distance, stats.camera_zoom_pct
                                ));
                                ui.label(format!("Hover: {}", tile_label(stats.hover)));
                                ui.label(format!("Selected: {}", tile_label(stats.selected)));
                                match stats.rect {
                                    Some(r) => ui.label(format!(
                                        "Rect: {} .. {}  ({} tiles){}",
                                        tile_label(r.min),
                                        tile_label(r.max),
                                        r.area(),
                                        if stats.dragging { "  dragging" } else { "" }
                                    )),
                                    None => ui.label("Rect: -"),
                                };
                            });
                    });
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_show_dash_for_no_tile() {
        assert_eq!(tile_label(Tile::NONE), "-");
        assert_eq!(tile_label(Tile::new(3, 7)), "(3, 7)");
    }
}
