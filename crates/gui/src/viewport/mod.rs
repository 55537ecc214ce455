//! 3D garment viewport with OpenGL rendering

mod camera;
mod gl_renderer;
pub use teelab_gui_lib::viewport::{host, mesh};

use std::sync::{Arc, Mutex};

use egui::Ui;
use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::asset::GarmentAsset;
use crate::state::{AppState, ElementKind};
use camera::ArcBallCamera;
use gl_renderer::{DecalDraw, GlRenderer, RenderParams};
use host::{ContextState, SnapshotPixels};

/// Depth of the decal projection box, in model units
const DECAL_DEPTH: f32 = 0.5;

/// 3D viewport panel showing the garment and its design elements
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            gl_renderer: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        let renderer = GlRenderer::new(gl);
        self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
    }

    pub fn reset_camera(&mut self, asset: Option<&GarmentAsset>) {
        self.camera = ArcBallCamera::new();
        if let Some(asset) = asset {
            if let Some(piece) = asset.pieces.get(asset.target_piece_index) {
                let radius = piece.bounding_sphere.radius.max(piece.aabb.size().length() * 0.5);
                self.camera.focus_on(piece.aabb.center(), radius);
            }
        }
    }

    /// Surface state as seen after the last painted frame
    pub fn context_state(&self) -> ContextState {
        match &self.gl_renderer {
            Some(r) => r.lock().map(|r| r.host_state()).unwrap_or(ContextState::Lost),
            None => ContextState::Uninitialized,
        }
    }

    /// Ask for a framebuffer readback at the end of the next frame
    pub fn request_snapshot(&self) {
        if let Some(renderer) = &self.gl_renderer {
            if let Ok(mut r) = renderer.lock() {
                r.request_snapshot();
            }
        }
    }

    /// Fetch the readback requested earlier, if the frame has been painted
    pub fn poll_snapshot(&self) -> Option<SnapshotPixels> {
        let renderer = self.gl_renderer.as_ref()?;
        renderer.lock().ok()?.take_snapshot()
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState, asset: Option<&'static GarmentAsset>) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );

        // ── Camera controls ─────────────────────────────
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.camera.pan(-delta.x * 0.005, delta.y * 0.005);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * 0.01);
            }
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        // ── GL rendering ────────────────────────────────
        self.render_gl(ui, rect, state, asset);

        // ── Overlays ────────────────────────────────────
        self.draw_overlays(ui, rect, state);
    }

    fn render_gl(
        &self,
        ui: &mut Ui,
        rect: egui::Rect,
        state: &mut AppState,
        asset: Option<&'static GarmentAsset>,
    ) {
        let Some(gl_renderer) = &self.gl_renderer else {
            return;
        };
        let Some(asset) = asset else {
            return;
        };

        let renderer_clone = gl_renderer.clone();
        let camera_yaw = self.camera.yaw;
        let camera_pitch = self.camera.pitch;
        let camera_distance = self.camera.distance;
        let camera_target = self.camera.target;
        let camera_fov = self.camera.fov;

        let decals = collect_decals(state);
        let retired = state.design.take_retired();
        let bg_color = state.settings.viewport.background_color;
        let garment_color = state.material.color.to_linear();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(
                move |info, painter| {
                    let gl = painter.gl();

                    let camera = ArcBallCamera {
                        yaw: camera_yaw,
                        pitch: camera_pitch,
                        distance: camera_distance,
                        target: camera_target,
                        fov: camera_fov,
                    };

                    let clip = info.clip_rect_in_pixels();
                    let viewport = [
                        clip.left_px as f32,
                        clip.from_bottom_px as f32,
                        clip.width_px as f32,
                        clip.height_px as f32,
                    ];

                    if let Ok(mut r) = renderer_clone.lock() {
                        if !r.begin_frame(gl) {
                            return;
                        }
                        r.sync_pieces(gl, asset);
                        r.sync_textures(gl, &decals, &retired);

                        let render_params = RenderParams {
                            viewport,
                            bg_color,
                            garment_color,
                        };
                        r.paint(gl, &camera, &render_params, &decals);
                    }
                },
            )),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);

        self.draw_text_labels(&painter, rect, state);
        self.draw_selection_marker(&painter, rect, state);

        if state.design.is_empty() {
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() - 20.0),
                egui::Align2::CENTER_BOTTOM,
                "Drag to orbit, right-drag to pan, scroll to zoom",
                egui::FontId::proportional(11.0),
                egui::Color32::from_rgb(100, 100, 110),
            );
        }

        if self.context_state() == ContextState::Lost {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Graphics context lost, waiting for restore\u{2026}",
                egui::FontId::proportional(14.0),
                egui::Color32::from_rgb(230, 180, 80),
            );
        }
    }

    /// Text labels render as screen-space billboards at their projected
    /// 3D positions, sized by distance to the camera
    fn draw_text_labels(&self, painter: &egui::Painter, rect: egui::Rect, state: &AppState) {
        let eye = self.camera.eye_position();
        let half_fov_tan = (self.camera.fov * 0.5).tan();

        for element in state.design.elements() {
            let ElementKind::Text {
                ref text,
                color,
                font_size,
            } = element.kind
            else {
                continue;
            };

            let world_pos = Vec3::from_array(element.position);
            let Some(screen_pos) = self.camera.project(world_pos, rect) else {
                continue;
            };

            let depth = (world_pos - eye).length().max(0.01);
            let px = font_size * rect.height() * 0.5 / (depth * half_fov_tan);
            if px < 1.0 {
                continue;
            }

            painter.text(
                screen_pos,
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(px),
                egui::Color32::from_rgb(color.r, color.g, color.b),
            );
        }
    }

    fn draw_selection_marker(&self, painter: &egui::Painter, rect: egui::Rect, state: &AppState) {
        let Some(element) = state.design.selected_element() else {
            return;
        };
        let world_pos = Vec3::from_array(element.position);
        if let Some(screen_pos) = self.camera.project(world_pos, rect) {
            painter.circle_stroke(
                screen_pos,
                6.0,
                egui::Stroke::new(1.5, egui::Color32::from_rgb(100, 200, 255)),
            );
        }
    }
}

/// Resolve image elements into decal draw commands
fn collect_decals(state: &AppState) -> Vec<DecalDraw> {
    state
        .design
        .elements()
        .iter()
        .filter_map(|element| {
            let ElementKind::Image {
                ref pixels, scale, ..
            } = element.kind
            else {
                return None;
            };
            // Keep the image aspect ratio: width follows the scale slider,
            // height follows the pixel aspect
            let aspect = if pixels.width > 0 {
                pixels.height as f32 / pixels.width as f32
            } else {
                1.0
            };
            let size = Vec3::new(scale, scale * aspect, DECAL_DEPTH);
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                element.rotation[0],
                element.rotation[1],
                element.rotation[2],
            );
            let model = Mat4::from_scale_rotation_translation(
                size,
                rotation,
                Vec3::from_array(element.position),
            );
            Some(DecalDraw {
                id: element.id.clone(),
                pixels: pixels.clone(),
                model,
            })
        })
        .collect()
}
