//! Top toolbar: garment color, image upload, exports

use std::path::PathBuf;

use egui::Ui;
use shared::Rgb;

use crate::state::AppState;
use crate::validation::IMAGE_EXTENSIONS;

/// Actions requested from the toolbar this frame
#[derive(Default)]
pub struct ToolbarResponse {
    pub image_picked: Option<PathBuf>,
    pub export_glb: bool,
    pub export_gltf: bool,
    pub export_png: bool,
    pub reset_camera: bool,
}

pub struct Toolbar {
    /// Hex field text, kept in sync with the shared material color
    hex_input: String,
    last_color: Rgb,
}

impl Toolbar {
    pub fn new() -> Self {
        let color = Rgb::WHITE;
        Self {
            hex_input: color.to_hex(),
            last_color: color,
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState, busy: bool) -> ToolbarResponse {
        let mut response = ToolbarResponse::default();

        // Picker edits elsewhere (or programmatic changes) refresh the hex field
        if state.material.color != self.last_color {
            self.hex_input = state.material.color.to_hex();
            self.last_color = state.material.color;
        }

        ui.horizontal(|ui| {
            ui.label("Garment color:");

            // Picker and hex field edit the same shared material
            let mut rgb = [
                state.material.color.r,
                state.material.color.g,
                state.material.color.b,
            ];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                state.material.color = Rgb {
                    r: rgb[0],
                    g: rgb[1],
                    b: rgb[2],
                };
                self.hex_input = state.material.color.to_hex();
                self.last_color = state.material.color;
            }

            let hex_edit = ui.add(
                egui::TextEdit::singleline(&mut self.hex_input).desired_width(70.0),
            );
            if hex_edit.changed() {
                if let Some(color) = Rgb::from_hex(&self.hex_input) {
                    state.material.color = color;
                    self.last_color = color;
                }
            }
            if hex_edit.lost_focus() {
                // Snap malformed input back to the current color
                self.hex_input = state.material.color.to_hex();
            }

            ui.separator();

            if ui.button("Add image\u{2026}").clicked() {
                response.image_picked = rfd::FileDialog::new()
                    .set_title("Choose an image")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file();
            }

            ui.separator();

            if ui
                .add_enabled(!busy, egui::Button::new("Export GLB"))
                .clicked()
            {
                response.export_glb = true;
            }
            if ui
                .add_enabled(!busy, egui::Button::new("Export glTF"))
                .clicked()
            {
                response.export_gltf = true;
            }
            if ui
                .add_enabled(!busy, egui::Button::new("Save image"))
                .clicked()
            {
                response.export_png = true;
            }

            ui.separator();

            if ui.button("Reset view").clicked() {
                response.reset_camera = true;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("\u{2699}").on_hover_text("Settings").clicked() {
                    state.show_settings_window = !state.show_settings_window;
                }
            });
        });

        response
    }
}
