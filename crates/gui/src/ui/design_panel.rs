//! Design element list and the transform editor for the selection

use egui::Ui;
use shared::Rgb;

use crate::state::design::{Axis, ElementKind};
use crate::state::AppState;

/// Copy of the kind-specific editable fields, detached from the collection
/// borrow so the setters can run while the editor is showing
enum KindEditor {
    Image { scale: f32 },
    Text { color: Rgb, font_size: f32 },
}

pub struct DesignPanel {
    /// Pending label text for the add-text row
    text_input: String,
}

impl DesignPanel {
    pub fn new() -> Self {
        Self {
            text_input: String::new(),
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        ui.heading("Design");
        ui.add_space(4.0);

        // ── Add text row ─────────────────────────────────────
        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.text_input)
                    .hint_text("Label text")
                    .desired_width(ui.available_width() - 50.0),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add").clicked() || submitted {
                if state.design.add_text(&self.text_input).is_some() {
                    self.text_input.clear();
                }
            }
        });

        ui.add_space(4.0);

        // ── Element list ─────────────────────────────────────
        let mut clicked = None;
        let mut removed = None;

        for (i, element) in state.design.elements().iter().enumerate() {
            let selected = state.design.selected() == Some(i);
            ui.horizontal(|ui| {
                match &element.kind {
                    ElementKind::Image {
                        preview_uri,
                        file_name,
                        ..
                    } => {
                        ui.add(
                            egui::Image::from_uri(preview_uri.clone())
                                .fit_to_exact_size(egui::vec2(28.0, 28.0))
                                .corner_radius(egui::CornerRadius::same(3)),
                        );
                        if ui.selectable_label(selected, file_name).clicked() {
                            clicked = Some(i);
                        }
                    }
                    ElementKind::Text { text, color, .. } => {
                        ui.colored_label(
                            egui::Color32::from_rgb(color.r, color.g, color.b),
                            "T",
                        );
                        if ui.selectable_label(selected, text).clicked() {
                            clicked = Some(i);
                        }
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("\u{2715}").on_hover_text("Remove").clicked() {
                        removed = Some(i);
                    }
                });
            });
        }

        if state.design.is_empty() {
            ui.weak("Add an image or a text label to start designing.");
        }

        if let Some(i) = clicked {
            state.design.select(Some(i));
        }
        if let Some(i) = removed {
            state.design.remove(i);
        }

        // ── Selected element editor ──────────────────────────
        let Some(index) = state.design.selected() else {
            return;
        };

        ui.add_space(6.0);
        ui.separator();
        ui.add_space(2.0);
        ui.strong("Placement");

        let (position, rotation) = {
            let Some(element) = state.design.get(index) else {
                return;
            };
            (element.position, element.rotation)
        };

        for (label, axis) in [("X", Axis::X), ("Y", Axis::Y), ("Z", Axis::Z)] {
            let mut value = position[axis.index()];
            ui.horizontal(|ui| {
                ui.label(label);
                if ui
                    .add(egui::DragValue::new(&mut value).speed(0.01).range(-2.0..=2.0))
                    .changed()
                {
                    state.design.set_position(index, axis, value);
                }
            });
        }

        ui.add_space(2.0);
        ui.label("Rotation");
        for (label, axis) in [("X", Axis::X), ("Y", Axis::Y), ("Z", Axis::Z)] {
            let mut degrees = rotation[axis.index()].to_degrees();
            ui.horizontal(|ui| {
                ui.label(label);
                if ui
                    .add(
                        egui::DragValue::new(&mut degrees)
                            .speed(1.0)
                            .range(-180.0..=180.0)
                            .suffix("\u{00b0}"),
                    )
                    .changed()
                {
                    state.design.set_rotation(index, axis, degrees.to_radians());
                }
            });
        }

        ui.add_space(2.0);
        let kind = state.design.get(index).map(|e| match &e.kind {
            ElementKind::Image { scale, .. } => KindEditor::Image { scale: *scale },
            ElementKind::Text {
                color, font_size, ..
            } => KindEditor::Text {
                color: *color,
                font_size: *font_size,
            },
        });
        match kind {
            Some(KindEditor::Image { scale }) => {
                let mut scale = scale;
                ui.horizontal(|ui| {
                    ui.label("Scale");
                    if ui
                        .add(egui::Slider::new(&mut scale, 0.1..=2.5))
                        .changed()
                    {
                        state.design.set_scale(index, scale);
                    }
                });
            }
            Some(KindEditor::Text { color, font_size }) => {
                let mut font_size = font_size;
                let mut rgb = [color.r, color.g, color.b];
                ui.horizontal(|ui| {
                    ui.label("Size");
                    if ui
                        .add(egui::Slider::new(&mut font_size, 0.05..=1.0))
                        .changed()
                    {
                        state.design.set_font_size(index, font_size);
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Color");
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        state.design.set_text_color(
                            index,
                            Rgb {
                                r: rgb[0],
                                g: rgb[1],
                                b: rgb[2],
                            },
                        );
                    }
                });
            }
            None => {}
        }
    }
}
