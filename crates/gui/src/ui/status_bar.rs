//! Bottom status bar

use egui::Ui;

use crate::app::StatusLine;
use crate::state::AppState;
use crate::viewport::host::ContextState;

pub fn show(
    ui: &mut Ui,
    state: &AppState,
    context: ContextState,
    upload_in_flight: bool,
    status: Option<&StatusLine>,
) {
    ui.horizontal(|ui| {
        ui.weak(format!("Elements: {}", state.design.len()));

        ui.separator();

        match context {
            ContextState::Lost => {
                ui.colored_label(egui::Color32::from_rgb(230, 180, 80), "Graphics paused");
            }
            ContextState::Uninitialized => {
                ui.weak("Starting\u{2026}");
            }
            ContextState::Ready => {
                ui.weak("Ready");
            }
        }

        if upload_in_flight {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(255, 200, 100),
                "Uploading order\u{2026}",
            );
        }

        if let Some(status) = status {
            ui.separator();
            if status.is_error {
                ui.colored_label(egui::Color32::from_rgb(230, 120, 120), &status.text);
            } else {
                ui.label(&status.text);
            }
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak("TeeLab v0.1");
        });
    });
}
