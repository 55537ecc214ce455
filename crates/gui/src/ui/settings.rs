//! Settings window

use eframe::egui;

use crate::state::AppState;

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new("Settings")
        .open(&mut open)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            show_viewport_settings(ui, state);
            show_ui_settings(ui, state);
            show_backend_settings(ui, state);
            show_settings_buttons(ui, state);
        });
    state.show_settings_window = open;
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Viewport");
    ui.horizontal(|ui| {
        ui.label("Background color");
        ui.color_edit_button_srgb(&mut state.settings.viewport.background_color);
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Interface");
    ui.horizontal(|ui| {
        ui.label("Font size");
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(10.0..=24.0),
        );
    });
    ui.add_space(10.0);
}

fn show_backend_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Order service");
    ui.horizontal(|ui| {
        ui.label("Endpoint");
        ui.add(
            egui::TextEdit::singleline(&mut state.settings.backend.inquiry_url)
                .desired_width(ui.available_width()),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            state.settings.save();
        }
        if ui.button("Reset to defaults").clicked() {
            state.settings = crate::state::AppSettings::default();
        }
    });
}
