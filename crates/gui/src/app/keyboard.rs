//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // Escape clears the element selection
        if i.key_pressed(egui::Key::Escape) {
            state.design.select(None);
        }
        // Delete removes the selected element
        if i.key_pressed(egui::Key::Delete) {
            if let Some(index) = state.design.selected() {
                state.design.remove(index);
            }
        }
    });
}
