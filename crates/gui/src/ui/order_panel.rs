//! Order form: size counts, customer info, totals, submission

use egui::Ui;
use shared::SizeLabel;

use crate::state::AppState;

/// Returns true when the user asked to submit the order
pub fn show(ui: &mut Ui, state: &mut AppState, busy: bool) -> bool {
    ui.heading("Order");
    ui.add_space(4.0);

    ui.label("Sizes");
    egui::Grid::new("size_grid")
        .num_columns(SizeLabel::ALL.len())
        .spacing(egui::vec2(6.0, 2.0))
        .show(ui, |ui| {
            for label in SizeLabel::ALL {
                ui.label(label.as_str());
            }
            ui.end_row();
            for label in SizeLabel::ALL {
                let mut count = state.order.size_count(label);
                if ui
                    .add(egui::DragValue::new(&mut count).range(0..=999))
                    .changed()
                {
                    state.order.set_size(label, count);
                }
            }
            ui.end_row();
        });

    ui.add_space(6.0);
    ui.label("Contact");
    let customer = &mut state.order.customer;
    ui.add(egui::TextEdit::singleline(&mut customer.name).hint_text("Name"));
    ui.add(egui::TextEdit::singleline(&mut customer.email).hint_text("Email"));
    ui.add(egui::TextEdit::singleline(&mut customer.phone).hint_text("Phone"));
    ui.add(
        egui::TextEdit::multiline(&mut customer.notes)
            .hint_text("Notes")
            .desired_rows(2),
    );

    ui.add_space(6.0);
    let items = state.order.total_items();
    let price = state.order.total_price();
    ui.strong(format!("{items} items, total {price}"));

    let ready = items > 0
        && !state.order.customer.name.trim().is_empty()
        && !state.order.customer.email.trim().is_empty();

    ui.add_space(4.0);
    let mut submit = false;
    ui.horizontal(|ui| {
        let button = egui::Button::new(if busy {
            "Submitting\u{2026}"
        } else {
            "Save & order"
        });
        if ui
            .add_enabled(ready && !busy, button)
            .on_disabled_hover_text("Pick at least one size and fill in name and email")
            .clicked()
        {
            submit = true;
        }
        if busy {
            ui.spinner();
        }
    });

    submit
}
