//! UI panels

pub mod design_panel;
pub mod order_panel;
pub mod settings;
pub mod status_bar;
pub mod toolbar;
