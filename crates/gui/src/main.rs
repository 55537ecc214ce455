mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::asset`, `crate::export`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use teelab_gui_lib::{asset, error, export, state, upload, validation};

use std::path::PathBuf;

use app::StudioApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teelab_gui=info".into()),
        )
        .init();

    // Parse --model <path> argument
    let model_path = parse_model_arg().unwrap_or_else(asset::default_model_path);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("TeeLab Garment Studio")
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "teelab-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(StudioApp::new(cc, model_path)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_model_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--model" && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
        i += 1;
    }
    None
}
