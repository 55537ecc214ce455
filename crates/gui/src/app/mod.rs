//! Main application module

mod jobs;
mod keyboard;
mod styles;

use std::path::PathBuf;

use eframe::egui;

use crate::asset::GarmentAsset;
use crate::error::AssetLoadError;
use crate::export::{self, SceneSnapshot};
use crate::state::{order, AppState};
use crate::ui::toolbar::{Toolbar, ToolbarResponse};
use crate::ui::{design_panel::DesignPanel, order_panel, settings, status_bar};
use crate::upload::InquiryForm;
use crate::validation;
use crate::viewport::ViewportPanel;
use jobs::{JobResult, JobRunner};

/// What to do with the next framebuffer readback
#[derive(Debug, PartialEq, Eq)]
enum SnapshotAction {
    SavePng,
    SubmitOrder,
}

/// One-slot queue for the framebuffer readback. The readback takes a frame to
/// come back, and only one action may wait on it; arming while armed is
/// refused so a pending order submission cannot be replaced by a later click.
#[derive(Default)]
struct SnapshotQueue {
    action: Option<SnapshotAction>,
}

impl SnapshotQueue {
    fn arm(&mut self, action: SnapshotAction) -> bool {
        if self.action.is_some() {
            return false;
        }
        self.action = Some(action);
        true
    }

    fn is_armed(&self) -> bool {
        self.action.is_some()
    }

    fn take(&mut self) -> Option<SnapshotAction> {
        self.action.take()
    }
}

/// One-line status feedback shown in the status bar
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Main application
pub struct StudioApp {
    state: AppState,
    viewport: ViewportPanel,
    asset: Option<&'static GarmentAsset>,
    asset_error: Option<AssetLoadError>,
    jobs: JobRunner,
    toolbar: Toolbar,
    design_panel: DesignPanel,
    pending_snapshot: SnapshotQueue,
    status: Option<StatusLine>,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl StudioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, model_path: PathBuf) -> Self {
        let state = AppState::default();

        let (asset, asset_error) = match GarmentAsset::prepare(&model_path) {
            Ok(asset) => (Some(asset), None),
            Err(e) => {
                tracing::error!("Failed to load garment model: {e}");
                (None, Some(e))
            }
        };

        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);
        // Data-URI thumbnails in the element list
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut viewport = ViewportPanel::new();
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }
        viewport.reset_camera(asset);

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            asset,
            asset_error,
            jobs: JobRunner::new(),
            toolbar: Toolbar::new(),
            design_panel: DesignPanel::new(),
            pending_snapshot: SnapshotQueue::default(),
            status: None,
            last_font_size,
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        self.handle_job_results();
        self.handle_snapshot();

        // Jobs finish while no input arrives; keep polling
        if self.jobs.upload_in_flight() || self.pending_snapshot.is_armed() {
            ctx.request_repaint();
        }

        // ── Toolbar ───────────────────────────────────────────
        // Busy covers the snapshot-wait frame too, so export and order
        // controls stay disabled until the readback is consumed
        let busy = self.is_busy();
        let mut toolbar_response = ToolbarResponse::default();
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar_response = self.toolbar.show(ui, &mut self.state, busy);
            });
        self.apply_toolbar(toolbar_response);

        // ── Settings window ──────────────────────────────────
        settings::settings_window(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(
                    ui,
                    &self.state,
                    self.viewport.context_state(),
                    self.jobs.upload_in_flight(),
                    self.status.as_ref(),
                );
            });

        // ── Right panel: design elements + order ─────────────
        egui::SidePanel::right("side_panel")
            .default_width(300.0)
            .width_range(230.0..=460.0)
            .resizable(true)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.design_panel.show(ui, &mut self.state);

                    ui.add_space(4.0);
                    ui.separator();
                    ui.add_space(4.0);

                    if order_panel::show(ui, &mut self.state, busy) {
                        self.start_order();
                    }
                });
            });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if let Some(ref e) = self.asset_error {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(
                            egui::Color32::from_rgb(230, 120, 120),
                            format!("Could not load the garment model:\n{e}"),
                        );
                    });
                } else {
                    self.viewport.show(ui, &mut self.state, self.asset);
                }
            });
    }
}

impl StudioApp {
    fn is_busy(&self) -> bool {
        self.jobs.upload_in_flight() || self.pending_snapshot.is_armed()
    }

    fn handle_job_results(&mut self) {
        for result in self.jobs.poll() {
            match result {
                JobResult::ImageDecoded {
                    pixels,
                    preview_uri,
                    file_name,
                    file_size,
                } => {
                    tracing::info!(file = %file_name, "Image decoded");
                    self.state
                        .design
                        .add_image(pixels, preview_uri, file_name, file_size);
                }
                JobResult::ImageFailed(e) => {
                    tracing::warn!("{e}");
                    self.status = Some(StatusLine::error(e.to_string()));
                }
                JobResult::UploadFinished(Ok(id)) => {
                    let text = match id {
                        Some(id) => format!("Order submitted (inquiry {id})"),
                        None => "Order submitted".to_string(),
                    };
                    tracing::info!("{text}");
                    self.status = Some(StatusLine::info(text));
                }
                JobResult::UploadFinished(Err(e)) => {
                    tracing::warn!("Order upload failed: {e}");
                    self.status = Some(StatusLine::error(format!(
                        "Order upload failed: {e}. The draft is kept locally."
                    )));
                }
            }
        }
    }

    fn handle_snapshot(&mut self) {
        if !self.pending_snapshot.is_armed() {
            return;
        }
        let Some(pixels) = self.viewport.poll_snapshot() else {
            return;
        };
        let Some(action) = self.pending_snapshot.take() else {
            return;
        };

        let png = match export::encode_snapshot_png(&pixels) {
            Ok(png) => png,
            Err(e) => {
                self.status = Some(StatusLine::error(format!("Snapshot failed: {e}")));
                return;
            }
        };

        match action {
            SnapshotAction::SavePng => self.save_file("design.png", "PNG", &["png"], &png),
            SnapshotAction::SubmitOrder => self.submit_order(png),
        }
    }

    fn apply_toolbar(&mut self, response: ToolbarResponse) {
        if let Some(path) = response.image_picked {
            self.add_image(path);
        }
        if response.export_glb {
            if let Some(glb) = self.build_glb() {
                self.save_file("design.glb", "GLB", &["glb"], &glb);
            }
        }
        if response.export_gltf {
            if let Some(snapshot) = self.capture_scene() {
                match export::build_gltf_json(&snapshot) {
                    Ok(json) => self.save_file("design.gltf", "glTF", &["gltf"], json.as_bytes()),
                    Err(e) => self.status = Some(StatusLine::error(format!("Export failed: {e}"))),
                }
            }
        }
        if response.export_png && self.pending_snapshot.arm(SnapshotAction::SavePng) {
            self.viewport.request_snapshot();
        }
        if response.reset_camera {
            self.viewport.reset_camera(self.asset);
        }
    }

    fn add_image(&mut self, path: PathBuf) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        if let Err(e) = validation::check_image_upload(&file_name, size) {
            self.status = Some(StatusLine::error(e.to_string()));
            return;
        }
        self.jobs.spawn_decode(path);
    }

    fn capture_scene(&mut self) -> Option<SceneSnapshot> {
        let Some(asset) = self.asset else {
            self.status = Some(StatusLine::error("No garment model loaded".to_string()));
            return None;
        };
        Some(SceneSnapshot::capture(
            asset,
            &self.state.material,
            &self.state.design,
        ))
    }

    fn build_glb(&mut self) -> Option<Vec<u8>> {
        let snapshot = self.capture_scene()?;
        match export::build_glb(&snapshot) {
            Ok(glb) => Some(glb),
            Err(e) => {
                self.status = Some(StatusLine::error(format!("Export failed: {e}")));
                None
            }
        }
    }

    fn save_file(&mut self, file_name: &str, filter: &str, extensions: &[&str], data: &[u8]) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter, extensions)
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, data) {
            Ok(()) => {
                tracing::info!("Saved {}", path.display());
                self.status = Some(StatusLine::info(format!("Saved {}", path.display())));
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {e}", path.display());
                self.status = Some(StatusLine::error(format!("Failed to save file: {e}")));
            }
        }
    }

    /// Kick off the order flow by grabbing a viewport snapshot first
    fn start_order(&mut self) {
        if self.is_busy() {
            return;
        }
        if self.asset.is_none() {
            self.status = Some(StatusLine::error("No garment model loaded".to_string()));
            return;
        }
        if self.pending_snapshot.arm(SnapshotAction::SubmitOrder) {
            self.viewport.request_snapshot();
        }
    }

    /// Snapshot is in; persist the draft and launch the upload
    fn submit_order(&mut self, png: Vec<u8>) {
        let Some(glb) = self.build_glb() else {
            return;
        };
        let snapshot_uri = export::snapshot_data_uri(&png);
        let garment_color = self.state.material.color;

        let draft = shared::PendingDraft {
            customer: self.state.order.customer.clone(),
            design: crate::upload::design_summary(&self.state.design, garment_color),
            sizes: self.state.order.sizes.clone(),
            total_items: self.state.order.total_items(),
            total_price: self.state.order.total_price(),
            snapshot_data_uri: snapshot_uri.clone(),
            created_at: order::now_unix_seconds(),
        };
        order::save_draft(&draft);

        let form = match InquiryForm::new(
            &self.state.order,
            &self.state.design,
            garment_color,
            snapshot_uri,
            glb,
        ) {
            Ok(form) => form,
            Err(e) => {
                self.status = Some(StatusLine::error(format!("Could not assemble order: {e}")));
                return;
            }
        };

        let endpoint = self.state.settings.backend.inquiry_url.clone();
        tracing::info!(%endpoint, "Submitting order inquiry");
        self.status = Some(StatusLine::info("Submitting order\u{2026}".to_string()));
        self.jobs.spawn_upload(endpoint, form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_order_snapshot_survives_later_save_request() {
        let mut queue = SnapshotQueue::default();
        assert!(queue.arm(SnapshotAction::SubmitOrder));
        assert!(queue.is_armed());

        // A save request while the order readback is pending must not
        // replace it
        assert!(!queue.arm(SnapshotAction::SavePng));
        assert_eq!(queue.take(), Some(SnapshotAction::SubmitOrder));
    }

    #[test]
    fn snapshot_queue_rearms_after_consumption() {
        let mut queue = SnapshotQueue::default();
        assert!(!queue.is_armed());
        assert_eq!(queue.take(), None);

        assert!(queue.arm(SnapshotAction::SavePng));
        assert_eq!(queue.take(), Some(SnapshotAction::SavePng));
        assert!(!queue.is_armed());
        assert!(queue.arm(SnapshotAction::SubmitOrder));
    }
}
