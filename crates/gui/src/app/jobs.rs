//! Background jobs: image decoding and order upload.
//!
//! Jobs run on a tokio runtime and report back over a channel the UI thread
//! drains once per frame, so the interface never blocks on file IO or the
//! network.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use base64::Engine;
use tokio::runtime::Runtime;

use crate::error::{TextureDecodeError, UploadError};
use crate::state::design::DecodedImage;
use crate::upload::{self, InquiryForm};

/// Outcome of a finished background job
pub enum JobResult {
    ImageDecoded {
        pixels: DecodedImage,
        preview_uri: String,
        file_name: String,
        file_size: u64,
    },
    ImageFailed(TextureDecodeError),
    UploadFinished(Result<Option<String>, UploadError>),
}

pub struct JobRunner {
    runtime: Runtime,
    tx: Sender<JobResult>,
    rx: Receiver<JobResult>,
    upload_in_flight: bool,
}

impl JobRunner {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("tokio runtime");
        let (tx, rx) = channel();
        Self {
            runtime,
            tx,
            rx,
            upload_in_flight: false,
        }
    }

    /// An order upload has been started and has not reported back yet
    pub fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    /// Decode an image file off-thread. Reports `ImageDecoded` or
    /// `ImageFailed`.
    pub fn spawn_decode(&self, path: PathBuf) {
        let tx = self.tx.clone();
        self.runtime.spawn_blocking(move || {
            let result = decode_image_file(&path);
            let _ = tx.send(match result {
                Ok(decoded) => decoded,
                Err(err) => JobResult::ImageFailed(err),
            });
        });
    }

    /// Post an assembled inquiry form to the order service
    pub fn spawn_upload(&mut self, endpoint: String, form: InquiryForm) {
        self.upload_in_flight = true;
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = upload::submit(&endpoint, form).await;
            let _ = tx.send(JobResult::UploadFinished(result));
        });
    }

    /// Drain results of finished jobs; called once per frame
    pub fn poll(&mut self) -> Vec<JobResult> {
        let results: Vec<JobResult> = self.rx.try_iter().collect();
        for result in &results {
            if matches!(result, JobResult::UploadFinished(_)) {
                self.upload_in_flight = false;
            }
        }
        results
    }
}

fn decode_image_file(path: &std::path::Path) -> Result<JobResult, TextureDecodeError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = std::fs::read(path).map_err(|e| TextureDecodeError {
        file_name: file_name.clone(),
        reason: e.to_string(),
    })?;
    let file_size = bytes.len() as u64;

    let decoded = image::load_from_memory(&bytes).map_err(|e| TextureDecodeError {
        file_name: file_name.clone(),
        reason: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    // Thumbnail shows the original bytes, no re-encode needed
    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    };
    let preview_uri = format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    );

    Ok(JobResult::ImageDecoded {
        pixels: DecodedImage {
            width,
            height,
            rgba: Arc::from(rgba.into_raw().into_boxed_slice()),
        },
        preview_uri,
        file_name,
        file_size,
    })
}
