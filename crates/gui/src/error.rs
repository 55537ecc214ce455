//! Failure taxonomy for the customization engine.
//!
//! Every error here is reported to the user and recovered from; none of them
//! aborts the editing session. Validation failures are rejected before any
//! state changes, so the design collection and material always reflect the
//! last successful operation.

use std::path::PathBuf;

use thiserror::Error;

/// The base garment model failed to load or contains no drawable geometry.
/// Fatal to customization; the app degrades to a visible fallback.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("failed to load garment model {path}: {reason}")]
    Import { path: PathBuf, reason: String },
    #[error("garment model {path} contains no drawable geometry")]
    Empty { path: PathBuf },
}

/// User input rejected before any state change
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("unsupported image type \"{0}\", expected an image file")]
    ImageType(String),
    #[error("image is {size} bytes, limit is {limit} bytes")]
    ImageTooLarge { size: u64, limit: u64 },
    #[error("label text is empty")]
    EmptyText,
}

/// An image passed validation but could not be decoded into a texture.
/// The design collection is left unchanged.
#[derive(Debug, Error)]
#[error("failed to decode {file_name}: {reason}")]
pub struct TextureDecodeError {
    pub file_name: String,
    pub reason: String,
}

/// Serialization of the current scene failed. Read-only over customization
/// state, so nothing needs rolling back.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: garment model not loaded")]
    EmptyScene,
    #[error("glTF serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot encoding failed: {0}")]
    Png(String),
}

/// Order submission failed. The cause is distinguished so the UI can report
/// timeout vs. server rejection vs. connectivity, and return to an editable
/// state for retry.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("order upload timed out after {0} seconds")]
    Timeout(u64),
    #[error("could not reach the order service: {0}")]
    Connect(String),
    #[error("order service rejected the design (HTTP {status}): {message}")]
    Server { status: u16, message: String },
}
