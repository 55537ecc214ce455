//! Input validation for user uploads and transform edits.
//!
//! All checks run before any state change or GPU allocation, so a rejected
//! input leaves the design collection untouched.

use crate::error::InvalidInputError;

/// Maximum accepted upload size: 5 MB
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Extensions accepted for image uploads, matched case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Gate an image upload by file type and size. Runs before the file is read
/// or decoded.
pub fn check_image_upload(file_name: &str, size: u64) -> Result<(), InvalidInputError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(InvalidInputError::ImageType(file_name.to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(InvalidInputError::ImageTooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Reject empty or whitespace-only label text
pub fn check_label_text(text: &str) -> Result<(), InvalidInputError> {
    if text.trim().is_empty() {
        return Err(InvalidInputError::EmptyText);
    }
    Ok(())
}

/// Coerce a non-finite transform value to a fallback instead of letting NaN
/// propagate into the render graph
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_image_files() {
        assert!(check_image_upload("logo.png", 1024).is_ok());
        assert!(check_image_upload("PHOTO.JPG", 4 * 1024 * 1024).is_ok());
        assert!(check_image_upload("a.b.jpeg", MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn rejects_non_image_files() {
        assert_eq!(
            check_image_upload("design.pdf", 100),
            Err(InvalidInputError::ImageType("design.pdf".into()))
        );
        assert!(check_image_upload("noextension", 100).is_err());
        assert!(check_image_upload("archive.tar.gz", 100).is_err());
    }

    #[test]
    fn rejects_oversized_images() {
        let err = check_image_upload("big.png", MAX_IMAGE_BYTES + 1).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::ImageTooLarge {
                size: MAX_IMAGE_BYTES + 1,
                limit: MAX_IMAGE_BYTES,
            }
        );
    }

    #[test]
    fn rejects_blank_text() {
        assert_eq!(check_label_text(""), Err(InvalidInputError::EmptyText));
        assert_eq!(check_label_text(" \t\n"), Err(InvalidInputError::EmptyText));
        assert!(check_label_text("ok").is_ok());
    }

    #[test]
    fn finite_or_coerces_only_non_finite() {
        assert_eq!(finite_or(1.5, 0.0), 1.5);
        assert_eq!(finite_or(-0.0, 9.0), -0.0);
        assert_eq!(finite_or(f32::NAN, 0.8), 0.8);
        assert_eq!(finite_or(f32::INFINITY, 0.2), 0.2);
        assert_eq!(finite_or(f32::NEG_INFINITY, 0.2), 0.2);
    }
}
