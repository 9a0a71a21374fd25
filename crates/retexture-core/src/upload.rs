//! Validation of user-selected photos before they are sent for
//! segmentation.
//!
//! The backend accepts PNG and JPEG up to [`MAX_UPLOAD_BYTES`]. Checking
//! here gives the user an immediate error instead of a round trip, and
//! probing the header yields the image dimensions the overlay canvas is
//! sized to.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// File extensions accepted for upload (lowercase, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Largest accepted upload (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The file picker `accept` attribute matching [`ALLOWED_EXTENSIONS`].
pub const ACCEPT_ATTRIBUTE: &str = ".png,.jpg,.jpeg,image/png,image/jpeg";

/// Errors produced while validating an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file name has no accepted extension.
    #[error("unsupported file type: {0} (expected PNG or JPEG)")]
    UnsupportedType(String),

    /// The file exceeds [`MAX_UPLOAD_BYTES`].
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge {
        /// Size of the selected file.
        size: usize,
        /// The enforced limit.
        limit: usize,
    },

    /// The selected file is empty.
    #[error("file is empty")]
    EmptyInput,

    /// The header could not be read as a PNG or JPEG image.
    #[error("failed to read image: {0}")]
    ImageDecode(String),
}

/// A validated upload, ready to send and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name.
    pub name: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// Pixel dimensions read from the image header.
    pub dimensions: crate::types::Dimensions,
    /// Detected format.
    pub format: ImageFormat,
}

impl ImageUpload {
    /// MIME type of the detected format.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Whether `name` ends in one of [`ALLOWED_EXTENSIONS`], ignoring case.
#[must_use]
pub fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    })
}

/// Validate a selected file and read its dimensions.
///
/// # Errors
///
/// Returns [`UploadError::UnsupportedType`] for a name without a PNG/JPEG
/// extension or content in another format, [`UploadError::EmptyInput`]
/// for an empty file, [`UploadError::TooLarge`] past the size limit, and
/// [`UploadError::ImageDecode`] if the header cannot be parsed.
pub fn validate(name: &str, bytes: Vec<u8>) -> Result<ImageUpload, UploadError> {
    if !has_allowed_extension(name) {
        return Err(UploadError::UnsupportedType(name.to_owned()));
    }
    if bytes.is_empty() {
        return Err(UploadError::EmptyInput);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| UploadError::ImageDecode(e.to_string()))?;
    let format = match reader.format() {
        Some(f @ (ImageFormat::Png | ImageFormat::Jpeg)) => f,
        Some(other) => {
            return Err(UploadError::UnsupportedType(format!(
                "{name} ({other:?} content)"
            )));
        }
        None => return Err(UploadError::ImageDecode("unrecognized image data".into())),
    };
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| UploadError::ImageDecode(e.to_string()))?;

    Ok(ImageUpload {
        name: name.to_owned(),
        bytes,
        dimensions: crate::types::Dimensions { width, height },
        format,
    })
}
