// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inspection of base64 image payloads before they are forwarded upstream

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use thiserror::Error;

/// Maximum decoded image size (20MB)
pub const MAX_IMAGE_SIZE: usize = 20 * 1024 * 1024;

/// Length of the padded base64 encoding of a `MAX_IMAGE_SIZE` image
pub const MAX_ENCODED_IMAGE_SIZE: usize = MAX_IMAGE_SIZE.div_ceil(3) * 4;

/// MIME type used when the format cannot be sniffed
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Image data is empty")]
    EmptyData,
}

/// What we learned about an uploaded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Detected format, if the magic bytes were recognised
    pub format: Option<ImageFormat>,
    /// Decoded size in bytes
    pub size_bytes: usize,
}

impl ImageInfo {
    /// MIME type for the `data:` URL sent to the vision model
    pub fn mime_type(&self) -> &'static str {
        self.format
            .map(|f| f.to_mime_type())
            .unwrap_or(FALLBACK_MIME_TYPE)
    }
}

/// Decode a base64 image far enough to validate it and sniff its format.
///
/// The pixels are never decoded; the provider does that.
pub fn inspect_base64_image(base64_str: &str) -> Result<ImageInfo, ImageError> {
    if base64_str.is_empty() {
        return Err(ImageError::EmptyData);
    }

    // Cheap upper bound before allocating: 4 base64 chars encode 3 bytes
    let estimated = base64_str.len() / 4 * 3;
    if estimated > MAX_IMAGE_SIZE + 3 {
        return Err(ImageError::TooLarge(estimated, MAX_IMAGE_SIZE));
    }

    let bytes = STANDARD.decode(base64_str)?;

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    Ok(ImageInfo {
        format: detect_format(&bytes),
        size_bytes: bytes.len(),
    })
}

/// Detect the formats the vision model accepts from their magic bytes
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Some(ImageFormat::Gif),

        _ => None,
    }
}
