//! Photo attachment rules for complaint submissions.
//!
//! Validation runs before any file or row is persisted; a single bad photo
//! rejects the whole submission with field-level errors.

use bytes::Bytes;
use serde::Serialize;

/// Maximum number of photos accepted per complaint.
pub const MAX_PHOTOS: usize = 5;

/// Maximum size of a single photo in bytes (5 MiB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// A photo as received from the submission form, not yet persisted.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// A field-level validation message attributable to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a batch of photo uploads against the attachment rules.
pub fn validate_photos(photos: &[PhotoUpload]) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if photos.len() > MAX_PHOTOS {
        errors.push(FieldError::new(
            "photos",
            format!("at most {MAX_PHOTOS} photos are allowed per complaint"),
        ));
    }

    for (index, photo) in photos.iter().enumerate() {
        let field = format!("photos[{index}]");
        if !photo.content_type.starts_with("image/") {
            errors.push(FieldError::new(
                field.clone(),
                format!("`{}` is not an image", photo.original_name),
            ));
        }
        if photo.data.len() > MAX_PHOTO_BYTES {
            errors.push(FieldError::new(
                field,
                format!("`{}` exceeds the 5 MiB photo limit", photo.original_name),
            ));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Derive a storage file extension from the declared MIME type. The client
/// filename is never trusted for this.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "image/bmp" => "bmp",
        "image/svg+xml" => "svg",
        _ => "img",
    }
}
