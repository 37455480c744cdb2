//! Input validation: decide locally whether a file may be uploaded.
//!
//! Checks run in a fixed order (presence, type, size) and the first failure
//! wins. Nothing here performs I/O.

use crate::error::ValidationError;
use crate::model::SelectedFile;
use tracing::debug;

/// MIME family accepted for upload.
const IMAGE_MIME_PREFIX: &str = "image/";

/// Validate the selected file against the type and size rules.
///
/// A file whose size equals `max_bytes` is accepted.
pub fn validate_selection(
    file: Option<&SelectedFile>,
    max_bytes: u64,
) -> Result<&SelectedFile, ValidationError> {
    let file = file.ok_or(ValidationError::NoFileSelected)?;

    if !is_image_mime(file.mime_essence()) {
        return Err(ValidationError::UnsupportedType {
            mime_type: file.mime_essence().to_string(),
        });
    }

    if file.size() > max_bytes {
        return Err(ValidationError::FileTooLarge {
            size: file.size(),
            limit: max_bytes,
        });
    }

    debug!(
        "Validated '{}' ({}, {} bytes)",
        file.name,
        file.mime_essence(),
        file.size()
    );
    Ok(file)
}

/// `true` for any MIME type in the `image/*` family, e.g. `image/png`.
pub fn is_image_mime(mime_type: &str) -> bool {
    let mime_type = mime_type.trim();
    mime_type.len() > IMAGE_MIME_PREFIX.len()
        && mime_type
            .get(..IMAGE_MIME_PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(IMAGE_MIME_PREFIX))
}
