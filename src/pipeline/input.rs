//! Input loading: read a local file into a [`SelectedFile`].
//!
//! A browser file picker reports a MIME type derived from the file name, and
//! the validator only ever looks at that declared type. We reproduce that
//! here: the type comes from the extension, never from sniffing the bytes.

use crate::error::InvoiceScanError;
use crate::model::SelectedFile;
use std::path::Path;
use tracing::debug;

/// Reported when the extension maps to no known type.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Read `path` into memory.
///
/// `mime_override` replaces the type guessed from the extension.
pub async fn load_file(
    path: &Path,
    mime_override: Option<&str>,
) -> Result<SelectedFile, InvoiceScanError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => InvoiceScanError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => InvoiceScanError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    let mime_type = match mime_override {
        Some(m) => m.trim().to_string(),
        None => guess_mime_type(path).to_string(),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "invoice".to_string());

    debug!("Loaded '{}' as {} ({} bytes)", path.display(), mime_type, bytes.len());
    Ok(SelectedFile::new(name, mime_type, bytes))
}

/// Guess a MIME type from the file extension.
///
/// Raster formats come from the `image` crate's format table; a few types a
/// file picker commonly reports but `image` does not know are listed here.
pub fn guess_mime_type(path: &Path) -> &'static str {
    if let Ok(format) = image::ImageFormat::from_path(path) {
        return format.to_mime_type();
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("svg") => "image/svg+xml",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => UNKNOWN_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn guesses_common_types() {
        assert_eq!(guess_mime_type(Path::new("a.png")), "image/png");
        assert_eq!(guess_mime_type(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(guess_mime_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(guess_mime_type(Path::new("a.webp")), "image/webp");
        assert_eq!(guess_mime_type(Path::new("scan.svg")), "image/svg+xml");
        assert_eq!(guess_mime_type(Path::new("invoice.pdf")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("noext")), UNKNOWN_MIME_TYPE);
    }

    #[tokio::test]
    async fn loads_file_with_guessed_type() {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(b"\x89PNG\r\n\x1a\n").unwrap();

        let f = load_file(tmp.path(), None).await.expect("readable file");
        assert_eq!(f.mime_type, "image/png");
        assert_eq!(f.size(), 8);
        assert!(f.name.ends_with(".png"));
    }

    #[tokio::test]
    async fn override_wins() {
        let mut tmp = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        tmp.write_all(b"data").unwrap();

        let f = load_file(tmp.path(), Some(" image/jpeg ")).await.unwrap();
        assert_eq!(f.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn missing_file() {
        let err = load_file(Path::new("/definitely/not/here.png"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceScanError::FileNotFound { .. }));
    }
}
