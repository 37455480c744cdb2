//! Error types for the invoice-scan library.
//!
//! Two error types reflect the two phases of a submission:
//!
//! * [`ValidationError`] — the selected file was rejected locally. Nothing
//!   was sent over the network and the loading indicator was never shown.
//!
//! * [`InvoiceScanError`] — every failure a submission can end with. Local
//!   rejections are wrapped in [`InvoiceScanError::Validation`]; the other
//!   variants happen after the request was attempted.
//!
//! Every error is terminal for its submission. Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when the backend reports a failure without an `error` field.
pub const PROCESSING_FALLBACK_MESSAGE: &str = "Processing failed";

/// Why a selected file was rejected before upload.
///
/// The `Display` text is what the user sees in the alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No file was chosen.
    #[error("Please select a file")]
    NoFileSelected,

    /// The declared MIME type is outside the `image/*` family.
    #[error("Please upload an image file")]
    UnsupportedType { mime_type: String },

    /// The file is larger than the configured ceiling.
    #[error("File size should be less than {}MB", .limit / (1024 * 1024))]
    FileTooLarge { size: u64, limit: u64 },
}

/// All errors returned by the invoice-scan library.
#[derive(Debug, Error)]
pub enum InvoiceScanError {
    // ── Local errors ──────────────────────────────────────────────────────
    /// The selected file did not pass validation; no request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Input file was not found at the given path.
    #[error("Invoice file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Request errors ────────────────────────────────────────────────────
    /// The request could not complete (DNS, connect, TLS, reset, body read).
    #[error("Network error: {reason}")]
    NetworkError { reason: String },

    /// The API answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    HttpError { status: u16 },

    /// The API answered 2xx but reported that processing failed.
    #[error("{message}")]
    ProcessingError { message: String },

    /// The body was not the JSON document the API is expected to send.
    #[error("Malformed response from invoice API: {detail}")]
    MalformedResponse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the rendered HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InvoiceScanError {
    /// `true` when the submission was stopped before any network activity.
    pub fn is_validation(&self) -> bool {
        matches!(self, InvoiceScanError::Validation(_))
    }

    /// The text shown to the user for this failure.
    ///
    /// Validation failures are shown verbatim; everything that happened
    /// after the request was attempted is prefixed the same way.
    pub fn user_message(&self) -> String {
        match self {
            InvoiceScanError::Validation(v) => v.to_string(),
            other => format!("Error processing invoice: {other}"),
        }
    }
}
