//! Result types returned by a successful submission.

use crate::model::InvoiceData;
use serde::Serialize;

/// Everything a successful submission produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutput {
    /// Invoice data exactly as returned by the API.
    pub invoice: InvoiceData,
    /// The rendered result fragment that was handed to the view.
    pub html: String,
    /// Informational message from the API, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub stats: SubmissionStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SubmissionStats {
    /// Size of the uploaded file.
    pub file_bytes: u64,
    /// Number of line items received.
    pub line_items: usize,
    /// Wall-clock time from request start to reply interpretation.
    pub request_duration_ms: u64,
    /// Wall-clock time of the whole submission.
    pub total_duration_ms: u64,
}
