//! Data carried through one submission: the selected file going out and the
//! invoice data coming back.
//!
//! Monetary fields are plain `f64` values. They carry no currency; the
//! renderer applies the display format when it builds the table.

use serde::{Deserialize, Serialize};

/// A file chosen for upload, held in memory for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name sent in the multipart `Content-Disposition`.
    pub name: String,
    /// Declared MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The declared MIME type without surrounding whitespace.
    ///
    /// Validation and the upload both read the type through here so they
    /// agree on what was declared.
    pub fn mime_essence(&self) -> &str {
        self.mime_type.trim()
    }
}

/// Structured invoice data extracted by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceData {
    pub line_items: Vec<LineItem>,
    pub totals: Totals,

    // The backend also extracts these; they are passed through but not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_details: Option<CompanyDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One row of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

/// Subtotal (pre-tax), tax amount and grand total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Issuer details printed on the invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

/// JSON body returned by `POST /upload`.
///
/// Only `status` is required; the remaining fields depend on the outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub invoice_data: Option<InvoiceData>,
    /// Usually a string, but any JSON value is tolerated.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadResponse {
    /// Literal value of `status` for a processed invoice.
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}
