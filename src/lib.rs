//! # invoice-scan
//!
//! Send a photographed invoice to the invoice-processing API and render the
//! extracted line items and totals as an HTML table in shekels.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Validate  a file is selected, `image/*`, at most 6 MiB (no I/O)
//!  ├─ 2. Upload    one multipart POST to {api_base}/upload, loading indicator on
//!  ├─ 3. Check     2xx status, JSON body, `"status": "success"`
//!  └─ 4. Render    HTML table: line items, subtotal, 17% VAT, total (₪)
//! ```
//!
//! Every failure is terminal for the submission: it is logged, shown to the
//! user, the loading indicator is cleared and any earlier result is hidden.
//! Nothing is retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use invoice_scan::{submit_path, ClientConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .api_base("http://localhost:5000")
//!         .build()?;
//!     let output = submit_path(Some(Path::new("receipt.jpg")), None, &config).await?;
//!     println!("{}", output.html);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `invoice-scan` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod submit;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ApiBase, ClientConfig, ClientConfigBuilder, DEFAULT_MAX_FILE_BYTES};
pub use error::{InvoiceScanError, ValidationError};
pub use model::{CompanyDetails, InvoiceData, LineItem, SelectedFile, Totals, UploadResponse};
pub use output::{SubmissionOutput, SubmissionStats};
pub use pipeline::render::{format_currency, render_document, render_invoice};
pub use pipeline::upload::{HttpInvoiceApi, HttpReply, InvoiceApi};
pub use submit::{submit, submit_path, submit_sync, submit_to_file};
pub use view::{FormView, FormViewHandle, LoadingGuard, NoopFormView};
