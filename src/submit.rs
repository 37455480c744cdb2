//! Submission entry points: validate → upload → render.
//!
//! One call is one form submission. Each call starts from scratch: the API
//! base is read from the config, nothing from a previous call is reused, and
//! nothing is kept afterwards.
//!
//! The view sees the same sequence a page would:
//!
//! ```text
//! invalid file   → alert, hide_result
//! request fails  → show_loading, hide_loading, alert, hide_result
//! success        → show_loading, display_result, hide_loading
//! ```

use crate::config::ClientConfig;
use crate::error::InvoiceScanError;
use crate::model::SelectedFile;
use crate::output::{SubmissionOutput, SubmissionStats};
use crate::pipeline::upload::{upload_invoice, HttpInvoiceApi, InvoiceApi};
use crate::pipeline::{input, render, validate};
use crate::view::{FormView, FormViewHandle, LoadingGuard, NoopFormView};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Validate `file`, upload it and render the returned invoice.
///
/// `None` means no file was selected.
///
/// # Errors
/// - [`InvoiceScanError::Validation`] — rejected locally; no request made
/// - [`InvoiceScanError::HttpError`], [`InvoiceScanError::ProcessingError`],
///   [`InvoiceScanError::NetworkError`], [`InvoiceScanError::MalformedResponse`]
///   — the request was attempted and failed
///
/// Every error has already been shown through the configured view when this
/// returns.
pub async fn submit(
    file: Option<SelectedFile>,
    config: &ClientConfig,
) -> Result<SubmissionOutput, InvoiceScanError> {
    let view = resolve_view(config);
    let result = run_submission(file.as_ref(), config, view.as_ref()).await;

    if let Err(ref e) = result {
        if e.is_validation() {
            warn!("Submission rejected: {}", e);
        } else {
            error!("Invoice submission failed: {}", e);
        }
        view.alert(&e.user_message());
        view.hide_result();
    }

    result
}

/// Load `path` from disk and [`submit`] it.
///
/// `None` behaves like an empty file picker. `mime_override` replaces the
/// type guessed from the extension. A file that cannot be read is returned
/// as an error without involving the view.
pub async fn submit_path(
    path: Option<&Path>,
    mime_override: Option<&str>,
    config: &ClientConfig,
) -> Result<SubmissionOutput, InvoiceScanError> {
    let file = match path {
        Some(p) => Some(input::load_file(p, mime_override).await?),
        None => None,
    };
    submit(file, config).await
}

/// Submit and write the rendered HTML to `output_path`.
///
/// With `standalone` the table is wrapped in a full HTML page. Uses an
/// atomic write (temp file + rename) so a failed run never leaves a
/// half-written file behind.
pub async fn submit_to_file(
    file: Option<SelectedFile>,
    output_path: impl AsRef<Path>,
    standalone: bool,
    config: &ClientConfig,
) -> Result<SubmissionOutput, InvoiceScanError> {
    let output = submit(file, config).await?;
    let html = if standalone {
        render::render_document(&output.invoice)
    } else {
        output.html.clone()
    };
    write_atomic(output_path.as_ref(), &html).await?;
    Ok(output)
}

/// Synchronous wrapper around [`submit`].
///
/// Creates a temporary tokio runtime internally.
pub fn submit_sync(
    file: Option<SelectedFile>,
    config: &ClientConfig,
) -> Result<SubmissionOutput, InvoiceScanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| InvoiceScanError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(submit(file, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn run_submission(
    file: Option<&SelectedFile>,
    config: &ClientConfig,
    view: &dyn FormView,
) -> Result<SubmissionOutput, InvoiceScanError> {
    let total_start = Instant::now();

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let file = validate::validate_selection(file, config.max_file_bytes)?;

    // ── Step 2: Resolve transport ────────────────────────────────────────
    let api = resolve_api(config)?;
    info!(
        "Submitting '{}' ({} bytes) to {}",
        file.name,
        file.size(),
        config.api_base
    );

    // ── Step 3: Upload and render under the loading indicator ────────────
    let _loading = LoadingGuard::acquire(view);

    let request_start = Instant::now();
    let outcome = upload_invoice(api.as_ref(), file).await?;
    let request_duration_ms = request_start.elapsed().as_millis() as u64;

    let html = render::render_invoice(&outcome.invoice);
    view.display_result(&html);

    let stats = SubmissionStats {
        file_bytes: file.size(),
        line_items: outcome.invoice.line_items.len(),
        request_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Invoice processed: {} line items, {}ms",
        stats.line_items, stats.total_duration_ms
    );

    Ok(SubmissionOutput {
        invoice: outcome.invoice,
        html,
        message: outcome.message,
        stats,
    })
}

/// Use the injected transport, or build an HTTP one for `config.api_base`.
fn resolve_api(config: &ClientConfig) -> Result<Arc<dyn InvoiceApi>, InvoiceScanError> {
    if let Some(ref api) = config.api {
        return Ok(Arc::clone(api));
    }
    Ok(Arc::new(HttpInvoiceApi::new(&config.api_base)?))
}

fn resolve_view(config: &ClientConfig) -> FormViewHandle {
    config
        .view
        .clone()
        .unwrap_or_else(|| Arc::new(NoopFormView))
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), InvoiceScanError> {
    let write_err = |source| InvoiceScanError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}
