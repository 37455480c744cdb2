//! CLI binary for invoice-scan.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, shows a spinner while the API works and prints the
//! rendered invoice.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use invoice_scan::pipeline::input::load_file;
use invoice_scan::{
    render_document, submit, submit_to_file, ApiBase, ClientConfig, FormView, FormViewHandle,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal view ────────────────────────────────────────────────────────────

/// Terminal [`FormView`]: alerts go to stderr, the loading indicator is an
/// indicatif spinner.
struct CliFormView {
    spinner: Mutex<Option<ProgressBar>>,
    show_progress: bool,
}

impl CliFormView {
    fn new(show_progress: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            show_progress,
        })
    }
}

impl FormView for CliFormView {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", red("✘"), message);
    }

    fn show_loading(&self) {
        if !self.show_progress {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Processing");
        bar.set_message("Waiting for the invoice API…");
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(bar);
        }
    }

    fn hide_loading(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn display_result(&self, html: &str) {
        debug!("Result ready ({} bytes of HTML)", html.len());
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Process a receipt with the hosted API, print the HTML table
  invoice-scan receipt.jpg

  # Use a locally running API (http://localhost:5000)
  invoice-scan --local receipt.jpg

  # Standalone right-to-left HTML page written to a file
  invoice-scan receipt.png --page -o invoice.html

  # Extracted data as JSON
  invoice-scan --json receipt.jpg > invoice.json

  # A file without a useful extension
  invoice-scan --mime-type image/jpeg scan.bin

RULES:
  Only image files (image/*) of at most 6 MB are sent.
  Non-2xx replies and replies whose "status" is not "success" are errors.

ENVIRONMENT VARIABLES:
  INVOICE_SCAN_API_BASE   API base address (overrides --local and --host)
  INVOICE_SCAN_HOST       Host name used to pick the API (localhost → local API)
  INVOICE_SCAN_OUTPUT     Default for --output
  RUST_LOG                Log filter, e.g. invoice_scan=debug
"#;

/// Extract line items and totals from an invoice image.
#[derive(Parser, Debug)]
#[command(
    name = "invoice-scan",
    version,
    about = "Extract line items and totals from an invoice image",
    long_about = "Validate an invoice image, send it to the invoice-processing API and print \
the extracted line items, subtotal, VAT and total as an HTML table in shekels.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Invoice image to upload.
    input: Option<PathBuf>,

    /// API base address, e.g. http://localhost:5000.
    #[arg(long, env = "INVOICE_SCAN_API_BASE")]
    api_base: Option<String>,

    /// Pick the API as if served from this host (localhost → local API).
    #[arg(long, env = "INVOICE_SCAN_HOST")]
    host: Option<String>,

    /// Use the local development API (http://localhost:5000).
    #[arg(long)]
    local: bool,

    /// Declared MIME type; guessed from the file extension when omitted.
    #[arg(long)]
    mime_type: Option<String>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "INVOICE_SCAN_OUTPUT")]
    output: Option<PathBuf>,

    /// Emit a standalone HTML page instead of the table fragment.
    #[arg(long)]
    page: bool,

    /// Print the extracted invoice data as JSON instead of HTML.
    #[arg(long, conflicts_with_all = ["output", "page"])]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "INVOICE_SCAN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "INVOICE_SCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "INVOICE_SCAN_QUIET")]
    quiet: bool,
}

impl Cli {
    /// `--api-base` beats `--local`, which beats `--host`; the hosted API
    /// is the fallback.
    fn api_base(&self) -> String {
        if let Some(ref base) = self.api_base {
            base.clone()
        } else if self.local {
            ApiBase::LOCAL.to_string()
        } else if let Some(ref host) = self.host {
            ApiBase::for_host(host).to_string()
        } else {
            ApiBase::PRODUCTION.to_string()
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers the wait; INFO lines would tear it.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let view = CliFormView::new(show_progress);
    let config = ClientConfig::builder()
        .api_base(cli.api_base())
        .view(view as FormViewHandle)
        .build()
        .context("Invalid configuration")?;

    // ── Load input ───────────────────────────────────────────────────────
    let file = match cli.input {
        Some(ref path) => Some(
            load_file(path, cli.mime_type.as_deref())
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    // ── Submit ───────────────────────────────────────────────────────────
    // Failures were already shown by the view; only the exit code remains.
    if let Some(ref output_path) = cli.output {
        let output = match submit_to_file(file, output_path, cli.page, &config).await {
            Ok(o) => o,
            Err(_) => return Ok(ExitCode::FAILURE),
        };

        if !cli.quiet {
            eprintln!(
                "{}  {} line items  {}ms  →  {}",
                green("✔"),
                output.stats.line_items,
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let output = match submit(file, &config).await {
        Ok(o) => o,
        Err(_) => return Ok(ExitCode::FAILURE),
    };

    let rendered = if cli.json {
        serde_json::to_string_pretty(&output.invoice).context("Failed to serialise invoice")?
    } else if cli.page {
        render_document(&output.invoice)
    } else {
        output.html.clone()
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(rendered.as_bytes())
        .context("Failed to write to stdout")?;
    if !rendered.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }

    if !cli.quiet {
        let message = output.message.as_deref().unwrap_or("Invoice processed");
        eprintln!(
            "{} {}  {}",
            green("✔"),
            message,
            dim(&format!(
                "{} line items, {} bytes sent, {}ms",
                output.stats.line_items, output.stats.file_bytes, output.stats.total_duration_ms
            )),
        );
    }

    Ok(ExitCode::SUCCESS)
}
