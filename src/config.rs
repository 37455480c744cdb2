//! Configuration types for invoice submission.
//!
//! Everything a submission depends on lives in [`ClientConfig`], built via
//! [`ClientConfigBuilder`]. The API base address is an explicit value here
//! rather than something inferred from the environment at request time, so
//! tests can point a submission at any server.

use crate::error::InvoiceScanError;
use crate::pipeline::upload::InvoiceApi;
use crate::view::FormViewHandle;
use std::fmt;
use std::sync::Arc;

/// Default upload ceiling: 6 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 6 * 1024 * 1024;

/// Well-known API base addresses.
///
/// The invoice API runs on the developer's machine during local development
/// and on a hosted service otherwise.
pub struct ApiBase;

impl ApiBase {
    /// Endpoint used when the client runs on a local development host.
    pub const LOCAL: &'static str = "http://localhost:5000";

    /// Hosted production endpoint.
    pub const PRODUCTION: &'static str = "https://gemini-invoice-processor.onrender.com";

    /// Host name that selects [`ApiBase::LOCAL`].
    pub const LOCAL_HOST: &'static str = "localhost";

    /// Pick the API base for the host the client is served from.
    ///
    /// ```rust
    /// use invoice_scan::config::ApiBase;
    ///
    /// assert_eq!(ApiBase::for_host("localhost"), ApiBase::LOCAL);
    /// assert_eq!(ApiBase::for_host("invoices.example.com"), ApiBase::PRODUCTION);
    /// ```
    pub fn for_host(host: &str) -> &'static str {
        if host.trim().eq_ignore_ascii_case(Self::LOCAL_HOST) {
            Self::LOCAL
        } else {
            Self::PRODUCTION
        }
    }
}

/// Configuration for an invoice submission.
///
/// # Example
/// ```rust
/// use invoice_scan::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .api_base("http://localhost:5000")
///     .build()
///     .unwrap();
/// assert_eq!(config.upload_url(), "http://localhost:5000/upload");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Base address of the invoice API, without the `/upload` path.
    /// Default: [`ApiBase::PRODUCTION`].
    pub api_base: String,

    /// Largest accepted file in bytes. Default: 6 MiB. Equal sizes pass.
    pub max_file_bytes: u64,

    /// Receives alerts, loading-indicator changes and the rendered result.
    /// If None, a submission runs silently.
    pub view: Option<FormViewHandle>,

    /// Pre-constructed transport. Takes precedence over `api_base`.
    pub api: Option<Arc<dyn InvoiceApi>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: ApiBase::PRODUCTION.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            view: None,
            api: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("max_file_bytes", &self.max_file_bytes)
            .field("view", &self.view.as_ref().map(|_| "<dyn FormView>"))
            .field("api", &self.api.as_ref().map(|_| "<dyn InvoiceApi>"))
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full address of the upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.api_base.trim_end_matches('/'))
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ClientConfigBuilder {
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    /// Resolve the API base from a host name (see [`ApiBase::for_host`]).
    pub fn host(mut self, host: &str) -> Self {
        self.config.api_base = ApiBase::for_host(host).to_string();
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    pub fn view(mut self, view: FormViewHandle) -> Self {
        self.config.view = Some(view);
        self
    }

    pub fn api(mut self, api: Arc<dyn InvoiceApi>) -> Self {
        self.config.api = Some(api);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, InvoiceScanError> {
        let c = &self.config;
        let url = reqwest::Url::parse(&c.api_base).map_err(|e| {
            InvoiceScanError::InvalidConfig(format!("API base '{}' is not a URL: {}", c.api_base, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(InvoiceScanError::InvalidConfig(format!(
                "API base must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if c.max_file_bytes == 0 {
            return Err(InvoiceScanError::InvalidConfig(
                "Maximum file size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}
