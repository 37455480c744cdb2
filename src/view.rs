//! The user-facing side of a submission.
//!
//! A submission talks to its surroundings through three things: an alert
//! box, a loading indicator and a result container. [`FormView`] bundles
//! them so the library never touches a terminal or a page directly. Inject
//! an [`Arc<dyn FormView>`] via [`crate::config::ClientConfigBuilder::view`].
//!
//! # Example
//!
//! ```rust
//! use invoice_scan::{ClientConfig, FormView};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Alerts(Mutex<Vec<String>>);
//!
//! impl FormView for Alerts {
//!     fn alert(&self, message: &str) {
//!         self.0.lock().unwrap().push(message.to_string());
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .view(Arc::new(Alerts::default()) as Arc<dyn FormView>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Receives the visible side effects of a submission.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait FormView: Send + Sync {
    /// Show a message to the user and wait for nothing.
    fn alert(&self, message: &str) {
        let _ = message;
    }

    /// Make the loading indicator visible.
    fn show_loading(&self) {}

    /// Hide the loading indicator.
    fn hide_loading(&self) {}

    /// Replace the result container's content with `html` and show it.
    fn display_result(&self, html: &str) {
        let _ = html;
    }

    /// Hide the result container.
    fn hide_result(&self) {}
}

/// A no-op view for callers that only want the returned value.
pub struct NoopFormView;

impl FormView for NoopFormView {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type FormViewHandle = Arc<dyn FormView>;

/// Keeps the loading indicator visible while alive.
///
/// `acquire` shows the indicator; dropping the guard hides it, so every
/// exit path out of the request (including `?` and unwinding) clears it.
#[must_use = "the loading indicator is hidden as soon as the guard is dropped"]
pub struct LoadingGuard<'a> {
    view: &'a dyn FormView,
}

impl<'a> LoadingGuard<'a> {
    pub fn acquire(view: &'a dyn FormView) -> Self {
        view.show_loading();
        Self { view }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.view.hide_loading();
    }
}
