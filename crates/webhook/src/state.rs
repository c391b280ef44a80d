//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebhookConfig;
use crate::pipeline::{BuildError, Webhook};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; everything inside is read-only after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<Webhook>,
}

impl AppState {
    /// Create application state around an assembled webhook.
    #[must_use]
    pub fn new(webhook: Webhook) -> Self {
        Self {
            inner: Arc::new(webhook),
        }
    }

    /// Create application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be created.
    pub fn from_config(config: &WebhookConfig) -> Result<Self, BuildError> {
        Ok(Self::new(Webhook::from_config(config)?))
    }

    /// Get a reference to the webhook pipeline.
    #[must_use]
    pub fn webhook(&self) -> &Webhook {
        &self.inner
    }
}
