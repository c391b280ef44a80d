//! Deferred responses for interactive callbacks.
//!
//! Slack wants an interactive callback acknowledged within three seconds but
//! hands us a one-time `response_url` for a follow-up message. The
//! acknowledgement is returned synchronously; the follow-up is posted from a
//! spawned task whose outcome is logged and returned through its
//! [`JoinHandle`].

use std::time::Duration;

use nozomi_core::{DecodedFields, Reply, ResponseBody};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};
use url::Url;

/// Default bound on the whole follow-up post.
pub const DEFAULT_DEFERRED_TIMEOUT: Duration = Duration::from_secs(10);

/// Text of the follow-up message.
const FOLLOW_UP_TEXT: &str = "pushed!";

/// Why a follow-up was not delivered.
#[derive(Debug, Error)]
pub enum DeferredError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// The `payload` field is missing or not the expected JSON.
    #[error("Invalid interaction payload: {0}")]
    InvalidPayload(String),

    /// The callback URL is not an absolute http(s) URL.
    #[error("Invalid response_url: {0}")]
    InvalidCallbackUrl(String),

    /// The POST could not be sent.
    #[error("Deferred response request failed: {0}")]
    Request(String),

    /// The callback answered with a non-success status.
    #[error("Deferred response returned status {0}")]
    Status(u16),

    /// The POST did not finish in time.
    #[error("Deferred response timed out after {0:?}")]
    TimedOut(Duration),
}

/// The part of an interaction payload we care about.
#[derive(Debug, Deserialize)]
struct CallbackTarget {
    response_url: String,
}

impl CallbackTarget {
    fn from_fields(fields: &DecodedFields) -> Result<Self, DeferredError> {
        let payload = fields
            .get("payload")
            .ok_or_else(|| DeferredError::InvalidPayload("missing payload field".to_string()))?;

        serde_json::from_str(payload).map_err(|e| DeferredError::InvalidPayload(e.to_string()))
    }

    fn url(&self) -> Result<Url, DeferredError> {
        let url = Url::parse(&self.response_url)
            .map_err(|e| DeferredError::InvalidCallbackUrl(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DeferredError::InvalidCallbackUrl(format!(
                "unsupported scheme {:?}",
                url.scheme()
            )));
        }

        Ok(url)
    }
}

/// Acknowledges interactive callbacks and posts the follow-up in the background.
#[derive(Debug, Clone)]
pub struct DeferredResponder {
    /// HTTP client for callback posts.
    client: Client,
    /// Bound on each follow-up post.
    timeout: Duration,
}

impl DeferredResponder {
    /// Create a responder whose follow-ups give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`DeferredError::Client`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, DeferredError> {
        let client = Client::builder()
            .build()
            .map_err(|e| DeferredError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Get the follow-up timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Acknowledge an interactive callback and schedule its follow-up.
    ///
    /// Returns immediately with [`Reply::Acknowledge`]. The handle resolves
    /// once the follow-up has been posted, failed, or timed out; dropping it
    /// detaches the task. Must be called from within a Tokio runtime.
    pub fn handle_interactive(
        &self,
        fields: &DecodedFields,
    ) -> (Reply, JoinHandle<Result<(), DeferredError>>) {
        let target = CallbackTarget::from_fields(fields);
        let client = self.client.clone();
        let timeout = self.timeout;

        let task = tokio::spawn(
            async move {
                let result = tokio::time::timeout(timeout, post_follow_up(&client, target))
                    .await
                    .unwrap_or_else(|_| Err(DeferredError::TimedOut(timeout)));

                match &result {
                    Ok(()) => debug!("Deferred response delivered"),
                    Err(e) => warn!(error = %e, "Deferred response not delivered"),
                }

                result
            }
            .instrument(info_span!("deferred_response")),
        );

        (Reply::Acknowledge, task)
    }
}

async fn post_follow_up(
    client: &Client,
    target: Result<CallbackTarget, DeferredError>,
) -> Result<(), DeferredError> {
    let url = target?.url()?;

    let envelope = ResponseBody::text(FOLLOW_UP_TEXT).into_envelope();

    let response = client
        .post(url)
        .json(&envelope)
        .send()
        .await
        .map_err(|e| DeferredError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DeferredError::Status(status.as_u16()));
    }

    Ok(())
}
