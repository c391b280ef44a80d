//! Slack authentication errors.

use thiserror::Error;

/// Reasons a request signature is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The timestamp header is missing or not an integer.
    #[error("Invalid Slack request timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// The request is older than the replay window.
    #[error("Slack request timestamp too old ({age_secs}s)")]
    Expired {
        /// Seconds between the request timestamp and now.
        age_secs: i64,
    },

    /// The signature header does not match the computed signature.
    #[error("Slack signature mismatch")]
    Mismatch,

    /// The signing key could not be used.
    #[error("Slack signing key error: {0}")]
    Key(String),
}
