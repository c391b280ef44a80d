//! Request signing for manual testing.
//!
//! # Environment Variables
//!
//! - `SLACK_SIGNING_SECRET` - Secret shared with the webhook

use nozomi_core::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use nozomi_webhook::slack::{SignatureError, SignatureVerifier};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while signing.
#[derive(Debug, Error)]
pub enum SignError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The signature could not be computed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Read the signing secret from the environment.
///
/// # Errors
///
/// Returns error if `SLACK_SIGNING_SECRET` is unset or blank.
pub fn secret_from_env() -> Result<SecretString, SignError> {
    std::env::var("SLACK_SIGNING_SECRET")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(SecretString::from)
        .ok_or(SignError::MissingEnvVar("SLACK_SIGNING_SECRET"))
}

/// Render the two Slack headers for `body` signed at `timestamp`, one per line.
///
/// # Errors
///
/// Returns error if the HMAC cannot be keyed.
pub fn signed_headers(
    secret: &SecretString,
    body: &str,
    timestamp: i64,
) -> Result<String, SignError> {
    let timestamp = timestamp.to_string();
    let signature = SignatureVerifier::new(secret.clone()).sign(&timestamp, body)?;

    tracing::debug!(bytes = body.len(), "Signed request body");

    Ok(format!(
        "{TIMESTAMP_HEADER}: {timestamp}\n{SIGNATURE_HEADER}: {signature}"
    ))
}
