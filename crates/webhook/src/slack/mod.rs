//! Slack request authentication.
//!
//! Every request Slack sends carries an `X-Slack-Request-Timestamp` and an
//! `X-Slack-Signature` header. [`SignatureVerifier`] recomputes the signature
//! from the shared signing secret and rejects stale or forged requests before
//! any field of the body is trusted.
//!
//! See: <https://api.slack.com/authentication/verifying-requests-from-slack>

mod error;
mod signature;

pub use error::SignatureError;
pub use signature::{REPLAY_WINDOW_SECS, SignatureVerifier, verify};
