//! Integration tests for nozomi.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nozomi-integration-tests
//! ```
//!
//! No network access is needed: GitHub and Slack callback URLs are served
//! by `httpmock` on localhost.
//!
//! # Test Categories
//!
//! - `pipeline` - Signed requests through [`Webhook::handle_at`]
//! - `http` - The axum routes, driven with `tower::ServiceExt::oneshot`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use nozomi_core::{InboundRequest, RequestKind, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use nozomi_webhook::commands::CommandRegistry;
use nozomi_webhook::deferred::DeferredResponder;
use nozomi_webhook::github::{GithubClient, RepoRef};
use nozomi_webhook::pipeline::Webhook;
use nozomi_webhook::slack::SignatureVerifier;
use secrecy::SecretString;

/// Signing secret shared by every test webhook.
pub const SIGNING_SECRET: &str = "integration-signing-secret";

/// Team allowed to run commands.
pub const TEAM_ID: &str = "T0NOZOMI";

/// Fixed "current time" for deterministic signature checks.
pub const NOW: i64 = 1_700_000_000;

/// Build a webhook whose GitHub client points at `github_base`.
///
/// # Panics
///
/// Panics if an HTTP client cannot be built.
#[must_use]
pub fn webhook(github_base: &str) -> Webhook {
    let github = GithubClient::new(
        github_base,
        SecretString::from("ghp_integration".to_string()),
        Duration::from_secs(5),
    )
    .expect("github client");

    Webhook::new(
        verifier(),
        TEAM_ID,
        CommandRegistry::builtin(Arc::new(github), RepoRef::default()),
        DeferredResponder::new(Duration::from_secs(5)).expect("deferred responder"),
    )
}

fn verifier() -> SignatureVerifier {
    SignatureVerifier::new(SecretString::from(SIGNING_SECRET.to_string()))
}

/// Sign `body` at `timestamp`, returning the `X-Slack-Signature` value.
///
/// # Panics
///
/// Panics if signing fails.
#[must_use]
pub fn sign(body: &str, timestamp: i64) -> String {
    verifier()
        .sign(&timestamp.to_string(), body)
        .expect("sign")
}

/// Build a correctly signed request.
#[must_use]
pub fn signed_request(kind: RequestKind, body: &str, timestamp: i64) -> InboundRequest {
    InboundRequest::new("POST", body, kind)
        .with_header(TIMESTAMP_HEADER, timestamp.to_string())
        .with_header(SIGNATURE_HEADER, sign(body, timestamp))
}

/// Poll `condition` until it holds or `limit` elapses.
pub async fn eventually(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
