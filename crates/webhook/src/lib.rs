//! nozomi webhook library.
//!
//! Verifies Slack request signatures, decodes form bodies, routes slash
//! commands to handlers and acknowledges interactive callbacks with a
//! deferred follow-up. Exposed as a library so the binary, the CLI and the
//! integration tests share one pipeline.
//!
//! # Security
//!
//! Every request is authenticated with the Slack signing secret before its
//! body is looked at. Commands are only served to the configured team.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod config;
pub mod deferred;
pub mod error;
pub mod github;
pub mod pipeline;
pub mod routes;
pub mod slack;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the HTTP application: health check, webhook routes and request tracing.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check GitHub or Slack.
async fn health() -> &'static str {
    "ok"
}
