//! HTTP route handlers for the webhook.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health         - Liveness check (registered in `app`)
//!
//! # Native Slack delivery (raw form body + real headers)
//! POST /slack/{kind}   - kind = slash | select | interactive
//!
//! # Hosting-layer envelope ({method, body, headers, type} as JSON)
//! POST /invoke         - Returns {"body": <reply>}
//! ```

mod invoke;
mod slack;

use axum::Router;

use crate::state::AppState;

/// All webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(slack::router())
        .merge(invoke::router())
}
