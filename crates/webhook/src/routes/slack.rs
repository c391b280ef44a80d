//! Slack webhook handler for slash commands and interactions.
//!
//! Slack posts form-encoded bodies signed with the app's signing secret.
//! The body is passed through untouched so the signature can be checked
//! against the exact bytes that were sent.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::post,
};
use nozomi_core::{InboundRequest, RequestKind, ResponseBody};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::state::AppState;

/// Create Slack webhook routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/slack/{kind}", post(handle_slack))
}

/// Handle a Slack delivery of the given kind.
#[instrument(skip(state, headers, body))]
async fn handle_slack(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ResponseBody>, AppError> {
    let request = inbound_request(RequestKind::parse(&kind), &headers, body);

    let reply = state.webhook().handle(&request).await?;

    debug!(kind = ?reply.kind(), "Slack request handled");

    Ok(Json(reply.render()))
}

/// Copy the HTTP request into the pipeline's request shape.
///
/// Header values that are not visible ASCII are dropped.
fn inbound_request(kind: RequestKind, headers: &HeaderMap, body: String) -> InboundRequest {
    let mut request = InboundRequest::new("POST", body, kind);
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request
                .headers
                .insert(name.as_str().to_owned(), value.to_owned());
        }
    }
    request
}
