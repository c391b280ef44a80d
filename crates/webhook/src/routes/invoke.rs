//! Hosting-layer envelope handler.
//!
//! Function runtimes and API gateways hand the webhook a JSON envelope
//! `{"method", "body", "headers", "type"}` and expect `{"body": ...}` back.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use nozomi_core::{InboundRequest, ResponseEnvelope};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Create the envelope route.
pub fn router() -> Router<AppState> {
    Router::new().route("/invoke", post(invoke))
}

/// Handle one enveloped request.
#[instrument(skip(state, payload))]
async fn invoke(
    State(state): State<AppState>,
    payload: Result<Json<InboundRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let reply = state.webhook().handle(&request).await?;

    Ok(Json(reply.render().into_envelope()))
}
