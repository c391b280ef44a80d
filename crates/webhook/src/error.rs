//! Unified error handling for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::pipeline::PipelineError;

/// Application-level error type for webhook routes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request signature missing, stale or forged.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request from a team that may not use the webhook.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Authentication(e) => Self::Unauthorized(e.to_string()),
            PipelineError::Authorization(e) => Self::Forbidden(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't tell a caller why its signature or team was rejected
        let message = match &self {
            Self::Unauthorized(_) => "Unauthorized".to_string(),
            Self::Forbidden(_) => "Forbidden".to_string(),
            Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Unauthorized;
    use crate::slack::SignatureError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid envelope".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid envelope");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_pipeline_errors_map_to_auth_statuses() {
        let authn = AppError::from(PipelineError::Authentication(SignatureError::Mismatch));
        assert_eq!(get_status(authn), StatusCode::UNAUTHORIZED);

        let authz = AppError::from(PipelineError::Authorization(Unauthorized {
            team_id: "T9".to_string(),
        }));
        assert_eq!(get_status(authz), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_pipeline_rejections_are_client_errors_without_detail() {
        let errors = [
            PipelineError::Authentication(SignatureError::Expired { age_secs: 900 }),
            PipelineError::Authorization(Unauthorized {
                team_id: "T9".to_string(),
            }),
        ];

        for err in errors {
            let response = AppError::from(err).into_response();
            assert!(response.status().is_client_error());

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body");
            let body = String::from_utf8_lossy(&body);
            assert!(!body.contains("900"));
            assert!(!body.contains("T9"));
        }
    }
}
