//! GitHub-related errors.

use thiserror::Error;

/// Errors that can occur when talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// HTTP request failed.
    #[error("GitHub request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("GitHub response error: {0}")]
    Response(String),

    /// GitHub returned a non-success status.
    #[error("GitHub API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Client could not be constructed.
    #[error("GitHub configuration error: {0}")]
    Config(String),
}
