//! GitHub issue creation.
//!
//! The command handlers only need one capability from GitHub: "create an
//! issue with this title and body, give me its URL". [`IssueCreator`] is that
//! seam; [`GithubClient`] is the REST implementation used in production.

mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_BASE, GithubClient};
pub use error::GithubError;
pub use types::{CreatedIssue, DEFAULT_REPOSITORY, RepoRef, RepoRefError};

use async_trait::async_trait;

/// Something that can open an issue in a repository.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// concurrently handled requests.
#[async_trait]
pub trait IssueCreator: Send + Sync {
    /// Create an issue and return where it lives.
    ///
    /// # Errors
    ///
    /// Returns error if the issue could not be created.
    async fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> Result<CreatedIssue, GithubError>;
}
