//! GitHub request and response types.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Repository issues are filed against unless configured otherwise.
pub const DEFAULT_REPOSITORY: &str = "kmc-jp/test-repository";

/// Errors that can occur when parsing a [`RepoRef`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoRefError {
    /// The input is not of the form `owner/name`.
    #[error("repository must be of the form owner/name (got {0:?})")]
    Malformed(String),
}

/// An `owner/name` repository reference.
///
/// ## Examples
///
/// ```
/// use nozomi_webhook::github::RepoRef;
///
/// let repo: RepoRef = "kmc-jp/test-repository".parse().unwrap();
/// assert_eq!(repo.owner, "kmc-jp");
/// assert_eq!(repo.name, "test-repository");
/// assert!("no-slash".parse::<RepoRef>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Account or organization login.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl Default for RepoRef {
    fn default() -> Self {
        Self::new("kmc-jp", "test-repository")
    }
}

impl FromStr for RepoRef {
    type Err = RepoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RepoRefError::Malformed(s.to_owned());
        let (owner, name) = s.trim().split_once('/').ok_or_else(malformed)?;

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(malformed());
        }

        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An issue that was just created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    /// Issue number within the repository.
    pub number: u64,
    /// Browser URL of the issue.
    pub html_url: String,
}

/// Request body for `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Serialize)]
pub(super) struct CreateIssueRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// Error body returned by the GitHub API.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_repository_matches_constant() {
        assert_eq!(RepoRef::default().to_string(), DEFAULT_REPOSITORY);
        assert_eq!(DEFAULT_REPOSITORY.parse::<RepoRef>(), Ok(RepoRef::default()));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "owner", "/name", "owner/", "a/b/c"] {
            assert!(input.parse::<RepoRef>().is_err(), "{input:?} accepted");
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let repo: RepoRef = " kmc-jp/nozomi \n".parse().expect("valid");
        assert_eq!(repo, RepoRef::new("kmc-jp", "nozomi"));
    }
}
