//! GitHub REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use super::IssueCreator;
use super::error::GithubError;
use super::types::{ApiErrorBody, CreateIssueRequest, CreatedIssue, RepoRef};

/// GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub REST API version header value.
const API_VERSION: &str = "2022-11-28";

/// GitHub API client authenticated with a personal access token.
#[derive(Clone)]
pub struct GithubClient {
    /// HTTP client with GitHub default headers.
    client: Client,
    /// API base URL without a trailing slash.
    api_base: String,
    /// Access token (needs the `repo` scope to open issues).
    token: SecretString,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_base", &self.api_base)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Create a new GitHub client.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        token: SecretString,
        timeout: Duration,
    ) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("nozomi-webhook"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| GithubError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl IssueCreator for GithubClient {
    #[instrument(skip(self, body), fields(repo = %repo))]
    async fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> Result<CreatedIssue, GithubError> {
        let response = self
            .client
            .post(format!(
                "{}/repos/{}/{}/issues",
                self.api_base, repo.owner, repo.name
            ))
            .bearer_auth(self.token.expose_secret())
            .json(&CreateIssueRequest { title, body })
            .send()
            .await
            .map_err(|e| GithubError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);

            error!(status = status.as_u16(), message = %message, "GitHub API error creating issue");

            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let issue: CreatedIssue = response
            .json()
            .await
            .map_err(|e| GithubError::Response(e.to_string()))?;

        debug!(number = issue.number, url = %issue.html_url, "Issue created");

        Ok(issue)
    }
}
