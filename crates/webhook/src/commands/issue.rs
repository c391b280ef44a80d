//! `createTestIssue title body...` - opens an issue on GitHub.

use std::sync::Arc;

use async_trait::async_trait;
use nozomi_core::{CommandInvocation, Reply};
use tracing::{info, warn};

use super::CommandHandler;
use crate::github::{IssueCreator, RepoRef};

/// Reply shown when the command is missing its title or body.
pub const CREATE_ISSUE_USAGE: &str = "/nozomi createTestIssue title body";

/// Creates an issue in a fixed repository.
///
/// The first word after the keyword is the title; everything after it is
/// the body. Collaborator failures are reported in the reply, never raised.
#[derive(Clone)]
pub struct CreateIssueCommand {
    creator: Arc<dyn IssueCreator>,
    repository: RepoRef,
}

impl std::fmt::Debug for CreateIssueCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateIssueCommand")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl CreateIssueCommand {
    /// Create the command for a repository.
    #[must_use]
    pub fn new(creator: Arc<dyn IssueCreator>, repository: RepoRef) -> Self {
        Self {
            creator,
            repository,
        }
    }

    /// Handle the text after the keyword.
    pub async fn create_issue(&self, remainder: &str) -> Reply {
        let Some((title, body)) = remainder.split_once(' ') else {
            return Reply::text(CREATE_ISSUE_USAGE);
        };

        match self
            .creator
            .create_issue(&self.repository, title, body)
            .await
        {
            Ok(issue) => {
                info!(repo = %self.repository, url = %issue.html_url, "Created issue from Slack");
                Reply::Text(format!("here! {}", issue.html_url))
            }
            Err(e) => {
                warn!(repo = %self.repository, error = %e, "Issue creation failed");
                Reply::Text(format!("bie: {e}"))
            }
        }
    }
}

#[async_trait]
impl CommandHandler for CreateIssueCommand {
    fn name(&self) -> &str {
        "createTestIssue"
    }

    fn usage(&self) -> &str {
        "createTestIssue title body"
    }

    fn description(&self) -> &str {
        "Open a GitHub issue (the first word is the title)"
    }

    async fn handle(&self, invocation: &CommandInvocation) -> Reply {
        self.create_issue(&invocation.remainder).await
    }
}
