//! Slash command routing.
//!
//! `/nozomi <keyword> <rest>` is routed by its first token to a registered
//! [`CommandHandler`]. New commands are added by registering another handler;
//! nothing else in the router changes. Unknown keywords (including an empty
//! command) get a usage message generated from the registry.

mod builtin;
mod issue;

pub use builtin::{EchoCommand, ShowTestButtonCommand};
pub use issue::{CREATE_ISSUE_USAGE, CreateIssueCommand};

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use nozomi_core::{CommandInvocation, DecodedFields, Reply};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::github::{IssueCreator, RepoRef};

/// The request came from a team that is not allowed to use the webhook.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Team {team_id:?} is not allowed")]
pub struct Unauthorized {
    /// The rejected `team_id`.
    pub team_id: String,
}

/// A command reachable as `/nozomi <name> ...`.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Keyword that selects this handler. Matching is case-sensitive.
    fn name(&self) -> &str;

    /// One-line usage, e.g. `echo text...`.
    fn usage(&self) -> &str;

    /// One-line description for the usage message.
    fn description(&self) -> &str;

    /// Handle the invocation. Handler-level failures are rendered into the reply.
    async fn handle(&self, invocation: &CommandInvocation) -> Reply;
}

/// Keyword → handler table.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in commands.
    #[must_use]
    pub fn builtin(issue_creator: Arc<dyn IssueCreator>, repository: RepoRef) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ShowTestButtonCommand));
        registry.register(Arc::new(CreateIssueCommand::new(issue_creator, repository)));
        registry.register(Arc::new(EchoCommand));
        registry
    }

    /// Register a handler under its name, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> &mut Self {
        self.handlers.insert(handler.name().to_owned(), handler);
        self
    }

    /// Whether a keyword has a handler.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.handlers.contains_key(keyword)
    }

    /// Registered keywords in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Route decoded slash-command fields to a handler.
    ///
    /// The team check runs before the keyword is looked at.
    ///
    /// # Errors
    ///
    /// Returns [`Unauthorized`] when `team_id` differs from `allowed_team_id`.
    #[instrument(skip(self, fields, allowed_team_id))]
    pub async fn dispatch(
        &self,
        fields: &DecodedFields,
        allowed_team_id: &str,
    ) -> Result<Reply, Unauthorized> {
        let invocation = CommandInvocation::from_fields(fields);

        if invocation.team_id != allowed_team_id {
            warn!(team_id = %invocation.team_id, "Rejected command from unallowed team");
            return Err(Unauthorized {
                team_id: invocation.team_id,
            });
        }

        let Some(handler) = self.handlers.get(&invocation.keyword) else {
            debug!(keyword = %invocation.keyword, "Unknown command, showing usage");
            return Ok(Reply::Text(self.usage_message()));
        };

        info!(command = %invocation.keyword, "Dispatching command");
        Ok(handler.handle(&invocation).await)
    }

    /// The fallback reply listing every registered command.
    #[must_use]
    pub fn usage_message(&self) -> String {
        std::iter::once("usage: `/nozomi <command> [args...]`".to_string())
            .chain(
                self.handlers
                    .values()
                    .map(|handler| format!("• `{}` - {}", handler.usage(), handler.description())),
            )
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::github::{CreatedIssue, GithubError};

    struct NeverCalled(AtomicUsize);

    #[async_trait]
    impl IssueCreator for NeverCalled {
        async fn create_issue(
            &self,
            _repo: &RepoRef,
            _title: &str,
            _body: &str,
        ) -> Result<CreatedIssue, GithubError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(GithubError::Request("not expected".to_string()))
        }
    }

    struct PingCommand;

    #[async_trait]
    impl CommandHandler for PingCommand {
        fn name(&self) -> &str {
            "ping"
        }

        fn usage(&self) -> &str {
            "ping"
        }

        fn description(&self) -> &str {
            "Answer pong"
        }

        async fn handle(&self, _invocation: &CommandInvocation) -> Reply {
            Reply::text("pong")
        }
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::builtin(
            Arc::new(NeverCalled(AtomicUsize::new(0))),
            RepoRef::default(),
        )
    }

    fn fields(body: &str) -> DecodedFields {
        DecodedFields::decode(body)
    }

    #[tokio::test]
    async fn test_echo_returns_remainder() {
        let reply = registry()
            .dispatch(&fields("team_id=T1&text=echo+hello+world"), "T1")
            .await
            .expect("allowed");
        assert_eq!(reply, Reply::text("hello world"));
    }

    #[tokio::test]
    async fn test_empty_text_returns_usage() {
        let registry = registry();
        let reply = registry
            .dispatch(&fields("team_id=T1&text="), "T1")
            .await
            .expect("allowed");
        assert_eq!(reply, Reply::Text(registry.usage_message()));
    }

    #[tokio::test]
    async fn test_unknown_keyword_returns_usage() {
        let registry = registry();
        for text in ["text=help", "text=Echo+hi", "text=deleteEverything+now"] {
            let reply = registry
                .dispatch(&fields(&format!("team_id=T1&{text}")), "T1")
                .await
                .expect("allowed");
            assert_eq!(reply, Reply::Text(registry.usage_message()));
        }
    }

    #[tokio::test]
    async fn test_wrong_team_rejected_regardless_of_keyword() {
        let registry = registry();
        for text in ["echo+hi", "showTestButton", "createTestIssue+t+b", ""] {
            let result = registry
                .dispatch(&fields(&format!("team_id=T2&text={text}")), "T1")
                .await;
            assert_eq!(
                result,
                Err(Unauthorized {
                    team_id: "T2".to_string()
                })
            );
        }
    }

    #[tokio::test]
    async fn test_missing_team_rejected() {
        let result = registry().dispatch(&fields("text=echo+hi"), "T1").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_show_test_button() {
        let reply = registry()
            .dispatch(&fields("team_id=T1&text=showTestButton"), "T1")
            .await
            .expect("allowed");
        match reply {
            Reply::Interactive { button, .. } => assert_eq!(button.value, "test"),
            other => panic!("expected interactive reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_registered_command_is_routed_without_touching_others() {
        let mut registry = registry();
        registry.register(Arc::new(PingCommand));

        let reply = registry
            .dispatch(&fields("team_id=T1&text=ping"), "T1")
            .await
            .expect("allowed");
        assert_eq!(reply, Reply::text("pong"));
        assert!(registry.contains("echo"));
        assert!(registry.usage_message().contains("`ping` - Answer pong"));
    }

    #[test]
    fn test_builtin_names_sorted() {
        let names: Vec<_> = registry().names().map(str::to_owned).collect();
        assert_eq!(names, ["createTestIssue", "echo", "showTestButton"]);
    }

    #[test]
    fn test_usage_message_lists_builtin_commands() {
        let usage = registry().usage_message();
        assert!(usage.starts_with("usage:"));
        assert!(usage.contains("`createTestIssue title body`"));
        assert!(usage.contains("`echo text...`"));
        assert!(usage.contains("`showTestButton`"));
    }

    #[test]
    fn test_usage_message_one_line_per_command() {
        let mut registry = CommandRegistry::new();
        assert_eq!(registry.usage_message(), "usage: `/nozomi <command> [args...]`");

        registry.register(Arc::new(PingCommand));
        registry.register(Arc::new(EchoCommand));
        assert_eq!(
            registry.usage_message(),
            "usage: `/nozomi <command> [args...]`\n\
             • `echo text...` - Repeat the text back to the channel\n\
             • `ping` - Answer pong"
        );
    }
}
