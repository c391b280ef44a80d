//! The per-request pipeline: verify → decode → route or defer.

use std::sync::Arc;

use nozomi_core::{DecodedFields, InboundRequest, Reply};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::commands::{CommandRegistry, Unauthorized};
use crate::config::WebhookConfig;
use crate::deferred::{DeferredError, DeferredResponder};
use crate::github::{GithubClient, GithubError};
use crate::slack::{SignatureError, SignatureVerifier};

/// Failures that reject a request outright.
///
/// Everything else (bad arguments, GitHub errors, undeliverable follow-ups)
/// is turned into a chat message or a log line instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The request signature is missing, stale or forged.
    #[error("Authentication failed: {0}")]
    Authentication(#[from] SignatureError),

    /// The request came from a team that is not allowed.
    #[error("Authorization failed: {0}")]
    Authorization(#[from] Unauthorized),
}

/// Failures while assembling the webhook at startup.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The GitHub client could not be created.
    #[error(transparent)]
    Github(#[from] GithubError),

    /// The deferred responder's HTTP client could not be created.
    #[error(transparent)]
    Deferred(#[from] DeferredError),
}

/// The webhook entry point.
///
/// Built once at startup from configuration and shared read-only by all
/// requests.
#[derive(Debug, Clone)]
pub struct Webhook {
    verifier: SignatureVerifier,
    allowed_team_id: String,
    commands: CommandRegistry,
    deferred: DeferredResponder,
}

impl Webhook {
    /// Assemble a webhook from its parts.
    #[must_use]
    pub fn new(
        verifier: SignatureVerifier,
        allowed_team_id: impl Into<String>,
        commands: CommandRegistry,
        deferred: DeferredResponder,
    ) -> Self {
        Self {
            verifier,
            allowed_team_id: allowed_team_id.into(),
            commands,
            deferred,
        }
    }

    /// Build the production webhook: built-in commands backed by the GitHub API.
    ///
    /// # Errors
    ///
    /// Returns error if the GitHub or callback HTTP client cannot be created.
    pub fn from_config(config: &WebhookConfig) -> Result<Self, BuildError> {
        let github = GithubClient::new(
            config.github.api_base.clone(),
            config.github.token.clone(),
            config.github.timeout,
        )?;

        Ok(Self::new(
            SignatureVerifier::new(config.slack.signing_secret.clone()),
            config.slack.allowed_team_id.clone(),
            CommandRegistry::builtin(Arc::new(github), config.github.repository.clone()),
            DeferredResponder::new(config.deferred_timeout)?,
        ))
    }

    /// Get the command registry.
    #[must_use]
    pub const fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Handle a request using the current wall-clock time.
    ///
    /// # Errors
    ///
    /// See [`Webhook::handle_at`].
    pub async fn handle(&self, request: &InboundRequest) -> Result<Reply, PipelineError> {
        self.handle_at(request, chrono::Utc::now().timestamp()).await
    }

    /// Handle a request as if the current time were `now` (Unix seconds).
    ///
    /// Interactive requests are acknowledged immediately and their follow-up
    /// is posted in the background; everything else goes to the command
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Authentication`] if the signature check fails
    /// and [`PipelineError::Authorization`] if a command comes from another team.
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn handle_at(
        &self,
        request: &InboundRequest,
        now: i64,
    ) -> Result<Reply, PipelineError> {
        self.verifier
            .verify(
                request.timestamp(),
                &request.raw_body,
                request.signature(),
                now,
            )
            .inspect_err(|e| warn!(error = %e, "Rejected unauthenticated request"))?;

        let fields = DecodedFields::decode(&request.raw_body);

        if request.kind.is_interactive() {
            // Detached: the follow-up reports its own outcome.
            let (reply, _follow_up) = self.deferred.handle_interactive(&fields);
            return Ok(reply);
        }

        Ok(self.commands.dispatch(&fields, &self.allowed_team_id).await?)
    }
}
