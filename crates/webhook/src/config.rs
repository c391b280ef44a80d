//! Webhook configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SLACK_SIGNING_SECRET` - Slack app signing secret
//! - `SLACK_ALLOWED_TEAM_ID` - The only Slack team (workspace) allowed to run commands
//! - `GITHUB_TOKEN` - GitHub access token with the `repo` scope
//!
//! ## Optional
//! - `NOZOMI_HOST` - Bind address (default: 127.0.0.1)
//! - `NOZOMI_PORT` - Listen port (default: 3000)
//! - `GITHUB_API_BASE` - GitHub REST API base URL (default: <https://api.github.com>)
//! - `GITHUB_REPOSITORY` - `owner/name` issues are filed against (default: kmc-jp/test-repository)
//! - `GITHUB_TIMEOUT_SECS` - Timeout for GitHub API calls (default: 10)
//! - `DEFERRED_TIMEOUT_SECS` - Timeout for deferred `response_url` posts (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate, 0.0 to 1.0 (default: 0.0)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::github::{DEFAULT_API_BASE, DEFAULT_REPOSITORY, RepoRef};

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const DEFAULT_TIMEOUT_SECS: &str = "10";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Webhook application configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Slack request verification and team allowlist
    pub slack: SlackConfig,
    /// GitHub issue creation
    pub github: GithubConfig,
    /// Bound on each deferred `response_url` post
    pub deferred_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
}

/// Slack configuration.
///
/// Implements `Debug` manually to redact the signing secret.
#[derive(Clone)]
pub struct SlackConfig {
    /// Slack app signing secret for request verification.
    pub signing_secret: SecretString,
    /// The single team ID allowed to run commands.
    pub allowed_team_id: String,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("signing_secret", &"[REDACTED]")
            .field("allowed_team_id", &self.allowed_team_id)
            .finish()
    }
}

/// GitHub API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct GithubConfig {
    /// Access token (scope: `repo`).
    pub token: SecretString,
    /// REST API base URL.
    pub api_base: String,
    /// Repository issues are created in.
    pub repository: RepoRef,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("repository", &self.repository)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WebhookConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or values are invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource)
    }

    /// Load configuration from a key/value map instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or values are invalid.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_source(vars)
    }

    fn from_source(source: &impl Source) -> Result<Self, ConfigError> {
        let host = parse_env(source, "NOZOMI_HOST", "127.0.0.1")?;
        let port = parse_env(source, "NOZOMI_PORT", "3000")?;

        Ok(Self {
            host,
            port,
            slack: SlackConfig::from_source(source)?,
            github: GithubConfig::from_source(source)?,
            deferred_timeout: parse_secs(source, "DEFERRED_TIMEOUT_SECS")?,
            sentry_dsn: source.get("SENTRY_DSN"),
            sentry_environment: source.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(source, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env(source, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
            json_logs: source
                .get("LOG_FORMAT")
                .is_some_and(|format| format.eq_ignore_ascii_case("json")),
        })
    }

    /// Get the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SlackConfig {
    fn from_source(source: &impl Source) -> Result<Self, ConfigError> {
        let signing_secret = get_required(source, "SLACK_SIGNING_SECRET")?;
        warn_if_weak(&signing_secret, "SLACK_SIGNING_SECRET");

        Ok(Self {
            signing_secret: SecretString::from(signing_secret),
            allowed_team_id: get_required(source, "SLACK_ALLOWED_TEAM_ID")?,
        })
    }
}

impl GithubConfig {
    fn from_source(source: &impl Source) -> Result<Self, ConfigError> {
        let token = get_required(source, "GITHUB_TOKEN")?;
        warn_if_weak(&token, "GITHUB_TOKEN");

        Ok(Self {
            token: SecretString::from(token),
            api_base: get_or_default(source, "GITHUB_API_BASE", DEFAULT_API_BASE),
            repository: parse_env(source, "GITHUB_REPOSITORY", DEFAULT_REPOSITORY)?,
            timeout: parse_secs(source, "GITHUB_TIMEOUT_SECS")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Where configuration values come from.
trait Source {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
struct EnvSource;

impl Source for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Source for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Get a required, non-empty variable.
fn get_required(source: &impl Source, key: &str) -> Result<String, ConfigError> {
    source
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default(source: &impl Source, key: &str, default: &str) -> String {
    source.get(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to a default string.
fn parse_env<T>(source: &impl Source, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_or_default(source, key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a whole number of seconds; zero is rejected.
fn parse_secs(source: &impl Source, key: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_env(source, key, DEFAULT_TIMEOUT_SECS)?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Log a warning if a secret looks like a placeholder.
fn warn_if_weak(secret: &str, var_name: &str) {
    if let Err(e) = validate_secret_strength(secret, var_name) {
        tracing::warn!("{var_name} validation warning: {e}");
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn required() -> HashMap<String, String> {
        vars(&[
            ("SLACK_SIGNING_SECRET", "8f742231b10e8888abcd99yyyzzz85a5"),
            ("SLACK_ALLOWED_TEAM_ID", "T0123ABC"),
            ("GITHUB_TOKEN", "ghp_R4nd0mT0k3nV4lu3F0rT3st1ng"),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::from_map(&required()).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.slack.allowed_team_id, "T0123ABC");
        assert_eq!(config.github.api_base, DEFAULT_API_BASE);
        assert_eq!(config.github.repository, RepoRef::default());
        assert_eq!(config.github.timeout, Duration::from_secs(10));
        assert_eq!(config.deferred_timeout, Duration::from_secs(10));
        assert!(config.sentry_dsn.is_none());
        assert!(!config.json_logs);
    }

    #[test]
    fn test_overrides() {
        let mut env = required();
        env.extend(vars(&[
            ("NOZOMI_HOST", "0.0.0.0"),
            ("NOZOMI_PORT", "8080"),
            ("GITHUB_REPOSITORY", "kmc-jp/nozomi"),
            ("GITHUB_API_BASE", "http://127.0.0.1:9000"),
            ("DEFERRED_TIMEOUT_SECS", "3"),
            ("LOG_FORMAT", "JSON"),
        ]));

        let config = WebhookConfig::from_map(&env).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.github.repository, RepoRef::new("kmc-jp", "nozomi"));
        assert_eq!(config.github.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.deferred_timeout, Duration::from_secs(3));
        assert!(config.json_logs);
    }

    #[test]
    fn test_missing_required() {
        for key in ["SLACK_SIGNING_SECRET", "SLACK_ALLOWED_TEAM_ID", "GITHUB_TOKEN"] {
            let mut vars = required();
            vars.remove(key);
            let err = WebhookConfig::from_map(&vars).unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == key));
        }
    }

    #[test]
    fn test_blank_required_is_missing() {
        let mut vars = required();
        vars.insert("SLACK_ALLOWED_TEAM_ID".to_string(), "  ".to_string());
        let err = WebhookConfig::from_map(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("NOZOMI_PORT", "not-a-port"),
            ("NOZOMI_HOST", "localhost:80"),
            ("GITHUB_REPOSITORY", "no-slash"),
            ("DEFERRED_TIMEOUT_SECS", "0"),
            ("GITHUB_TIMEOUT_SECS", "-1"),
        ] {
            let mut vars = required();
            vars.insert(key.to_string(), value.to_string());
            let err = WebhookConfig::from_map(&vars).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == key),
                "{key}={value} accepted"
            );
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-signing-secret", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let err = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("8f742231b10e8888abcd99yyyzzz85a5", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = WebhookConfig::from_map(&required()).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("T0123ABC"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("8f742231b10e8888abcd99yyyzzz85a5"));
        assert!(!debug_output.contains("ghp_R4nd0mT0k3nV4lu3F0rT3st1ng"));
    }
}
