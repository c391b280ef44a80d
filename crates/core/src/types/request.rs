//! Inbound webhook request as handed over by the hosting layer.

use core::fmt;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Header carrying the request timestamp (seconds since the Unix epoch).
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

/// Header carrying the `v0=<hex>` request signature.
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// The declared subtype of an inbound request.
///
/// `Select` and unknown subtypes are handled like `Slash`.
///
/// ## Examples
///
/// ```
/// use nozomi_core::RequestKind;
///
/// assert_eq!(RequestKind::parse("interactive"), RequestKind::Interactive);
/// assert_eq!(RequestKind::parse("slash"), RequestKind::Slash);
/// assert_eq!(RequestKind::parse("events"), RequestKind::Other("events".into()));
/// assert!(RequestKind::Interactive.is_interactive());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestKind {
    /// A slash command (`/nozomi ...`).
    #[default]
    Slash,
    /// A select-menu submission.
    Select,
    /// A button click or other interactive component callback.
    Interactive,
    /// Anything else the hosting layer passes through.
    Other(String),
}

impl RequestKind {
    /// Parse a subtype string. Matching is case-sensitive.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "slash" => Self::Slash,
            "select" => Self::Select,
            "interactive" => Self::Interactive,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the subtype as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Slash => "slash",
            Self::Select => "select",
            Self::Interactive => "interactive",
            Self::Other(other) => other,
        }
    }

    /// Whether the request must be answered through the deferred path.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

impl From<String> for RequestKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<RequestKind> for String {
    fn from(kind: RequestKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single inbound webhook request.
///
/// Serializes to the hosting-layer envelope
/// `{"method": ..., "body": ..., "headers": {...}, "type": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InboundRequest {
    /// HTTP method (informational only).
    #[serde(default)]
    pub method: String,
    /// Raw request body, exactly as signed by the sender.
    #[serde(rename = "body", default)]
    pub raw_body: String,
    /// Request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Declared subtype.
    #[serde(rename = "type", default)]
    pub kind: RequestKind,
}

impl InboundRequest {
    /// Create a request with no headers.
    #[must_use]
    pub fn new(method: impl Into<String>, raw_body: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            method: method.into(),
            raw_body: raw_body.into(),
            headers: HashMap::new(),
            kind,
        }
    }

    /// Add a header (builder style).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a header, ignoring ASCII case in the name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// The `X-Slack-Request-Timestamp` header, or `""` when absent.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        self.header(TIMESTAMP_HEADER).unwrap_or_default()
    }

    /// The `X-Slack-Signature` header, or `""` when absent.
    #[must_use]
    pub fn signature(&self) -> &str {
        self.header(SIGNATURE_HEADER).unwrap_or_default()
    }
}
