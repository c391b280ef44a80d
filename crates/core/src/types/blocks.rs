//! Slack Block Kit types for rendering replies.
//!
//! These types represent the subset of Slack's Block Kit format that
//! nozomi replies with: section blocks carrying text and an optional
//! button accessory.
//!
//! See: <https://api.slack.com/block-kit>

use serde::Serialize;

/// Who can see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible to everyone in the channel.
    InChannel,
}

/// The body of a reply, as sent back to Slack.
///
/// An empty body (all fields `None`) serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseBody {
    /// Reply visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    /// Message blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    /// Plain text message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ResponseBody {
    /// A body containing only top-level `text`.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Wrap the body in the hosting-layer envelope.
    #[must_use]
    pub const fn into_envelope(self) -> ResponseEnvelope {
        ResponseEnvelope { body: self }
    }
}

/// The hosting-layer envelope: `{"body": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    /// The rendered reply.
    pub body: ResponseBody,
}

/// Block Kit block types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Section block with text and optional accessory.
    Section {
        text: Text,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
}

/// Text object types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    /// Plain text (no formatting).
    PlainText { text: String, emoji: bool },
    /// Markdown text (supports formatting).
    Mrkdwn { text: String },
}

impl Text {
    /// Create a plain text object with emoji rendering enabled.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: true,
        }
    }

    /// Create a markdown text object.
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

/// Accessory elements for section blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    /// Button accessory.
    Button { text: Text, value: String },
}
