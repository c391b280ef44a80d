//! Handler replies and their Block Kit rendering.

use super::blocks::{Accessory, Block, ResponseBody, ResponseType, Text};

/// How a reply reaches the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The reply is the synchronous response body.
    Immediate,
    /// The synchronous response is empty; content follows via a callback URL.
    Deferred,
}

/// A button rendered as a section accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Button label.
    pub label: String,
    /// Value sent back when the button is clicked.
    pub value: String,
}

/// The result of handling one request.
///
/// Each variant has exactly one rendering, so a reply can never carry both a
/// text body and an unrelated set of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A markdown message visible to the whole channel.
    Text(String),
    /// A markdown message with a button accessory.
    Interactive {
        /// Section text.
        text: String,
        /// The button shown beside the text.
        button: Button,
    },
    /// An empty acknowledgement; the real answer is posted later.
    Acknowledge,
}

impl Reply {
    /// Create a text reply.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// How this reply is delivered.
    #[must_use]
    pub const fn kind(&self) -> ResponseKind {
        match self {
            Self::Text(_) | Self::Interactive { .. } => ResponseKind::Immediate,
            Self::Acknowledge => ResponseKind::Deferred,
        }
    }

    /// The visible text of the reply, if any.
    #[must_use]
    pub fn visible_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Interactive { text, .. } => Some(text),
            Self::Acknowledge => None,
        }
    }

    /// Render the reply as a Slack response body.
    #[must_use]
    pub fn render(&self) -> ResponseBody {
        match self {
            Self::Text(text) => in_channel(Block::Section {
                text: Text::mrkdwn(text.as_str()),
                accessory: None,
            }),
            Self::Interactive { text, button } => in_channel(Block::Section {
                text: Text::mrkdwn(text.as_str()),
                accessory: Some(Accessory::Button {
                    text: Text::plain(button.label.as_str()),
                    value: button.value.clone(),
                }),
            }),
            Self::Acknowledge => ResponseBody::default(),
        }
    }
}

fn in_channel(block: Block) -> ResponseBody {
    ResponseBody {
        response_type: Some(ResponseType::InChannel),
        blocks: Some(vec![block]),
        text: None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_reply_renders_single_mrkdwn_section() {
        let value = serde_json::to_value(Reply::text("hello world").render()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "response_type": "in_channel",
                "blocks": [{"type": "section", "text": {"type": "mrkdwn", "text": "hello world"}}]
            })
        );
    }

    #[test]
    fn test_interactive_reply_renders_button() {
        let reply = Reply::Interactive {
            text: "piyopioyo".to_string(),
            button: Button {
                label: "push!".to_string(),
                value: "test".to_string(),
            },
        };

        let value = serde_json::to_value(reply.render()).expect("serialize");
        assert_eq!(value["response_type"], "in_channel");
        assert_eq!(value["blocks"][0]["accessory"]["type"], "button");
        assert_eq!(value["blocks"][0]["accessory"]["value"], "test");
        assert_eq!(value["blocks"][0]["accessory"]["text"]["emoji"], true);
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_acknowledge_is_deferred_and_empty() {
        assert_eq!(Reply::Acknowledge.kind(), ResponseKind::Deferred);
        assert_eq!(Reply::Acknowledge.visible_text(), None);
        let value = serde_json::to_value(Reply::Acknowledge.render()).expect("serialize");
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_text_reply_is_immediate() {
        let reply = Reply::text("usage");
        assert_eq!(reply.kind(), ResponseKind::Immediate);
        assert_eq!(reply.visible_text(), Some("usage"));
    }
}
