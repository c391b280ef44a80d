//! Commands that need nothing but the invocation itself.

use async_trait::async_trait;
use nozomi_core::{Button, CommandInvocation, Reply};

use super::CommandHandler;

/// `echo text...` - repeats the rest of the command verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn usage(&self) -> &str {
        "echo text..."
    }

    fn description(&self) -> &str {
        "Repeat the text back to the channel"
    }

    async fn handle(&self, invocation: &CommandInvocation) -> Reply {
        Reply::text(invocation.remainder.as_str())
    }
}

/// `showTestButton` - posts a button whose click is answered asynchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowTestButtonCommand;

#[async_trait]
impl CommandHandler for ShowTestButtonCommand {
    fn name(&self) -> &str {
        "showTestButton"
    }

    fn usage(&self) -> &str {
        "showTestButton"
    }

    fn description(&self) -> &str {
        "Show a button that answers through the deferred callback"
    }

    async fn handle(&self, _invocation: &CommandInvocation) -> Reply {
        Reply::Interactive {
            text: "piyopioyo".to_string(),
            button: Button {
                label: "push!".to_string(),
                value: "test".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(keyword: &str, remainder: &str) -> CommandInvocation {
        CommandInvocation {
            keyword: keyword.to_string(),
            remainder: remainder.to_string(),
            team_id: "T1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_echo_is_verbatim() {
        let reply = EchoCommand
            .handle(&invocation("echo", "*bold*  two  spaces"))
            .await;
        assert_eq!(reply, Reply::text("*bold*  two  spaces"));
    }

    #[tokio::test]
    async fn test_echo_without_text_is_empty() {
        let reply = EchoCommand.handle(&invocation("echo", "")).await;
        assert_eq!(reply, Reply::text(""));
    }

    #[tokio::test]
    async fn test_show_test_button_payload() {
        let reply = ShowTestButtonCommand
            .handle(&invocation("showTestButton", "ignored"))
            .await;
        let value = serde_json::to_value(reply.render()).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "response_type": "in_channel",
                "blocks": [{
                    "type": "section",
                    "text": {"type": "mrkdwn", "text": "piyopioyo"},
                    "accessory": {
                        "type": "button",
                        "text": {"type": "plain_text", "text": "push!", "emoji": true},
                        "value": "test"
                    }
                }]
            })
        );
    }
}
