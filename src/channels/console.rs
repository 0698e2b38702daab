//! Console channel
//!
//! Reads messages from stdin and prints replies to stdout, one line per
//! message. Lets the binary exercise the whole resolve pipeline without a
//! chat network attached. Lines starting with `!` are administrative
//! commands instead of messages (`!add`, `!list`, `!stats`, `!allow`,
//! `!deny`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

use super::{SendError, Transport};
use crate::responder::{AllowAction, ChatContext, IncomingMessage, ReplyOutcome, Responder};

const CONSOLE_CHAT_ID: &str = "console";
const CONSOLE_SENDER_ID: &str = "operator@console";

/// Interactive stdin/stdout channel
pub struct ConsoleChannel {
    responder: Arc<Responder>,
}

impl ConsoleChannel {
    /// Create a console channel over the given responder
    pub fn new(responder: Arc<Responder>) -> Self {
        Self { responder }
    }

    /// Read lines until EOF or cancellation, resolving each as a direct-chat
    /// message and printing the reply.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), SendError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        let chat = ChatContext::direct();

        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                line = lines.next_line() => line.map_err(|e| SendError::Failed(e.to_string()))?,
            };
            let Some(line) = line else {
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            if let Some(output) = self.handle_command(line.trim()) {
                self.send(CONSOLE_CHAT_ID, &output).await?;
                continue;
            }

            let message = IncomingMessage::new(CONSOLE_CHAT_ID, CONSOLE_SENDER_ID, line)
                .with_sender_name("operator");

            match self.responder.handle(&message, &chat) {
                ReplyOutcome::Matched(text) | ReplyOutcome::DefaultSent(text) => {
                    self.send(CONSOLE_CHAT_ID, &text).await?;
                }
                ReplyOutcome::Suppressed(reason) => {
                    tracing::debug!(?reason, "message suppressed");
                }
            }
        }
    }

    /// Handle an administrative `!` command. Returns the output to print,
    /// or `None` if the line is a regular message.
    fn handle_command(&self, line: &str) -> Option<String> {
        let rest = line.strip_prefix('!')?;
        let (command, args) = match rest.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (rest, ""),
        };

        let output = match command {
            "add" => match args.split_once('|') {
                Some((keyword, reply)) if !keyword.trim().is_empty() && !reply.trim().is_empty() => {
                    self.responder.add_response(keyword.trim(), reply.trim());
                    format!("added: {}", keyword.trim())
                }
                _ => "usage: !add <keyword> | <reply>".to_string(),
            },
            "list" => {
                let entries = self.responder.list_responses();
                if entries.is_empty() {
                    "no responses configured".to_string()
                } else {
                    entries
                        .iter()
                        .map(|(k, v)| format!("{} -> {}", k, v))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            "stats" => serde_json::to_string(&self.responder.stats())
                .unwrap_or_else(|e| format!("stats unavailable: {}", e)),
            "allow" if !args.is_empty() => {
                self.responder.set_allowed_group(args, AllowAction::Add);
                format!("allowed group: {}", args)
            }
            "deny" if !args.is_empty() => {
                self.responder.set_allowed_group(args, AllowAction::Remove);
                format!("denied group: {}", args)
            }
            _ => "commands: !add <keyword> | <reply>, !list, !stats, !allow <id>, !deny <id>"
                .to_string(),
        };

        Some(output)
    }
}

#[async_trait]
impl Transport for ConsoleChannel {
    async fn send(&self, _chat_id: &str, text: &str) -> Result<(), SendError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{}\n", text).as_bytes())
            .await
            .map_err(|e| SendError::Failed(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| SendError::Failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ResponderSettings;

    #[tokio::test]
    async fn test_send_writes_without_error() {
        let responder = Arc::new(Responder::new(ResponderSettings::default()));
        let channel = ConsoleChannel::new(responder);
        channel.send("console", "pong").await.unwrap();
    }

    #[test]
    fn test_regular_lines_are_not_commands() {
        let responder = Arc::new(Responder::new(ResponderSettings::default()));
        let channel = ConsoleChannel::new(responder);
        assert_eq!(channel.handle_command("hello there"), None);
    }

    #[test]
    fn test_add_and_list_commands() {
        let responder = Arc::new(Responder::new(ResponderSettings::default()));
        let channel = ConsoleChannel::new(responder.clone());

        let out = channel.handle_command("!add hours | Open 9-5").unwrap();
        assert_eq!(out, "added: hours");
        assert_eq!(responder.table().lookup("hours"), Some("Open 9-5"));

        let out = channel.handle_command("!list").unwrap();
        assert_eq!(out, "hours -> Open 9-5");
    }

    #[test]
    fn test_add_rejects_missing_reply() {
        let responder = Arc::new(Responder::new(ResponderSettings::default()));
        let channel = ConsoleChannel::new(responder.clone());

        let out = channel.handle_command("!add hours").unwrap();
        assert!(out.starts_with("usage:"));
        assert!(responder.table().is_empty());
    }

    #[test]
    fn test_stats_command_is_json() {
        let responder = Arc::new(Responder::new(ResponderSettings::default()));
        responder.add_response("hi", "hello");
        let channel = ConsoleChannel::new(responder);

        let out = channel.handle_command("!stats").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["entryCount"], 1);
    }

    #[test]
    fn test_allow_and_deny_commands() {
        let responder = Arc::new(Responder::new(ResponderSettings::default()));
        let channel = ConsoleChannel::new(responder.clone());

        channel.handle_command("!allow g1@g.us").unwrap();
        assert!(responder.allowed_groups().contains("g1@g.us"));

        channel.handle_command("!deny g1@g.us").unwrap();
        assert!(!responder.allowed_groups().contains("g1@g.us"));
    }

    #[tokio::test]
    async fn test_run_stops_on_cancellation() {
        let responder = Arc::new(Responder::new(ResponderSettings::default()));
        let channel = ConsoleChannel::new(responder);

        let cancel = CancellationToken::new();
        cancel.cancel();
        // Already-cancelled token returns immediately without reading stdin.
        channel.run(cancel).await.unwrap();
    }
}
