//! Chat transports
//!
//! The outbound side of the boundary: the core produces a [`ReplyOutcome`]
//! and a transport delivers it. Send failures are recoverable and never
//! touch responder state.
//!
//! [`ReplyOutcome`]: crate::responder::ReplyOutcome

pub mod console;

pub use console::ConsoleChannel;

use async_trait::async_trait;

/// Errors delivering a reply. Surfaced to the embedding caller; partially
/// completed sends may be dropped on shutdown (best-effort delivery).
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("transport not connected")]
    NotConnected,

    #[error("send failed: {0}")]
    Failed(String),
}

/// Outbound message delivery
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `text` to the given chat
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), SendError>;
}
