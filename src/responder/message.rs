//! Inbound message and chat context types
//!
//! These are the values the embedding transport hands to the responder for
//! every received message. They are plain data: the responder never talks to
//! the chat network itself.

use std::collections::HashSet;

/// Reserved address used by some chat networks for status/broadcast fan-out.
/// Messages arriving from this address are never answered.
pub const BROADCAST_ADDR: &str = "status@broadcast";

/// A single received message, owned by the caller for the duration of handling.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Message text content
    pub body: String,
    /// Chat/conversation ID the message arrived in
    pub chat_id: String,
    /// Sender ID (the conversation peer)
    pub sender_id: String,
    /// Display name of the sender
    pub sender_name: String,
    /// In group chats, the participant who actually wrote the message
    pub author_id: String,
    /// IDs mentioned in the message body
    pub mentioned_ids: Vec<String>,
    /// Whether the message originates from the bot's own identity
    pub from_me: bool,
}

impl IncomingMessage {
    /// Create a new incoming message
    pub fn new(
        chat_id: impl Into<String>,
        sender_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let sender_id = sender_id.into();
        Self {
            body: body.into(),
            chat_id: chat_id.into(),
            author_id: sender_id.clone(),
            sender_id,
            sender_name: String::new(),
            mentioned_ids: Vec::new(),
            from_me: false,
        }
    }

    /// Set sender display name
    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = name.into();
        self
    }

    /// Set the authoring participant (group messages)
    pub fn with_author_id(mut self, id: impl Into<String>) -> Self {
        self.author_id = id.into();
        self
    }

    /// Set mentioned IDs
    pub fn with_mentions(mut self, ids: Vec<String>) -> Self {
        self.mentioned_ids = ids;
        self
    }

    /// Mark the message as sent by the bot itself
    pub fn from_me(mut self, from_me: bool) -> Self {
        self.from_me = from_me;
        self
    }

    /// Whether the message arrived from the reserved broadcast address
    pub fn is_broadcast(&self) -> bool {
        self.chat_id == BROADCAST_ADDR || self.sender_id == BROADCAST_ADDR
    }

    /// Sender ID with any network suffix stripped (`1234@c.us` -> `1234`),
    /// used as the `{phone}` template value.
    pub fn phone_number(&self) -> &str {
        self.sender_id
            .split_once('@')
            .map(|(number, _)| number)
            .unwrap_or(&self.sender_id)
    }
}

/// Per-message chat metadata supplied by the transport. Read-only to the core.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// Whether this is a multi-party chat
    pub is_group: bool,
    /// Group display name (empty for direct chats)
    pub group_name: String,
    /// Group participants, in the transport's order
    pub participant_ids: Vec<String>,
    /// Group admins
    pub admin_ids: HashSet<String>,
    /// Group IDs the responder is allowed to act in (allow-list policy)
    pub allowed_group_ids: HashSet<String>,
}

impl ChatContext {
    /// Context for a direct (one-to-one) chat
    pub fn direct() -> Self {
        Self::default()
    }

    /// Context for a group chat
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            is_group: true,
            group_name: name.into(),
            ..Self::default()
        }
    }

    /// Set participants
    pub fn with_participants(mut self, ids: Vec<String>) -> Self {
        self.participant_ids = ids;
        self
    }

    /// Set admins
    pub fn with_admins(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.admin_ids = ids.into_iter().collect();
        self
    }

    /// Set the allowed-group IDs
    pub fn with_allowed_groups(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.allowed_group_ids = ids.into_iter().collect();
        self
    }
}
