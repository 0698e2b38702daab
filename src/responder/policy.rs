//! Group Policy Gate
//!
//! Decides whether the responder may act at all inside a multi-party chat.
//! Exactly one mode governs each evaluation; when more than one toggle is
//! set the fixed precedence below applies (config validation warns about
//! that, see the config module).

use serde::{Deserialize, Serialize};

use super::message::{ChatContext, IncomingMessage};

/// Group response policy toggles.
///
/// Mirrors the four classic autoresponder switches. Precedence when several
/// are set: mention-only > allow-list > admin-only > respond-to-all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPolicy {
    /// Respond only when the message mentions someone
    #[serde(default)]
    pub mention_only: bool,
    /// Respond only in explicitly allow-listed groups
    #[serde(default)]
    pub allow_list_only: bool,
    /// Respond only to messages written by a group admin
    #[serde(default)]
    pub admin_only: bool,
    /// Respond to every group message
    #[serde(default = "default_true")]
    pub respond_to_all: bool,
    /// Whether the fallback/default reply may be sent inside groups
    #[serde(default)]
    pub send_default_in_groups: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GroupPolicy {
    fn default() -> Self {
        Self {
            mention_only: false,
            allow_list_only: false,
            admin_only: false,
            respond_to_all: true,
            send_default_in_groups: false,
        }
    }
}

/// The single mode governing one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPolicyMode {
    MentionOnly,
    AllowListOnly,
    AdminOnly,
    RespondToAll,
}

impl GroupPolicy {
    /// Resolve the active mode by fixed precedence. `None` when every toggle
    /// is off, which the gate treats as deny-all.
    pub fn mode(&self) -> Option<GroupPolicyMode> {
        if self.mention_only {
            Some(GroupPolicyMode::MentionOnly)
        } else if self.allow_list_only {
            Some(GroupPolicyMode::AllowListOnly)
        } else if self.admin_only {
            Some(GroupPolicyMode::AdminOnly)
        } else if self.respond_to_all {
            Some(GroupPolicyMode::RespondToAll)
        } else {
            None
        }
    }

    /// Number of mode toggles currently set; > 1 means the precedence rule
    /// is silently picking a winner.
    pub fn active_toggles(&self) -> usize {
        [
            self.mention_only,
            self.allow_list_only,
            self.admin_only,
            self.respond_to_all,
        ]
        .iter()
        .filter(|&&on| on)
        .count()
    }
}

/// Pure predicate: may the responder act on this group message?
pub fn allows(chat: &ChatContext, message: &IncomingMessage, policy: &GroupPolicy) -> bool {
    match policy.mode() {
        Some(GroupPolicyMode::MentionOnly) => !message.mentioned_ids.is_empty(),
        // Empty allow-list denies everything; it never falls through to
        // respond-to-all.
        Some(GroupPolicyMode::AllowListOnly) => chat.allowed_group_ids.contains(&message.chat_id),
        Some(GroupPolicyMode::AdminOnly) => chat.admin_ids.contains(&message.author_id),
        Some(GroupPolicyMode::RespondToAll) => true,
        None => false,
    }
}
