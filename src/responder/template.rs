//! Reply template expansion
//!
//! Replaces the fixed placeholder set in reply templates with per-message
//! values. Placeholder tokens never contain each other as substrings, so
//! the substitution order cannot change the result.

use chrono::{DateTime, Local};

use super::message::{ChatContext, IncomingMessage};

/// Per-message values available to reply templates
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// `{name}`: sender display name
    pub display_name: String,
    /// `{time}`: current local time, HH:MM
    pub now_time: String,
    /// `{date}`: current local date, YYYY-MM-DD
    pub now_date: String,
    /// `{phone}`: sender phone number (ID without network suffix)
    pub phone_number: String,
    /// `{message}`: the incoming message body
    pub message_body: String,
    /// `{group}`: group name, empty in direct chats
    pub group_name: String,
    /// `{memberCount}`: number of group participants
    pub member_count: usize,
}

impl TemplateContext {
    /// Build the context for one message at the given instant.
    pub fn from_message(
        message: &IncomingMessage,
        chat: &ChatContext,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            display_name: message.sender_name.clone(),
            now_time: now.format("%H:%M").to_string(),
            now_date: now.format("%Y-%m-%d").to_string(),
            phone_number: message.phone_number().to_string(),
            message_body: message.body.clone(),
            group_name: chat.group_name.clone(),
            member_count: chat.participant_ids.len(),
        }
    }
}

/// Expand every recognized placeholder in `template`. Unrecognized
/// placeholder-like text is left untouched. Identity on templates without
/// any `{`.
pub fn expand(template: &str, ctx: &TemplateContext) -> String {
    if !template.contains('{') {
        return template.to_string();
    }

    let member_count = ctx.member_count.to_string();
    let substitutions: [(&str, &str); 7] = [
        ("{name}", &ctx.display_name),
        ("{time}", &ctx.now_time),
        ("{date}", &ctx.now_date),
        ("{phone}", &ctx.phone_number),
        ("{message}", &ctx.message_body),
        ("{group}", &ctx.group_name),
        ("{memberCount}", &member_count),
    ];

    let mut result = template.to_string();
    for (token, value) in substitutions {
        result = result.replace(token, value);
    }
    result
}
