//! Reply Resolver
//!
//! The decision core: turns (keyword table snapshot, incoming message, chat
//! context) into an outcome. Pure over its inputs; the caller turns a
//! non-suppressed outcome into an actual send.

use super::message::{ChatContext, IncomingMessage};
use super::policy::{self, GroupPolicy};
use super::table::{normalize, KeywordTable};

/// Result of resolving one incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A keyword matched; carries the reply template
    Matched(String),
    /// No keyword matched; carries the configured default reply
    DefaultSent(String),
    /// No reply should be sent
    Suppressed(SuppressReason),
}

/// Why a message produced no reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// The group policy gate denied the message
    NotInGroupScope,
    /// Nothing matched and no default reply applies
    NoMatchNoDefault,
    /// Message came from the bot itself or a broadcast address
    SelfOrBroadcast,
}

/// Resolve a single message against a table snapshot.
///
/// Match order is exact first, then the first entry (in the table's
/// insertion order) whose keyword is a substring of the normalized body.
/// The first-match tie-break is deliberate and order-sensitive: sources
/// that need precedence must order their rows.
pub fn resolve(
    message: &IncomingMessage,
    chat: &ChatContext,
    table: &KeywordTable,
    policy: &GroupPolicy,
    default_reply: Option<&str>,
) -> ReplyOutcome {
    if message.from_me || message.is_broadcast() {
        return ReplyOutcome::Suppressed(SuppressReason::SelfOrBroadcast);
    }

    // Gate before any lookup: a denied group message never touches the table.
    if chat.is_group && !policy::allows(chat, message, policy) {
        return ReplyOutcome::Suppressed(SuppressReason::NotInGroupScope);
    }

    let body = normalize(&message.body, table.case_sensitive());

    // Exact match always wins over partial, regardless of iteration order.
    if let Some(reply) = table.lookup(&body) {
        return ReplyOutcome::Matched(reply.to_string());
    }

    for (keyword, reply) in table.entries() {
        if body.contains(keyword) {
            return ReplyOutcome::Matched(reply.to_string());
        }
    }

    if let Some(default) = default_reply {
        if !chat.is_group || policy.send_default_in_groups {
            return ReplyOutcome::DefaultSent(default.to_string());
        }
    }

    ReplyOutcome::Suppressed(SuppressReason::NoMatchNoDefault)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> KeywordTable {
        KeywordTable::rebuild(
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
            false,
            false,
        )
    }

    fn direct_msg(body: &str) -> IncomingMessage {
        IncomingMessage::new("123@c.us", "456@c.us", body)
    }

    #[test]
    fn test_exact_match_wins_over_partial() {
        let table = table(&[("h", "partial"), ("hi", "exact")]);
        let outcome = resolve(
            &direct_msg("hi"),
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            None,
        );
        assert_eq!(outcome, ReplyOutcome::Matched("exact".to_string()));
    }

    #[test]
    fn test_partial_match_first_in_order_wins() {
        let table = table(&[("cat", "cat reply"), ("category", "category reply")]);
        let outcome = resolve(
            &direct_msg("category sale"),
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            None,
        );
        assert_eq!(outcome, ReplyOutcome::Matched("cat reply".to_string()));
    }

    #[test]
    fn test_case_insensitive_partial() {
        let table = table(&[("Hello", "hi there")]);
        let outcome = resolve(
            &direct_msg("hello there"),
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            None,
        );
        assert_eq!(outcome, ReplyOutcome::Matched("hi there".to_string()));
    }

    #[test]
    fn test_self_message_suppressed() {
        let table = table(&[("hi", "hello")]);
        let msg = direct_msg("hi").from_me(true);
        let outcome = resolve(
            &msg,
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            Some("default"),
        );
        assert_eq!(
            outcome,
            ReplyOutcome::Suppressed(SuppressReason::SelfOrBroadcast)
        );
    }

    #[test]
    fn test_broadcast_suppressed() {
        let table = table(&[("hi", "hello")]);
        let msg = IncomingMessage::new(super::super::message::BROADCAST_ADDR, "456@c.us", "hi");
        let outcome = resolve(
            &msg,
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            Some("default"),
        );
        assert_eq!(
            outcome,
            ReplyOutcome::Suppressed(SuppressReason::SelfOrBroadcast)
        );
    }

    #[test]
    fn test_group_gate_denial_skips_lookup() {
        let table = table(&[("hi", "hello")]);
        let policy = GroupPolicy {
            mention_only: true,
            ..GroupPolicy::default()
        };
        let outcome = resolve(
            &IncomingMessage::new("g1@g.us", "456@c.us", "hi"),
            &ChatContext::group("g"),
            &table,
            &policy,
            Some("default"),
        );
        assert_eq!(
            outcome,
            ReplyOutcome::Suppressed(SuppressReason::NotInGroupScope)
        );
    }

    #[test]
    fn test_default_reply_in_direct_chat() {
        let table = table(&[("hi", "hello")]);
        let outcome = resolve(
            &direct_msg("no keywords here at all"),
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            Some("Sorry, I did not get that"),
        );
        assert_eq!(
            outcome,
            ReplyOutcome::DefaultSent("Sorry, I did not get that".to_string())
        );
    }

    #[test]
    fn test_default_reply_suppressed_in_groups_by_default() {
        let table = table(&[("hi", "hello")]);
        let outcome = resolve(
            &IncomingMessage::new("g1@g.us", "456@c.us", "no keywords here"),
            &ChatContext::group("g"),
            &table,
            &GroupPolicy::default(),
            Some("default"),
        );
        assert_eq!(
            outcome,
            ReplyOutcome::Suppressed(SuppressReason::NoMatchNoDefault)
        );
    }

    #[test]
    fn test_default_reply_in_group_when_enabled() {
        let table = table(&[("hi", "hello")]);
        let policy = GroupPolicy {
            send_default_in_groups: true,
            ..GroupPolicy::default()
        };
        let outcome = resolve(
            &IncomingMessage::new("g1@g.us", "456@c.us", "no keywords here"),
            &ChatContext::group("g"),
            &table,
            &policy,
            Some("default"),
        );
        assert_eq!(outcome, ReplyOutcome::DefaultSent("default".to_string()));
    }

    #[test]
    fn test_no_match_no_default() {
        let table = table(&[("hi", "hello")]);
        let outcome = resolve(
            &direct_msg("nothing relevant"),
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            None,
        );
        assert_eq!(
            outcome,
            ReplyOutcome::Suppressed(SuppressReason::NoMatchNoDefault)
        );
    }

    #[test]
    fn test_body_normalized_before_matching() {
        let table = table(&[("hours", "9 to 5")]);
        let outcome = resolve(
            &direct_msg("  HOURS  "),
            &ChatContext::direct(),
            &table,
            &GroupPolicy::default(),
            None,
        );
        assert_eq!(outcome, ReplyOutcome::Matched("9 to 5".to_string()));
    }
}
