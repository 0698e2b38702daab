//! Responder engine
//!
//! Owns the shared state around the pure resolver: the current keyword
//! table snapshot, the runtime group allow-list, and refresh bookkeeping.
//! Exposes the administrative surface for the embedding application.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::message::{ChatContext, IncomingMessage};
use super::policy::GroupPolicy;
use super::resolver::{self, ReplyOutcome};
use super::table::KeywordTable;
use super::template::{self, TemplateContext};

/// Immutable responder settings, read once at startup
#[derive(Debug, Clone, Default)]
pub struct ResponderSettings {
    /// Skip the first source row on rebuilds
    pub has_header: bool,
    /// Match keywords without case folding
    pub case_sensitive: bool,
    /// Fallback reply when nothing matches
    pub default_reply: Option<String>,
    /// Group response policy
    pub policy: GroupPolicy,
    /// Initially allow-listed group IDs
    pub allowed_group_ids: Vec<String>,
}

/// Allow-list mutation for [`Responder::set_allowed_group`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowAction {
    Add,
    Remove,
}

/// Counters exposed for introspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponderStats {
    /// Entries in the current table
    pub entry_count: usize,
    /// When the last table install happened
    pub last_refresh: Option<DateTime<Utc>>,
}

/// The autoresponder engine.
///
/// Lookups read an `Arc` snapshot of the table and never block on a rebuild;
/// refreshes build a complete new table aside and swap it in one step.
#[derive(Debug)]
pub struct Responder {
    table: RwLock<Arc<KeywordTable>>,
    allowed_groups: RwLock<HashSet<String>>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
    policy: GroupPolicy,
    default_reply: Option<String>,
    has_header: bool,
    case_sensitive: bool,
}

impl Responder {
    /// Create a responder with an empty table
    pub fn new(settings: ResponderSettings) -> Self {
        Self {
            table: RwLock::new(Arc::new(KeywordTable::empty(settings.case_sensitive))),
            allowed_groups: RwLock::new(settings.allowed_group_ids.into_iter().collect()),
            last_refresh: RwLock::new(None),
            policy: settings.policy,
            default_reply: settings.default_reply,
            has_header: settings.has_header,
            case_sensitive: settings.case_sensitive,
        }
    }

    /// Snapshot of the current table
    pub fn table(&self) -> Arc<KeywordTable> {
        self.table.read().clone()
    }

    /// Rebuild from source rows and atomically install the result.
    /// In-flight lookups keep their old snapshot.
    pub fn install_rows(&self, rows: Vec<(String, String)>) {
        let table = Arc::new(KeywordTable::rebuild(
            rows,
            self.has_header,
            self.case_sensitive,
        ));
        let count = table.len();
        *self.table.write() = table;
        *self.last_refresh.write() = Some(Utc::now());
        tracing::debug!(entries = count, "keyword table installed");
    }

    /// Resolve one incoming message and expand the reply template.
    pub fn handle(&self, message: &IncomingMessage, chat: &ChatContext) -> ReplyOutcome {
        let table = self.table();

        // The transport's allow-list and the runtime one (set_allowed_group)
        // are unioned, so either side can grant access.
        let runtime_allowed = self.allowed_groups.read();
        let effective_chat;
        let chat = if runtime_allowed.is_empty() {
            chat
        } else {
            let mut merged = chat.clone();
            merged
                .allowed_group_ids
                .extend(runtime_allowed.iter().cloned());
            effective_chat = merged;
            &effective_chat
        };
        drop(runtime_allowed);

        let outcome = resolver::resolve(
            message,
            chat,
            &table,
            &self.policy,
            self.default_reply.as_deref(),
        );

        match outcome {
            ReplyOutcome::Matched(tpl) => {
                let ctx = TemplateContext::from_message(message, chat, Local::now());
                ReplyOutcome::Matched(template::expand(&tpl, &ctx))
            }
            ReplyOutcome::DefaultSent(tpl) => {
                let ctx = TemplateContext::from_message(message, chat, Local::now());
                ReplyOutcome::DefaultSent(template::expand(&tpl, &ctx))
            }
            suppressed => suppressed,
        }
    }

    /// Manual single-entry upsert, bypassing the refresh cycle. Built as a
    /// rebuild-plus-swap so readers keep the same atomicity guarantee.
    pub fn add_response(&self, keyword: impl Into<String>, reply: impl Into<String>) {
        let mut guard = self.table.write();
        let mut rows: Vec<(String, String)> = guard
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        rows.push((keyword.into(), reply.into()));
        *guard = Arc::new(KeywordTable::rebuild(rows, false, self.case_sensitive));
    }

    /// All current keyword/reply pairs in table order
    pub fn list_responses(&self) -> Vec<(String, String)> {
        self.table()
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Entry count and last refresh timestamp
    pub fn stats(&self) -> ResponderStats {
        ResponderStats {
            entry_count: self.table().len(),
            last_refresh: *self.last_refresh.read(),
        }
    }

    /// Add or remove a group ID from the runtime allow-list
    pub fn set_allowed_group(&self, group_id: impl Into<String>, action: AllowAction) {
        let group_id = group_id.into();
        let mut allowed = self.allowed_groups.write();
        match action {
            AllowAction::Add => {
                allowed.insert(group_id);
            }
            AllowAction::Remove => {
                allowed.remove(&group_id);
            }
        }
    }

    /// Current runtime allow-list
    pub fn allowed_groups(&self) -> HashSet<String> {
        self.allowed_groups.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::resolver::SuppressReason;

    fn responder() -> Responder {
        Responder::new(ResponderSettings {
            has_header: false,
            ..ResponderSettings::default()
        })
    }

    fn rows(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_add_response_then_case_insensitive_lookup() {
        let r = responder();
        r.add_response("Bye", "See ya");
        assert_eq!(r.table().lookup("bye"), Some("See ya"));
    }

    #[test]
    fn test_add_response_upserts() {
        let r = responder();
        r.install_rows(rows(&[("hi", "old"), ("bye", "later")]));
        r.add_response("HI", "new");

        let listed = r.list_responses();
        assert_eq!(listed.len(), 2);
        assert_eq!(r.table().lookup("hi"), Some("new"));
    }

    #[test]
    fn test_stats_track_refresh() {
        let r = responder();
        assert_eq!(
            r.stats(),
            ResponderStats {
                entry_count: 0,
                last_refresh: None
            }
        );

        r.install_rows(rows(&[("hi", "hello"), ("bye", "later")]));
        let stats = r.stats();
        assert_eq!(stats.entry_count, 2);
        assert!(stats.last_refresh.is_some());
    }

    #[test]
    fn test_install_does_not_disturb_existing_snapshot() {
        let r = responder();
        r.install_rows(rows(&[("hi", "old")]));

        let before = r.table();
        r.install_rows(rows(&[("hi", "new"), ("bye", "later")]));

        // The earlier snapshot still serves the fully-old table.
        assert_eq!(before.lookup("hi"), Some("old"));
        assert_eq!(before.lookup("bye"), None);
        assert_eq!(r.table().lookup("hi"), Some("new"));
    }

    #[test]
    fn test_handle_expands_template() {
        let r = responder();
        r.install_rows(rows(&[("hi", "hello {name}")]));

        let msg = IncomingMessage::new("1@c.us", "2@c.us", "hi").with_sender_name("Ann");
        let outcome = r.handle(&msg, &ChatContext::direct());
        assert_eq!(outcome, ReplyOutcome::Matched("hello Ann".to_string()));
    }

    #[test]
    fn test_set_allowed_group_feeds_gate() {
        let r = Responder::new(ResponderSettings {
            policy: GroupPolicy {
                allow_list_only: true,
                ..GroupPolicy::default()
            },
            ..ResponderSettings::default()
        });
        r.install_rows(rows(&[("hi", "hello")]));

        let msg = IncomingMessage::new("g1@g.us", "2@c.us", "hi");
        let chat = ChatContext::group("g");

        assert_eq!(
            r.handle(&msg, &chat),
            ReplyOutcome::Suppressed(SuppressReason::NotInGroupScope)
        );

        r.set_allowed_group("g1@g.us", AllowAction::Add);
        assert_eq!(
            r.handle(&msg, &chat),
            ReplyOutcome::Matched("hello".to_string())
        );

        r.set_allowed_group("g1@g.us", AllowAction::Remove);
        assert_eq!(
            r.handle(&msg, &chat),
            ReplyOutcome::Suppressed(SuppressReason::NotInGroupScope)
        );
    }

    #[test]
    fn test_default_reply_through_handle() {
        let r = Responder::new(ResponderSettings {
            default_reply: Some("Ask me about {group}".to_string()),
            ..ResponderSettings::default()
        });

        let msg = IncomingMessage::new("1@c.us", "2@c.us", "unknown text");
        let outcome = r.handle(&msg, &ChatContext::direct());
        assert_eq!(outcome, ReplyOutcome::DefaultSent("Ask me about ".to_string()));
    }
}
