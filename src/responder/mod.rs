//! Reply-resolution engine
//!
//! Matches incoming messages against a periodically refreshed keyword table
//! and produces reply actions. The resolver, gate, and expander are pure;
//! all shared state lives in the [`Responder`] engine, which publishes the
//! table as immutable `Arc` snapshots.

pub mod engine;
pub mod message;
pub mod policy;
pub mod refresh;
pub mod resolver;
pub mod table;
pub mod template;

pub use engine::{AllowAction, Responder, ResponderSettings, ResponderStats};
pub use message::{ChatContext, IncomingMessage, BROADCAST_ADDR};
pub use policy::{allows, GroupPolicy, GroupPolicyMode};
pub use refresh::RefreshScheduler;
pub use resolver::{resolve, ReplyOutcome, SuppressReason};
pub use table::{normalize, KeywordTable};
pub use template::{expand, TemplateContext};
