//! remora: keyword autoresponder core
//!
//! Watches an incoming message stream, classifies each message against a
//! periodically refreshed keyword table, and produces a reply action. The
//! chat transport and the spreadsheet backing the table are external
//! collaborators behind the [`channels::Transport`] and
//! [`source::KeywordSource`] traits.

pub mod channels;
pub mod config;
pub mod logging;
pub mod responder;
pub mod source;
