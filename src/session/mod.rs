//! Remote interactive sessions
//!
//! Browsing is read-only; this module is the one place that reaches
//! into a live instance. It negotiates a channel with the session
//! broker and delegates the byte stream to the external tunnel plugin.

mod broker;
mod commands;
mod manager;

pub use broker::{BrokerSession, SessionBroker, SsmSessionBroker};
pub use commands::run_exec_command;
pub use manager::{RemoteSession, SessionState};
