//! Context management module
//!
//! Persists the single active cluster selection (cluster name + region)
//! that scopes every browse and exec command.

mod commands;
mod models;
mod resolve;
mod store;

pub use commands::{
    run_clear_context_command, run_current_context_command, run_use_cluster_command,
};
pub use models::{Context, ContextConfig};
pub use resolve::{require_active_context, resolve_region};
pub use store::ContextStore;
