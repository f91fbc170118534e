//! ecsctl - Browse ECS clusters and open sessions to their instances
//!
//! A kubectl-style CLI for Amazon ECS: select a cluster once, then
//! browse its container instances and containers, or open an
//! interactive session to an instance through the session broker.
//!
//! # Example
//!
//! ```bash
//! # List clusters in a region
//! ecsctl get clusters -r eu-west-1
//!
//! # Select the active cluster
//! ecsctl use-cluster prod -r eu-west-1
//!
//! # Browse the active cluster
//! ecsctl get ec2
//! ecsctl get containers -o json
//!
//! # Open a session to one of its instances
//! ecsctl exec i-0aaa111bbb222ccc3
//! ```

pub mod aws;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod session;
pub mod ui;

pub use aws::{
    run_clusters_command, run_containers_command, run_ec2_command, CredentialsResolver, EcsClient,
};
pub use cli::{Cli, Command, GetResource, OutputFormat};
pub use context::{
    require_active_context, resolve_region, run_clear_context_command,
    run_current_context_command, run_use_cluster_command, Context, ContextConfig, ContextStore,
};
pub use error::{EcsError, Result};
pub use output::{output_clusters, output_containers, output_instances};
pub use session::{run_exec_command, BrokerSession, RemoteSession, SessionBroker, SessionState, SsmSessionBroker};
