//! Container instances module - browse a cluster's hosts with derived
//! running task counts

mod api;
mod commands;
mod models;

pub use commands::{attach_running_task_counts, fetch_instances_with_counts, run_ec2_command};
pub use models::Instance;
