//! CLI argument parsing

mod common;
mod get;

use clap::{Parser, Subcommand};

use crate::config::{credentials, defaults};

pub use common::OutputFormat;
pub use get::{ClustersArgs, ContainersArgs, Ec2Args, GetResource};

/// ECS cluster browser and remote access CLI
#[derive(Parser, Debug)]
#[command(name = "ecsctl")]
#[command(version)]
#[command(about = "Browse ECS clusters and open sessions to their instances", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Batch mode: no spinners, no prompts
    #[arg(short, long, global = true, default_value_t = false)]
    pub batch: bool,

    /// Omit headers and summary lines from table/CSV output
    #[arg(long, global = true, default_value_t = false)]
    pub no_header: bool,

    /// Credentials profile from ~/.aws/credentials
    #[arg(short, long, global = true, env = credentials::PROFILE_ENV)]
    pub profile: Option<String>,

    /// Session token (overrides env vars and the credentials file)
    #[arg(short, long, global = true)]
    pub token: Option<String>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse resources
    Get {
        #[command(subcommand)]
        resource: GetResource,
    },

    /// Select the active cluster
    #[command(name = "use-cluster")]
    UseCluster(UseClusterArgs),

    /// Show the active cluster selection
    #[command(name = "current-context")]
    CurrentContext,

    /// Clear the active cluster selection
    #[command(name = "clear-context")]
    ClearContext,

    /// Open an interactive session to an instance in the active cluster
    Exec(ExecArgs),
}

/// Arguments for 'use-cluster'
#[derive(Parser, Debug)]
pub struct UseClusterArgs {
    /// Cluster name or ARN
    pub name: String,

    /// Region the cluster lives in (defaults to AWS_REGION)
    #[arg(short = 'r', long)]
    pub region: Option<String>,
}

/// Arguments for 'exec'
#[derive(Parser, Debug)]
pub struct ExecArgs {
    /// EC2 instance id to connect to (must be in the active cluster)
    pub instance_id: String,

    /// Region override for the session broker
    #[arg(short = 'r', long)]
    pub region: Option<String>,
}
