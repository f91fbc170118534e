//! Get command resource definitions and arguments

use clap::{Parser, Subcommand};

use super::common::OutputFormat;

/// Resource types for the 'get' command
#[derive(Subcommand, Debug)]
pub enum GetResource {
    /// List clusters in a region
    #[command(visible_alias = "cluster")]
    Clusters(ClustersArgs),

    /// List container instances in the active cluster
    #[command(visible_alias = "instances", visible_alias = "instance")]
    Ec2(Ec2Args),

    /// List containers in the active cluster
    #[command(visible_alias = "container")]
    Containers(ContainersArgs),
}

/// Arguments for 'get clusters'
#[derive(Parser, Debug)]
pub struct ClustersArgs {
    /// Region to browse (defaults to the active cluster's region)
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Arguments for 'get ec2'
#[derive(Parser, Debug)]
pub struct Ec2Args {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Arguments for 'get containers'
#[derive(Parser, Debug)]
pub struct ContainersArgs {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_get_clusters_defaults() {
        let cli = Cli::parse_from(["ecsctl", "get", "clusters"]);
        match cli.command {
            Command::Get {
                resource: super::GetResource::Clusters(args),
            } => {
                assert!(args.region.is_none());
                assert_eq!(args.output, super::OutputFormat::Table);
            }
            _ => panic!("Expected get clusters"),
        }
    }

    #[test]
    fn test_get_clusters_with_region_and_output() {
        let cli = Cli::parse_from(["ecsctl", "get", "clusters", "-r", "eu-west-1", "-o", "json"]);
        match cli.command {
            Command::Get {
                resource: super::GetResource::Clusters(args),
            } => {
                assert_eq!(args.region.as_deref(), Some("eu-west-1"));
                assert_eq!(args.output, super::OutputFormat::Json);
            }
            _ => panic!("Expected get clusters"),
        }
    }

    #[test]
    fn test_get_ec2_aliases() {
        for alias in ["ec2", "instances", "instance"] {
            let cli = Cli::parse_from(["ecsctl", "get", alias]);
            assert!(matches!(
                cli.command,
                Command::Get {
                    resource: super::GetResource::Ec2(_)
                }
            ));
        }
    }

    #[test]
    fn test_get_containers_alias() {
        let cli = Cli::parse_from(["ecsctl", "get", "container", "-o", "csv"]);
        match cli.command {
            Command::Get {
                resource: super::GetResource::Containers(args),
            } => {
                assert_eq!(args.output, super::OutputFormat::Csv);
            }
            _ => panic!("Expected get containers"),
        }
    }
}
