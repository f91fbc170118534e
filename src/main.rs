//! ecsctl - ECS cluster browser and remote access CLI

use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use ecsctl::aws::{
    run_clusters_command, run_containers_command, run_ec2_command, CredentialsResolver, EcsClient,
};
use ecsctl::cli::{Cli, Command, GetResource};
use ecsctl::context::{
    require_active_context, resolve_region, run_clear_context_command,
    run_current_context_command, run_use_cluster_command, ContextStore,
};
use ecsctl::error::Result;
use ecsctl::session::{run_exec_command, SsmSessionBroker};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting ecsctl v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let store = ContextStore::new();

    match &cli.command {
        Command::Get { resource } => match resource {
            GetResource::Clusters(args) => {
                let config = store.load()?;
                let region = resolve_region(args.region.as_deref(), config.current.as_ref());
                let client = build_client(cli, &region)?;

                // Mark the active selection only when browsing its region
                let active = config
                    .current
                    .as_ref()
                    .filter(|ctx| ctx.region == region)
                    .map(|ctx| ctx.cluster.as_str());

                run_clusters_command(&client, active, &args.output, cli.no_header, cli.batch)
                    .await?;
            }
            GetResource::Ec2(args) => {
                let config = store.load()?;
                let ctx = require_active_context(&config)?;
                let client = build_client(cli, &ctx.region)?;
                run_ec2_command(&client, &ctx.cluster, &args.output, cli.no_header, cli.batch)
                    .await?;
            }
            GetResource::Containers(args) => {
                let config = store.load()?;
                let ctx = require_active_context(&config)?;
                let client = build_client(cli, &ctx.region)?;
                run_containers_command(
                    &client,
                    &ctx.cluster,
                    &args.output,
                    cli.no_header,
                    cli.batch,
                )
                .await?;
            }
        },
        Command::UseCluster(args) => {
            let config = store.load()?;
            let region = resolve_region(args.region.as_deref(), config.current.as_ref());
            let client = build_client(cli, &region)?;
            run_use_cluster_command(&client, &store, &args.name, &region, cli.batch).await?;
        }
        Command::CurrentContext => {
            run_current_context_command(&store)?;
        }
        Command::ClearContext => {
            run_clear_context_command(&store)?;
        }
        Command::Exec(args) => {
            let config = store.load()?;
            let ctx = require_active_context(&config)?;
            let region = resolve_region(args.region.as_deref(), config.current.as_ref());

            // One resolved credential serves both the inventory lookup
            // and the broker negotiation.
            let token = resolve_token(cli)?;
            let client = EcsClient::new(token.clone(), region.clone());
            let broker = SsmSessionBroker::new(token, region.clone());

            let code = run_exec_command(
                &client,
                &broker,
                &ctx.cluster,
                &args.instance_id,
                &region,
                cli.profile.as_deref(),
                cli.batch,
            )
            .await?;
            return Ok(ExitCode::from(code));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn resolve_token(cli: &Cli) -> Result<String> {
    let resolver = CredentialsResolver::new(cli.profile.as_deref(), cli.batch);
    resolver.resolve(cli.token.as_deref())
}

fn build_client(cli: &Cli, region: &str) -> Result<EcsClient> {
    let token = resolve_token(cli)?;
    debug!("Building API client for region {}", region);
    Ok(EcsClient::new(token, region.to_string()))
}
