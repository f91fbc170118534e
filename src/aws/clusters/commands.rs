//! Cluster command handlers

use log::debug;

use crate::aws::EcsClient;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::output_clusters;
use crate::ui::{create_spinner, finish_spinner};

/// Run the get clusters command
pub async fn run_clusters_command(
    client: &EcsClient,
    active_cluster: Option<&str>,
    output: &OutputFormat,
    no_header: bool,
    batch: bool,
) -> Result<()> {
    debug!("Fetching clusters in region: {}", client.region());

    let spinner = create_spinner(
        &format!("Fetching clusters in '{}'...", client.region()),
        batch,
    );
    let clusters = client.list_clusters().await?;
    finish_spinner(spinner);

    if clusters.is_empty() {
        eprintln!("No clusters found in region '{}'", client.region());
        return Ok(());
    }

    output_clusters(&clusters, active_cluster, output, no_header);
    Ok(())
}
