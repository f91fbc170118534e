//! Container command handlers

use log::debug;

use crate::aws::EcsClient;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::output_containers;
use crate::ui::{create_spinner, finish_spinner};

use super::models::Container;

/// Sort newest first; ties break by container id so ordering is stable
pub fn sort_containers(containers: &mut [Container]) {
    containers.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Run the get containers command
pub async fn run_containers_command(
    client: &EcsClient,
    cluster: &str,
    output: &OutputFormat,
    no_header: bool,
    batch: bool,
) -> Result<()> {
    debug!("Fetching containers for cluster: {}", cluster);

    let spinner = create_spinner(&format!("Fetching containers in '{}'...", cluster), batch);
    let mut containers = client.list_containers(cluster).await?;
    finish_spinner(spinner);

    if containers.is_empty() {
        eprintln!("No containers found in cluster '{}'", cluster);
        return Ok(());
    }

    sort_containers(&mut containers);
    output_containers(&containers, output, no_header);
    Ok(())
}
