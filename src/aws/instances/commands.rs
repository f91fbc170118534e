//! Container instance command handlers
//!
//! `get ec2` joins two independent listings: the cluster's container
//! instances and its containers. The per-instance running task count is
//! always derived from that join.

use log::debug;
use std::collections::HashMap;

use crate::aws::containers::Container;
use crate::aws::EcsClient;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::output_instances;
use crate::ui::{create_spinner, finish_spinner};

use super::models::Instance;

/// Fill each instance's running task count by grouping containers on the
/// instance they run on
///
/// Instances with no matching containers end at zero. The result does not
/// depend on the order of either input.
pub fn attach_running_task_counts(instances: &mut [Instance], containers: &[Container]) {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for container in containers {
        if container.is_running() {
            *counts.entry(container.host_instance_id.as_str()).or_insert(0) += 1;
        }
    }

    for instance in instances.iter_mut() {
        instance.running_task_count = counts.get(instance.id.as_str()).copied().unwrap_or(0);
    }
}

/// Fetch instances and containers together and derive running task counts
///
/// The two listings are independent and run concurrently. If either one
/// fails the whole operation fails; a listing with a silently wrong count
/// is worse than an error.
pub async fn fetch_instances_with_counts(
    client: &EcsClient,
    cluster: &str,
) -> Result<Vec<Instance>> {
    let (instances, containers) = tokio::join!(
        client.list_instances(cluster),
        client.list_containers(cluster)
    );
    let mut instances = instances?;
    let containers = containers?;

    attach_running_task_counts(&mut instances, &containers);
    Ok(instances)
}

/// Run the get ec2 command
pub async fn run_ec2_command(
    client: &EcsClient,
    cluster: &str,
    output: &OutputFormat,
    no_header: bool,
    batch: bool,
) -> Result<()> {
    debug!("Fetching instances for cluster: {}", cluster);

    let spinner = create_spinner(&format!("Fetching instances in '{}'...", cluster), batch);
    let instances = fetch_instances_with_counts(client, cluster).await?;
    finish_spinner(spinner);

    if instances.is_empty() {
        eprintln!("No container instances found in cluster '{}'", cluster);
        return Ok(());
    }

    output_instances(&instances, output, no_header);
    Ok(())
}
