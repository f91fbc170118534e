//! Cluster output formatter

use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;

use super::common::escape_csv;
use crate::aws::clusters::Cluster;
use crate::aws::traits::EcsResource;
use crate::cli::OutputFormat;

/// Serializable cluster for structured output (JSON/YAML)
#[derive(Serialize)]
struct SerializableCluster {
    name: String,
    status: String,
    region: String,
    current: bool,
}

/// Output clusters in the specified format
///
/// The active selection is marked only when it belongs to the region
/// being browsed.
pub fn output_clusters(
    clusters: &[Cluster],
    active: Option<&str>,
    format: &OutputFormat,
    no_header: bool,
) {
    match format {
        OutputFormat::Table => output_table(clusters, active, no_header),
        OutputFormat::Csv => output_csv(clusters, active, no_header),
        OutputFormat::Json => output_json(clusters, active),
        OutputFormat::Yaml => output_yaml(clusters, active),
    }
}

fn is_active(cluster: &Cluster, active: Option<&str>) -> bool {
    active.is_some_and(|name| cluster.matches(name))
}

fn output_table(clusters: &[Cluster], active: Option<&str>, no_header: bool) {
    let mut table = Table::new();
    table.load_preset(NOTHING);

    if !no_header {
        table.set_header(vec!["Current", "Name", "Status", "Region"]);
    }

    for cluster in clusters {
        let marker = if is_active(cluster, active) { "*" } else { "" };
        table.add_row(vec![
            marker.to_string(),
            cluster.name.clone(),
            cluster.status().to_string(),
            cluster.region().to_string(),
        ]);
    }

    println!();
    println!("{table}");
    if !no_header {
        println!("\nTotal: {} clusters", clusters.len());
    }
}

fn output_csv(clusters: &[Cluster], active: Option<&str>, no_header: bool) {
    if !no_header {
        println!("current,name,status,region");
    }

    for cluster in clusters {
        let marker = if is_active(cluster, active) { "*" } else { "" };
        let fields = [
            marker.to_string(),
            escape_csv(&cluster.name),
            escape_csv(cluster.status()),
            escape_csv(cluster.region()),
        ];
        println!("{}", fields.join(","));
    }
}

fn build_serializable_clusters(
    clusters: &[Cluster],
    active: Option<&str>,
) -> Vec<SerializableCluster> {
    clusters
        .iter()
        .map(|c| SerializableCluster {
            name: c.name.clone(),
            status: c.status().to_string(),
            region: c.region().to_string(),
            current: is_active(c, active),
        })
        .collect()
}

fn output_json(clusters: &[Cluster], active: Option<&str>) {
    let data = build_serializable_clusters(clusters, active);
    println!("{}", serde_json::to_string_pretty(&data).unwrap());
}

fn output_yaml(clusters: &[Cluster], active: Option<&str>) {
    let data = build_serializable_clusters(clusters, active);
    println!("{}", serde_yml::to_string(&data).unwrap());
}
