//! Container output formatter

use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;

use super::common::escape_csv;
use crate::aws::containers::Container;
use crate::cli::OutputFormat;

/// Serializable container for structured output (JSON/YAML)
#[derive(Serialize)]
struct SerializableContainer {
    id: String,
    name: String,
    status: String,
    task_id: String,
    cpu: String,
    memory: String,
    created_at: String,
    instance: String,
}

impl From<&Container> for SerializableContainer {
    fn from(container: &Container) -> Self {
        SerializableContainer {
            id: container.id.clone(),
            name: container.name.clone(),
            status: container.status.clone(),
            task_id: container.task_id.clone(),
            cpu: container.cpu().to_string(),
            memory: container.memory().to_string(),
            created_at: format_created_at(container),
            instance: container.host_instance_id.clone(),
        }
    }
}

fn format_created_at(container: &Container) -> String {
    container.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Output containers in the specified format
pub fn output_containers(containers: &[Container], format: &OutputFormat, no_header: bool) {
    match format {
        OutputFormat::Table => output_table(containers, no_header),
        OutputFormat::Csv => output_csv(containers, no_header),
        OutputFormat::Json => output_json(containers),
        OutputFormat::Yaml => output_yaml(containers),
    }
}

fn output_table(containers: &[Container], no_header: bool) {
    let mut table = Table::new();
    table.load_preset(NOTHING);

    if !no_header {
        table.set_header(vec![
            "Container ID",
            "Name",
            "Status",
            "Task ID",
            "CPU",
            "Memory",
            "Created",
            "Instance",
        ]);
    }

    for container in containers {
        table.add_row(vec![
            container.id.clone(),
            container.name.clone(),
            container.status.clone(),
            container.task_id.clone(),
            container.cpu().to_string(),
            container.memory().to_string(),
            format_created_at(container),
            container.host_instance_id.clone(),
        ]);
    }

    println!();
    println!("{table}");
    if !no_header {
        println!("\nTotal: {} containers", containers.len());
    }
}

fn output_csv(containers: &[Container], no_header: bool) {
    if !no_header {
        println!("id,name,status,task_id,cpu,memory,created_at,instance");
    }

    for container in containers {
        let fields = [
            escape_csv(&container.id),
            escape_csv(&container.name),
            escape_csv(&container.status),
            escape_csv(&container.task_id),
            escape_csv(container.cpu()),
            escape_csv(container.memory()),
            format_created_at(container),
            escape_csv(&container.host_instance_id),
        ];
        println!("{}", fields.join(","));
    }
}

fn output_json(containers: &[Container]) {
    let data: Vec<SerializableContainer> =
        containers.iter().map(SerializableContainer::from).collect();
    println!("{}", serde_json::to_string_pretty(&data).unwrap());
}

fn output_yaml(containers: &[Container]) {
    let data: Vec<SerializableContainer> =
        containers.iter().map(SerializableContainer::from).collect();
    println!("{}", serde_yml::to_string(&data).unwrap());
}
