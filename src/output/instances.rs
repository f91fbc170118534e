//! Container instance output formatter

use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;

use super::common::escape_csv;
use crate::aws::instances::Instance;
use crate::cli::OutputFormat;

/// Serializable instance for structured output (JSON/YAML)
#[derive(Serialize)]
struct SerializableInstance {
    id: String,
    instance_type: String,
    state: String,
    private_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_ip: Option<String>,
    running_tasks: u32,
}

impl From<&Instance> for SerializableInstance {
    fn from(instance: &Instance) -> Self {
        SerializableInstance {
            id: instance.id.clone(),
            instance_type: instance.instance_type().to_string(),
            state: instance.state().to_string(),
            private_ip: instance.private_ip().to_string(),
            public_ip: instance.public_ip.clone(),
            running_tasks: instance.running_task_count,
        }
    }
}

/// Output container instances in the specified format
pub fn output_instances(instances: &[Instance], format: &OutputFormat, no_header: bool) {
    match format {
        OutputFormat::Table => output_table(instances, no_header),
        OutputFormat::Csv => output_csv(instances, no_header),
        OutputFormat::Json => output_json(instances),
        OutputFormat::Yaml => output_yaml(instances),
    }
}

fn output_table(instances: &[Instance], no_header: bool) {
    let mut table = Table::new();
    table.load_preset(NOTHING);

    if !no_header {
        table.set_header(vec![
            "Instance ID",
            "Type",
            "State",
            "Private IP",
            "Public IP",
            "Running Tasks",
        ]);
    }

    for instance in instances {
        table.add_row(vec![
            instance.id.clone(),
            instance.instance_type().to_string(),
            instance.state().to_string(),
            instance.private_ip().to_string(),
            instance.public_ip().to_string(),
            instance.running_task_count.to_string(),
        ]);
    }

    println!();
    println!("{table}");
    if !no_header {
        println!("\nTotal: {} container instances", instances.len());
    }
}

fn output_csv(instances: &[Instance], no_header: bool) {
    if !no_header {
        println!("id,instance_type,state,private_ip,public_ip,running_tasks");
    }

    for instance in instances {
        let fields = [
            escape_csv(&instance.id),
            escape_csv(instance.instance_type()),
            escape_csv(instance.state()),
            escape_csv(instance.private_ip()),
            escape_csv(instance.public_ip()),
            instance.running_task_count.to_string(),
        ];
        println!("{}", fields.join(","));
    }
}

fn output_json(instances: &[Instance]) {
    let data: Vec<SerializableInstance> =
        instances.iter().map(SerializableInstance::from).collect();
    println!("{}", serde_json::to_string_pretty(&data).unwrap());
}

fn output_yaml(instances: &[Instance]) {
    let data: Vec<SerializableInstance> =
        instances.iter().map(SerializableInstance::from).collect();
    println!("{}", serde_yml::to_string(&data).unwrap());
}
