//! Container data models
//!
//! The API lists tasks; users browse containers. `Task::into_containers`
//! flattens one task record into per-container records carrying the task
//! id and host instance they run on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Container record flattened from the task listing
#[derive(Serialize, Debug, Clone)]
pub struct Container {
    pub id: String,
    pub task_id: String,
    pub name: String,
    pub status: String,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub created_at: DateTime<Utc>,
    /// EC2 instance the task is placed on; empty until placement
    pub host_instance_id: String,
}

impl Container {
    /// Whether the container is currently running; status compare is
    /// case-insensitive
    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case("running")
    }

    /// CPU reservation for display
    pub fn cpu(&self) -> &str {
        self.cpu.as_deref().unwrap_or("-")
    }

    /// Memory reservation for display
    pub fn memory(&self) -> &str {
        self.memory.as_deref().unwrap_or("-")
    }
}

/// Task data from the ECS API
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_arn: String,
    #[serde(default)]
    pub ec2_instance_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_epoch")]
    pub created_at: Option<DateTime<Utc>>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    #[serde(default)]
    pub containers: Vec<TaskContainer>,
}

/// Container entry inside a task
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskContainer {
    pub container_arn: Option<String>,
    pub name: Option<String>,
    pub last_status: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
}

impl Task {
    /// Flatten this task into per-container records
    ///
    /// Container cpu/memory fall back to the task-level reservation when
    /// the container carries none.
    pub fn into_containers(self) -> Vec<Container> {
        let Task {
            task_arn,
            ec2_instance_id,
            created_at,
            cpu,
            memory,
            containers,
        } = self;

        let task_id = arn_tail(&task_arn).to_string();
        let host_instance_id = ec2_instance_id.unwrap_or_default();
        let created_at = created_at.unwrap_or(DateTime::UNIX_EPOCH);

        containers
            .into_iter()
            .map(|c| Container {
                id: c
                    .container_arn
                    .as_deref()
                    .map(arn_tail)
                    .unwrap_or_default()
                    .to_string(),
                task_id: task_id.clone(),
                name: c.name.unwrap_or_default(),
                status: c.last_status.unwrap_or_else(|| "UNKNOWN".to_string()),
                cpu: c.cpu.or_else(|| cpu.clone()),
                memory: c.memory.or_else(|| memory.clone()),
                created_at,
                host_instance_id: host_instance_id.clone(),
            })
            .collect()
    }
}

/// AWS JSON timestamps arrive as (fractional) epoch seconds
fn deserialize_epoch<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let seconds: Option<f64> = Option::deserialize(deserializer)?;
    Ok(seconds.and_then(|s| DateTime::from_timestamp_millis((s * 1000.0).round() as i64)))
}

/// Last path segment of an ARN
fn arn_tail(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}
