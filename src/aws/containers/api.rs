//! Container API operations

use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::aws::traits::PaginatedResponse;
use crate::aws::{ApiFailure, EcsClient};
use crate::config::api;
use crate::error::Result;

use super::models::{Container, Task};

/// ListTasks page response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ListTasksResponse {
    #[serde(default)]
    task_arns: Vec<String>,
    next_token: Option<String>,
}

impl PaginatedResponse<String> for ListTasksResponse {
    fn into_items(self) -> Vec<String> {
        self.task_arns
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

/// DescribeTasks response
#[derive(Deserialize, Debug)]
struct DescribeTasksResponse {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    failures: Vec<ApiFailure>,
}

impl EcsClient {
    /// Get all containers in a cluster, flattened from its tasks (with
    /// pagination)
    pub async fn list_containers(&self, cluster: &str) -> Result<Vec<Container>> {
        let error_context = format!("tasks in cluster '{}'", cluster);
        let arns = self
            .fetch_all_pages::<String, ListTasksResponse>(
                "ListTasks",
                json!({ "cluster": cluster, "maxResults": api::DEFAULT_PAGE_SIZE }),
                &error_context,
            )
            .await?;

        let tasks = self
            .describe_batches(arns, |chunk| self.describe_tasks(cluster, chunk))
            .await?;

        Ok(tasks.into_iter().flat_map(Task::into_containers).collect())
    }

    /// Describe one batch of tasks
    async fn describe_tasks(&self, cluster: &str, arns: Vec<String>) -> Result<Vec<Task>> {
        let response: DescribeTasksResponse = self
            .call(
                "DescribeTasks",
                &json!({ "cluster": cluster, "tasks": arns }),
            )
            .await?;

        for failure in &response.failures {
            debug!(
                "DescribeTasks failure for {}: {}",
                failure.arn.as_deref().unwrap_or("<unknown>"),
                failure.reason.as_deref().unwrap_or("<no reason>")
            );
        }

        Ok(response.tasks)
    }
}
