//! Container instance API operations

use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::aws::traits::PaginatedResponse;
use crate::aws::{ApiFailure, EcsClient};
use crate::config::api;
use crate::error::Result;

use super::models::Instance;

/// ListContainerInstances page response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ListContainerInstancesResponse {
    #[serde(default)]
    container_instance_arns: Vec<String>,
    next_token: Option<String>,
}

impl PaginatedResponse<String> for ListContainerInstancesResponse {
    fn into_items(self) -> Vec<String> {
        self.container_instance_arns
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

/// DescribeContainerInstances response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DescribeContainerInstancesResponse {
    #[serde(default)]
    container_instances: Vec<Instance>,
    #[serde(default)]
    failures: Vec<ApiFailure>,
}

impl EcsClient {
    /// Get all container instances in a cluster (with pagination)
    pub async fn list_instances(&self, cluster: &str) -> Result<Vec<Instance>> {
        let error_context = format!("container instances in cluster '{}'", cluster);
        let arns = self
            .fetch_all_pages::<String, ListContainerInstancesResponse>(
                "ListContainerInstances",
                json!({ "cluster": cluster, "maxResults": api::DEFAULT_PAGE_SIZE }),
                &error_context,
            )
            .await?;

        self.describe_batches(arns, |chunk| self.describe_instances(cluster, chunk))
            .await
    }

    /// Describe one batch of container instances
    async fn describe_instances(&self, cluster: &str, arns: Vec<String>) -> Result<Vec<Instance>> {
        let response: DescribeContainerInstancesResponse = self
            .call(
                "DescribeContainerInstances",
                &json!({ "cluster": cluster, "containerInstances": arns }),
            )
            .await?;

        for failure in &response.failures {
            debug!(
                "DescribeContainerInstances failure for {}: {}",
                failure.arn.as_deref().unwrap_or("<unknown>"),
                failure.reason.as_deref().unwrap_or("<no reason>")
            );
        }

        Ok(response.container_instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn instance_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "containerInstanceArn": format!(
                "arn:aws:ecs:ap-southeast-1:123456789012:container-instance/prod/{}", id
            ),
            "ec2InstanceId": id,
            "instanceType": "m5.large",
            "state": "running",
            "privateIp": "10.0.1.15"
        })
    }

    #[tokio::test]
    async fn test_list_instances_scoped_to_cluster() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header(
                "X-Amz-Target",
                "AmazonEC2ContainerServiceV20141113.ListContainerInstances",
            ))
            .and(body_json(serde_json::json!({
                "cluster": "prod",
                "maxResults": 100
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "containerInstanceArns": [
                    "arn:aws:ecs:ap-southeast-1:123456789012:container-instance/prod/u1"
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header(
                "X-Amz-Target",
                "AmazonEC2ContainerServiceV20141113.DescribeContainerInstances",
            ))
            .and(body_json(serde_json::json!({
                "cluster": "prod",
                "containerInstances": [
                    "arn:aws:ecs:ap-southeast-1:123456789012:container-instance/prod/u1"
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "containerInstances": [instance_json("i-0aaa")],
                "failures": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = EcsClient::test_client(&mock_server.uri());
        let instances = client.list_instances("prod").await.unwrap();

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].id, "i-0aaa");
        assert_eq!(instances[0].state(), "running");
    }

    #[tokio::test]
    async fn test_list_instances_empty_cluster() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header(
                "X-Amz-Target",
                "AmazonEC2ContainerServiceV20141113.ListContainerInstances",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "containerInstanceArns": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = EcsClient::test_client(&mock_server.uri());
        let instances = client.list_instances("prod").await.unwrap();

        assert!(instances.is_empty());
    }

    #[tokio::test]
    async fn test_list_instances_unknown_cluster() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header(
                "X-Amz-Target",
                "AmazonEC2ContainerServiceV20141113.ListContainerInstances",
            ))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "__type": "ClusterNotFoundException",
                "message": "Cluster not found."
            })))
            .mount(&mock_server)
            .await;

        let client = EcsClient::test_client(&mock_server.uri());
        let err = client.list_instances("ghost").await.unwrap_err();

        assert!(matches!(err, crate::error::EcsError::ClusterNotFound(_)));
    }
}
