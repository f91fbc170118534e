//! Cluster API operations

use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::aws::traits::PaginatedResponse;
use crate::aws::{ApiFailure, EcsClient};
use crate::config::api;
use crate::error::Result;

use super::models::Cluster;

/// ListClusters page response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ListClustersResponse {
    #[serde(default)]
    cluster_arns: Vec<String>,
    next_token: Option<String>,
}

impl PaginatedResponse<String> for ListClustersResponse {
    fn into_items(self) -> Vec<String> {
        self.cluster_arns
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

/// DescribeClusters response
#[derive(Deserialize, Debug)]
struct DescribeClustersResponse {
    #[serde(default)]
    clusters: Vec<Cluster>,
    #[serde(default)]
    failures: Vec<ApiFailure>,
}

impl EcsClient {
    /// Get all clusters in the region (with pagination)
    pub async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        let arns = self
            .fetch_all_pages::<String, ListClustersResponse>(
                "ListClusters",
                json!({ "maxResults": api::DEFAULT_PAGE_SIZE }),
                "clusters",
            )
            .await?;

        self.describe_batches(arns, |chunk| self.describe_clusters(chunk))
            .await
    }

    /// Describe one batch of clusters
    async fn describe_clusters(&self, arns: Vec<String>) -> Result<Vec<Cluster>> {
        let response: DescribeClustersResponse = self
            .call("DescribeClusters", &json!({ "clusters": arns }))
            .await?;

        for failure in &response.failures {
            debug!(
                "DescribeClusters failure for {}: {}",
                failure.arn.as_deref().unwrap_or("<unknown>"),
                failure.reason.as_deref().unwrap_or("<no reason>")
            );
        }

        Ok(response.clusters)
    }
}
