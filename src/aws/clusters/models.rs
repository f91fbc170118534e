//! Cluster data models

use serde::{Deserialize, Serialize};

use crate::aws::traits::EcsResource;

/// Cluster data from the ECS API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Cluster {
    #[serde(rename = "clusterArn")]
    pub arn: String,
    #[serde(rename = "clusterName")]
    pub name: String,
    pub status: Option<String>,
}

impl Cluster {
    /// Get cluster status, UNKNOWN when the API omitted it
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("UNKNOWN")
    }

    /// Region parsed from the ARN (arn:aws:ecs:REGION:account:cluster/name)
    pub fn region(&self) -> &str {
        self.arn.split(':').nth(3).unwrap_or("")
    }
}

impl EcsResource for Cluster {
    fn id(&self) -> &str {
        &self.arn
    }

    fn name(&self) -> &str {
        &self.name
    }
}
