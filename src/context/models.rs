//! Persisted context data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level persisted configuration (~/.ecsctl/config.json)
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ContextConfig {
    /// The currently active cluster selection, if any
    #[serde(rename = "current-cluster", skip_serializing_if = "Option::is_none")]
    pub current: Option<Context>,
}

/// The active cluster/region scope; written only by `use-cluster`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Context {
    /// Cluster name (ECS cluster names double as API identifiers)
    pub cluster: String,
    /// Region the cluster lives in
    pub region: String,
    /// When this selection was last made
    #[serde(rename = "last-used-at", skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Context {
    pub fn new(cluster: &str, region: &str) -> Self {
        Self {
            cluster: cluster.to_string(),
            region: region.to_string(),
            last_used_at: Some(Utc::now()),
        }
    }
}
