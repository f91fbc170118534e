//! Context command handlers

use log::debug;

use crate::aws::traits::EcsResource;
use crate::aws::EcsClient;
use crate::error::{EcsError, Result};
use crate::ui::{create_spinner, finish_spinner};

use super::models::{Context, ContextConfig};
use super::resolve::require_active_context;
use super::store::ContextStore;

/// Switch the active cluster. Validates the cluster exists before
/// persisting; on failure the prior selection is left untouched.
pub async fn run_use_cluster_command(
    client: &EcsClient,
    store: &ContextStore,
    name: &str,
    region: &str,
    batch: bool,
) -> Result<()> {
    let spinner = create_spinner(&format!("Looking up cluster '{}'...", name), batch);
    let clusters = client.list_clusters().await;
    finish_spinner(spinner);
    let clusters = clusters?;

    let cluster = clusters.iter().find(|c| c.matches(name)).ok_or_else(|| {
        let available = if clusters.is_empty() {
            format!("no clusters visible in {}", region)
        } else {
            format!(
                "Available clusters: {}",
                clusters
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        EcsError::ClusterNotFound(format!(
            "Cluster '{}' not found in {}. {}",
            name, region, available
        ))
    })?;

    debug!("Validated cluster '{}' ({})", cluster.name, cluster.arn);

    let mut config = store.load()?;
    config.current = Some(Context::new(&cluster.name, region));
    store.save(&config)?;
    println!("✓ Switched to cluster '{}' ({})", cluster.name, region);

    Ok(())
}

/// Show the active cluster selection
pub fn run_current_context_command(store: &ContextStore) -> Result<()> {
    let config = store.load()?;
    let ctx = require_active_context(&config)?;

    let last_used = ctx
        .last_used_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "<unknown>".to_string());

    println!("Current cluster: {}", ctx.cluster);
    println!("  Region:    {}", ctx.region);
    println!("  Last used: {}", last_used);

    Ok(())
}

/// Clear the active cluster selection (idempotent)
pub fn run_clear_context_command(store: &ContextStore) -> Result<()> {
    let config = store.load()?;

    match config.current {
        Some(ctx) => {
            store.save(&ContextConfig::default())?;
            println!("✓ Cleared active cluster (was '{}')", ctx.cluster);
        }
        None => {
            println!("No active cluster to clear.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_store(dir: &TempDir) -> ContextStore {
        ContextStore::with_path(dir.path().join("config.json"))
    }

    fn cluster_arn(name: &str) -> String {
        format!("arn:aws:ecs:us-east-1:123456789012:cluster/{}", name)
    }

    async fn mock_cluster_listing(server: &MockServer, names: &[&str]) {
        let arns: Vec<String> = names.iter().map(|n| cluster_arn(n)).collect();
        Mock::given(method("POST"))
            .and(header(
                "X-Amz-Target",
                "AmazonEC2ContainerServiceV20141113.ListClusters",
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "clusterArns": arns })),
            )
            .mount(server)
            .await;

        let described: Vec<serde_json::Value> = names
            .iter()
            .map(|n| {
                json!({
                    "clusterArn": cluster_arn(n),
                    "clusterName": n,
                    "status": "ACTIVE"
                })
            })
            .collect();
        Mock::given(method("POST"))
            .and(header(
                "X-Amz-Target",
                "AmazonEC2ContainerServiceV20141113.DescribeClusters",
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "clusters": described, "failures": [] })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_use_cluster_persists_selection() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());
        mock_cluster_listing(&mock_server, &["prod", "staging"]).await;

        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        run_use_cluster_command(&client, &store, "prod", "us-east-1", true)
            .await
            .unwrap();

        let config = store.load().unwrap();
        let current = config.current.unwrap();
        assert_eq!(current.cluster, "prod");
        assert_eq!(current.region, "us-east-1");
        assert!(current.last_used_at.is_some());
    }

    #[tokio::test]
    async fn test_use_cluster_accepts_arn() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());
        mock_cluster_listing(&mock_server, &["prod"]).await;

        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        run_use_cluster_command(&client, &store, &cluster_arn("prod"), "us-east-1", true)
            .await
            .unwrap();

        // Canonical name is stored, not the ARN
        let config = store.load().unwrap();
        assert_eq!(config.current.unwrap().cluster, "prod");
    }

    #[tokio::test]
    async fn test_use_cluster_nonexistent_leaves_prior_untouched() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());
        mock_cluster_listing(&mock_server, &["prod", "staging"]).await;

        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store
            .save(&ContextConfig {
                current: Some(Context::new("prod", "us-east-1")),
            })
            .unwrap();

        let result =
            run_use_cluster_command(&client, &store, "nonexistent", "us-east-1", true).await;

        let err = result.unwrap_err();
        assert!(matches!(err, EcsError::ClusterNotFound(_)));
        assert!(err.to_string().contains("nonexistent"));
        assert!(err.to_string().contains("prod"));

        // Prior selection survives the failed switch
        let config = store.load().unwrap();
        assert_eq!(config.current.unwrap().cluster, "prod");
    }

    #[tokio::test]
    async fn test_use_cluster_no_clusters_in_region() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());
        mock_cluster_listing(&mock_server, &[]).await;

        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let result = run_use_cluster_command(&client, &store, "prod", "eu-west-1", true).await;

        let err = result.unwrap_err();
        assert!(matches!(err, EcsError::ClusterNotFound(_)));
        assert!(err.to_string().contains("no clusters visible"));
        assert!(store.load().unwrap().current.is_none());
    }

    #[test]
    fn test_current_context_without_selection() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let err = run_current_context_command(&store).unwrap_err();
        assert!(matches!(err, EcsError::NoActiveContext));
    }

    #[test]
    fn test_current_context_with_selection() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store
            .save(&ContextConfig {
                current: Some(Context::new("prod", "eu-west-1")),
            })
            .unwrap();
        run_current_context_command(&store).unwrap();
    }

    #[test]
    fn test_clear_context_removes_selection() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store
            .save(&ContextConfig {
                current: Some(Context::new("prod", "eu-west-1")),
            })
            .unwrap();

        run_clear_context_command(&store).unwrap();
        assert!(store.load().unwrap().current.is_none());
    }

    #[test]
    fn test_clear_context_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        run_clear_context_command(&store).unwrap();
        run_clear_context_command(&store).unwrap();
        assert!(store.load().unwrap().current.is_none());
    }
}
