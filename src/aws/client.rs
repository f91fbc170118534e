//! ECS HTTP client for AWS JSON API interactions

use futures::stream::{self, StreamExt};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use crate::aws::retry::RetryPolicy;
use crate::aws::traits::PaginatedResponse;
use crate::config::api;
use crate::error::{EcsError, Result};

/// ECS API client
pub struct EcsClient {
    client: Client,
    token: String,
    region: String,
    retry: RetryPolicy,
    /// Custom base URL override (for testing with mock servers)
    base_url_override: Option<String>,
}

impl EcsClient {
    /// Create a new ECS client with optimized connection settings
    pub fn new(token: String, region: String) -> Self {
        let client = Client::builder()
            // Connection pool settings - reuse connections
            .pool_max_idle_per_host(20)
            .pool_idle_timeout(Duration::from_secs(90))
            // TCP keepalive to maintain connections
            .tcp_keepalive(Duration::from_secs(60))
            // Per-attempt bounds; retries never wait on a hung call
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            region,
            retry: RetryPolicy::default(),
            base_url_override: None,
        }
    }

    /// Create a client with custom base URL (for testing with mock servers)
    #[cfg(test)]
    pub fn with_base_url(token: String, region: String, base_url: String) -> Self {
        let client = Client::builder().build().unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            region,
            retry: RetryPolicy::default(),
            base_url_override: Some(base_url),
        }
    }

    /// Get the region this client talks to
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Build the service endpoint for API requests
    pub(crate) fn endpoint(&self) -> String {
        if let Some(ref url) = self.base_url_override {
            return url.clone();
        }
        format!("https://ecs.{}.amazonaws.com", self.region)
    }

    /// POST a single AWS JSON 1.1 operation, retrying per policy
    ///
    /// `target` is the bare operation name (e.g. "ListClusters"); the
    /// service prefix is added here.
    pub(crate) async fn call<T>(&self, target: &str, body: &Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let header_value = format!("{}.{}", api::ECS_TARGET_PREFIX, target);
        self.retry
            .run(target, || self.call_once(&header_value, body))
            .await
    }

    /// One attempt of one operation, no retry
    async fn call_once<T>(&self, target_header: &str, body: &Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint();
        debug!("POST {} ({})", url, target_header);

        let response = self
            .client
            .post(&url)
            .header("X-Amz-Target", target_header)
            .header("Content-Type", api::AMZ_JSON_CONTENT_TYPE)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &text));
        }
        Ok(response.json().await?)
    }

    /// Fetch every page of a token-paginated listing
    ///
    /// Each page request goes through the retry policy. A listing either
    /// returns every item or fails as a whole. A continuation token equal
    /// to the one just sent cannot make progress; that page is discarded
    /// and re-requested once before the listing fails.
    pub async fn fetch_all_pages<T, R>(
        &self,
        target: &str,
        base_body: Value,
        error_context: &str,
    ) -> Result<Vec<T>>
    where
        T: Send,
        R: DeserializeOwned + PaginatedResponse<T> + Send,
    {
        let mut all_items: Vec<T> = Vec::new();
        let mut next_token: Option<String> = None;
        let mut stale_retried = false;
        let mut pages: u32 = 0;

        loop {
            if pages >= api::MAX_PAGES {
                return Err(EcsError::TransientRemoteFailure(format!(
                    "pagination for {} exceeded {} pages without completing",
                    error_context,
                    api::MAX_PAGES
                )));
            }
            pages += 1;

            let mut body = base_body.clone();
            if let Some(token) = &next_token {
                body["nextToken"] = Value::String(token.clone());
            }

            let response: R = self.call(target, &body).await?;
            let new_token = response.next_token().map(|t| t.to_string());

            if new_token.is_some() && new_token == next_token {
                if stale_retried {
                    return Err(EcsError::TransientRemoteFailure(format!(
                        "pagination token for {} did not advance",
                        error_context
                    )));
                }
                debug!(
                    "Stale pagination token for {}, discarding page and re-requesting",
                    error_context
                );
                stale_retried = true;
                continue;
            }
            stale_retried = false;

            all_items.extend(response.into_items());

            match new_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!(
            "Fetched {} total items for {}",
            all_items.len(),
            error_context
        );
        Ok(all_items)
    }

    /// Run describe calls over id chunks with bounded concurrency
    ///
    /// Items come back in chunk order regardless of completion order, so
    /// listings stay deterministic.
    pub(crate) async fn describe_batches<T, F, Fut>(
        &self,
        ids: Vec<String>,
        describe: F,
    ) -> Result<Vec<T>>
    where
        F: Fn(Vec<String>) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let batch_futures = ids
            .chunks(api::MAX_DESCRIBE_BATCH)
            .map(|chunk| chunk.to_vec())
            .enumerate()
            .map(|(index, chunk)| {
                let fut = describe(chunk);
                async move { fut.await.map(|items| (index, items)) }
            })
            .collect::<Vec<_>>();

        debug!(
            "Describing {} ids in {} batches (max {} concurrent)",
            ids.len(),
            batch_futures.len(),
            api::MAX_CONCURRENT_DESCRIBES
        );

        let results: Vec<Result<(usize, Vec<T>)>> = stream::iter(batch_futures)
            .buffer_unordered(api::MAX_CONCURRENT_DESCRIBES)
            .collect()
            .await;

        let mut batches: Vec<(usize, Vec<T>)> = Vec::with_capacity(results.len());
        for result in results {
            batches.push(result?);
        }
        batches.sort_by_key(|(index, _)| *index);

        Ok(batches.into_iter().flat_map(|(_, items)| items).collect())
    }
}

/// Map an AWS JSON error response to an error kind
///
/// Error bodies look like `{"__type": "ThrottlingException", "message": ".."}`,
/// with the type sometimes namespaced as `com.amazon.service#Type`.
pub(crate) fn classify_api_error(status: u16, body: &str) -> EcsError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error_type = parsed
        .as_ref()
        .and_then(|v| v.get("__type"))
        .and_then(|t| t.as_str())
        .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
        .unwrap_or_default();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("Message")))
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
        .unwrap_or_else(|| {
            if error_type.is_empty() {
                body.chars().take(200).collect()
            } else {
                error_type.clone()
            }
        });

    if status == 429
        || error_type.contains("Throttling")
        || error_type.contains("TooManyRequests")
    {
        EcsError::Throttled(message)
    } else if error_type == "ClusterNotFoundException" {
        EcsError::ClusterNotFound(message)
    } else if error_type == "TargetNotConnected" {
        EcsError::BrokerRejected(message)
    } else if error_type.contains("AccessDenied") || error_type.contains("UnauthorizedOperation") {
        EcsError::AuthorizationDenied(message)
    } else if matches!(
        error_type.as_str(),
        "UnrecognizedClientException"
            | "InvalidSignatureException"
            | "ExpiredTokenException"
            | "MissingAuthenticationTokenException"
    ) {
        EcsError::NotAuthenticated(format!(
            "The API rejected the provided credentials ({}): {}",
            error_type, message
        ))
    } else if status >= 500
        || error_type.contains("ServerException")
        || error_type.contains("ServiceUnavailable")
    {
        EcsError::TransientRemoteFailure(message)
    } else {
        EcsError::Api { status, message }
    }
}

#[cfg(test)]
impl EcsClient {
    /// Create a test client with mock base URL and a fast retry policy
    ///
    /// The policy keeps the production attempt ceiling but shrinks delays
    /// so retry tests finish in milliseconds.
    pub fn test_client(base_url: &str) -> Self {
        let mut client = Self::with_base_url(
            "test-token".to_string(),
            "ap-southeast-1".to_string(),
            base_url.to_string(),
        );
        client.retry = RetryPolicy {
            max_attempts: crate::config::retry::MAX_ATTEMPTS,
            base_delay_ms: 1,
            max_delay_ms: 5,
            jitter_factor: 0.0,
        };
        client
    }
}


#[cfg(test)]
mod pagination_tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Test item type
    #[derive(Deserialize, Debug, Clone)]
    struct TestItem {
        id: String,
    }

    /// Test response type
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    struct TestItemsResponse {
        items: Vec<TestItem>,
        next_token: Option<String>,
    }

    impl PaginatedResponse<TestItem> for TestItemsResponse {
        fn into_items(self) -> Vec<TestItem> {
            self.items
        }

        fn next_token(&self) -> Option<&str> {
            self.next_token.as_deref()
        }
    }

    const TARGET_HEADER: &str = "AmazonEC2ContainerServiceV20141113.ListTestItems";

    #[tokio::test]
    async fn test_fetch_all_pages_single_page() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("X-Amz-Target", TARGET_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "item-1"}, {"id": "item-2"}]
            })))
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({"cluster": "prod"}),
                "test items",
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "item-1");
    }

    #[tokio::test]
    async fn test_fetch_all_pages_follows_tokens() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        // Page 1: initial body carries no token
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("X-Amz-Target", TARGET_HEADER))
            .and(body_json(serde_json::json!({"cluster": "prod"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "item-1"}, {"id": "item-2"}],
                "nextToken": "page-2"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        // Page 2: echoes the token back
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("X-Amz-Target", TARGET_HEADER))
            .and(body_json(serde_json::json!({
                "cluster": "prod",
                "nextToken": "page-2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "item-3"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({"cluster": "prod"}),
                "test items",
            )
            .await
            .unwrap();

        // Pages concatenate in order
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "item-1");
        assert_eq!(items[1].id, "item-2");
        assert_eq!(items[2].id, "item-3");
    }

    #[tokio::test]
    async fn test_throttled_request_retried_then_succeeds() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        // First two attempts throttle, third succeeds
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "__type": "ThrottlingException",
                "message": "Rate exceeded"
            })))
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "item-1"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({}),
                "test items",
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_throttled_request_exhausts_attempts() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "__type": "ThrottlingException",
                "message": "Rate exceeded"
            })))
            .expect(5)
            .mount(&mock_server)
            .await;

        let err = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({}),
                "test items",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EcsError::Throttled(_)));
    }

    #[tokio::test]
    async fn test_access_denied_not_retried() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "__type": "AccessDeniedException",
                "message": "no ecs:ListClusters for you"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({}),
                "test items",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EcsError::AuthorizationDenied(_)));
    }

    #[tokio::test]
    async fn test_server_error_retried() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "__type": "ServerException",
                "message": "internal"
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({}),
                "test items",
            )
            .await
            .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_stale_token_discards_page_and_recovers() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "item-1"}],
                "nextToken": "tok"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        // First follow-up echoes the same token; the page must be discarded
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(serde_json::json!({"nextToken": "tok"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "dup"}],
                "nextToken": "tok"
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        // Re-request of the same page then completes
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(serde_json::json!({"nextToken": "tok"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "item-2"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({}),
                "test items",
            )
            .await
            .unwrap();

        // The duplicated page never lands in the result
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "item-1");
        assert_eq!(items[1].id, "item-2");
    }

    #[tokio::test]
    async fn test_stale_token_twice_fails_listing() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "item-1"}],
                "nextToken": "tok"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(serde_json::json!({"nextToken": "tok"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "dup"}],
                "nextToken": "tok"
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let err = client
            .fetch_all_pages::<TestItem, TestItemsResponse>(
                "ListTestItems",
                serde_json::json!({}),
                "test items",
            )
            .await
            .unwrap_err();

        match err {
            EcsError::TransientRemoteFailure(msg) => assert!(msg.contains("did not advance")),
            other => panic!("Expected TransientRemoteFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_describe_batches_chunks_and_preserves_order() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());
        // 250 ids means three chunks of 100, 100, 50
        let ids: Vec<String> = (0..250).map(|i| format!("id-{:03}", i)).collect();

        let echoed = client
            .describe_batches(ids.clone(), |chunk| async move {
                assert!(chunk.len() <= 100);
                Ok(chunk)
            })
            .await
            .unwrap();

        assert_eq!(echoed, ids);
    }

    #[tokio::test]
    async fn test_describe_batches_empty_input() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());

        let out: Vec<String> = client
            .describe_batches(Vec::new(), |chunk| async move { Ok(chunk) })
            .await
            .unwrap();

        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_describe_batches_fails_whole_listing() {
        let mock_server = MockServer::start().await;
        let client = EcsClient::test_client(&mock_server.uri());
        let ids: Vec<String> = (0..150).map(|i| format!("id-{}", i)).collect();

        let result: Result<Vec<String>> = client
            .describe_batches(ids, |chunk| async move {
                if chunk.len() < 100 {
                    Err(EcsError::TransientRemoteFailure("boom".to_string()))
                } else {
                    Ok(chunk)
                }
            })
            .await;

        assert!(result.is_err());
    }
}
