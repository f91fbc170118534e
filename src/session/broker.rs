//! Session broker negotiation
//!
//! The broker hands out stream coordinates for an interactive channel to
//! an instance; the byte stream itself is carried by the tunnel plugin.
//! Negotiation is never retried: a target that cannot be reached should
//! surface immediately, not be re-attempted against a possibly-wrong
//! host.

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::aws::client::classify_api_error;
use crate::config::api;
use crate::error::Result;

/// Stream coordinates negotiated with the broker
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct BrokerSession {
    pub session_id: String,
    pub stream_url: String,
    pub token_value: String,
}

/// Seam to the external session broker
///
/// The production implementation speaks the broker's HTTP endpoint;
/// tests substitute a counting mock to assert negotiate/teardown calls.
#[allow(async_fn_in_trait)]
pub trait SessionBroker {
    /// Negotiate a channel to the given instance
    async fn start_session(&self, instance_id: &str) -> Result<BrokerSession>;

    /// Release the broker-side resource for a negotiated session
    async fn terminate_session(&self, session_id: &str) -> Result<()>;

    /// Broker endpoint, forwarded to the tunnel plugin
    fn endpoint(&self) -> String;
}

/// HTTP session broker (SSM)
pub struct SsmSessionBroker {
    client: Client,
    token: String,
    region: String,
    /// Custom base URL override (for testing with mock servers)
    base_url_override: Option<String>,
}

impl SsmSessionBroker {
    /// Create a new broker client
    pub fn new(token: String, region: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            region,
            base_url_override: None,
        }
    }

    /// Create a broker with custom base URL (for testing with mock servers)
    #[cfg(test)]
    pub fn with_base_url(token: String, region: String, base_url: String) -> Self {
        let mut broker = Self::new(token, region);
        broker.base_url_override = Some(base_url);
        broker
    }

    /// POST one broker operation; no retry
    async fn call<T>(&self, target: &str, body: &Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint();
        let header_value = format!("{}.{}", api::SSM_TARGET_PREFIX, target);
        debug!("POST {} ({})", url, header_value);

        let response = self
            .client
            .post(&url)
            .header("X-Amz-Target", header_value)
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
}

impl SessionBroker for SsmSessionBroker {
    async fn start_session(&self, instance_id: &str) -> Result<BrokerSession> {
        let session: BrokerSession = self
            .call("StartSession", &json!({ "Target": instance_id }))
            .await?;
        debug!("Negotiated broker session {}", session.session_id);
        Ok(session)
    }

    async fn terminate_session(&self, session_id: &str) -> Result<()> {
        // Response echoes the session id; nothing in it is needed
        let _: Value = self
            .call("TerminateSession", &json!({ "SessionId": session_id }))
            .await?;
        debug!("Terminated broker session {}", session_id);
        Ok(())
    }

    fn endpoint(&self) -> String {
        if let Some(ref url) = self.base_url_override {
            return url.clone();
        }
        format!("https://ssm.{}.amazonaws.com", self.region)
    }
}
