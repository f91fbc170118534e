//! Remote session lifecycle
//!
//! One `RemoteSession` exists per exec invocation and walks
//! `Idle -> TargetResolved -> Negotiating -> Active -> Closed`, with a
//! terminal `Failed` reachable from any non-terminal state. The
//! negotiated broker session is taken out of the struct on the first
//! `close`, so teardown runs exactly once no matter how many exit paths
//! reach it.

use log::debug;

use crate::aws::instances::Instance;
use crate::aws::EcsClient;
use crate::error::{EcsError, Result};

use super::broker::{BrokerSession, SessionBroker};

/// Lifecycle states of one remote session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    TargetResolved,
    Negotiating,
    Active,
    Closed,
    Failed,
}

/// Transient per-invocation session record; never persisted
pub struct RemoteSession {
    target_instance_id: String,
    state: SessionState,
    broker_session: Option<BrokerSession>,
}

impl Default for RemoteSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteSession {
    pub fn new() -> Self {
        Self {
            target_instance_id: String::new(),
            state: SessionState::Idle,
            broker_session: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The instance this session targets, once resolved
    pub fn target(&self) -> &str {
        &self.target_instance_id
    }

    /// Stream coordinates, present while the session is negotiated
    pub fn negotiated(&self) -> Option<&BrokerSession> {
        self.broker_session.as_ref()
    }

    /// Validate that the instance belongs to the given cluster
    ///
    /// The gate prevents accidental cross-cluster session establishment:
    /// an id that exists in some other cluster fails here and the broker
    /// is never contacted.
    pub async fn resolve_target(
        &mut self,
        client: &EcsClient,
        cluster: &str,
        instance_id: &str,
    ) -> Result<Instance> {
        let instances = client.list_instances(cluster).await?;
        match instances.into_iter().find(|i| i.id == instance_id) {
            Some(instance) => {
                debug!("Resolved target {} in cluster '{}'", instance.id, cluster);
                self.target_instance_id = instance.id.clone();
                self.state = SessionState::TargetResolved;
                Ok(instance)
            }
            None => {
                self.state = SessionState::Failed;
                Err(EcsError::TargetNotInCluster {
                    instance: instance_id.to_string(),
                    cluster: cluster.to_string(),
                })
            }
        }
    }

    /// Negotiate a channel to the resolved target
    pub async fn open<B: SessionBroker>(&mut self, broker: &B) -> Result<()> {
        if self.state != SessionState::TargetResolved {
            return Err(EcsError::BrokerRejected(format!(
                "no resolved target to open a session to (state: {:?})",
                self.state
            )));
        }

        self.state = SessionState::Negotiating;
        match broker.start_session(&self.target_instance_id).await {
            Ok(session) => {
                self.broker_session = Some(session);
                self.state = SessionState::Active;
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    /// Mark the session failed (mid-session transport drop)
    pub fn mark_failed(&mut self) {
        if self.state != SessionState::Closed {
            self.state = SessionState::Failed;
        }
    }

    /// Release the broker-side resource
    ///
    /// Safe to call on every exit path; only the first call with a
    /// negotiated session reaches the broker.
    pub async fn close<B: SessionBroker>(&mut self, broker: &B) -> Result<()> {
        let Some(session) = self.broker_session.take() else {
            return Ok(());
        };

        let result = broker.terminate_session(&session.session_id).await;
        if self.state != SessionState::Failed {
            self.state = SessionState::Closed;
        }
        result
    }
}
