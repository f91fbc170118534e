use std::fmt;

/// Custom error type for ecsctl operations
#[derive(Debug)]
pub enum EcsError {
    /// Credential resolution failed; never retried
    NotAuthenticated(String),
    /// Remote call rejected for permissions; never retried
    AuthorizationDenied(String),
    /// Remote rate limiting; retried per policy
    Throttled(String),
    /// 5xx-class remote errors, timeouts, connection resets; retried per policy
    TransientRemoteFailure(String),
    /// Referenced cluster does not exist
    ClusterNotFound(String),
    /// Target instance is not part of the active cluster
    TargetNotInCluster { instance: String, cluster: String },
    /// Command requires an active cluster selection that was never made
    NoActiveContext,
    /// Session broker refused to negotiate a channel
    BrokerRejected(String),
    /// Interactive session ended abnormally
    SessionTerminated(String),
    /// Unclassified API error response
    Api { status: u16, message: String },
    /// JSON parsing error
    Json(String),
    /// Configuration error (context file, local environment)
    Config(String),
}

impl EcsError {
    /// Whether the retry policy may re-attempt the failed call
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EcsError::Throttled(_) | EcsError::TransientRemoteFailure(_)
        )
    }
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::NotAuthenticated(msg) => write!(f, "{}", msg),
            EcsError::AuthorizationDenied(msg) => write!(f, "Access denied: {}", msg),
            EcsError::Throttled(msg) => write!(f, "Throttled by remote API: {}", msg),
            EcsError::TransientRemoteFailure(msg) => {
                write!(f, "Transient remote failure: {}", msg)
            }
            EcsError::ClusterNotFound(msg) => write!(f, "{}", msg),
            EcsError::TargetNotInCluster { instance, cluster } => write!(
                f,
                "Instance '{}' not found in cluster '{}'. Check the active selection with 'ecsctl current-context'.",
                instance, cluster
            ),
            EcsError::NoActiveContext => {
                write!(f, "No cluster selected. Run 'ecsctl use-cluster <name>' first.")
            }
            EcsError::BrokerRejected(msg) => {
                write!(f, "Session broker rejected the request: {}", msg)
            }
            EcsError::SessionTerminated(msg) => write!(f, "Session terminated: {}", msg),
            EcsError::Api { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            EcsError::Json(msg) => write!(f, "JSON error: {}", msg),
            EcsError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for EcsError {}

impl From<reqwest::Error> for EcsError {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts and resets are transient; a body that fails to decode is not.
        if err.is_decode() {
            EcsError::Json(err.to_string())
        } else if err.is_timeout() {
            EcsError::TransientRemoteFailure(format!("request timed out: {}", err))
        } else if err.is_connect() {
            EcsError::TransientRemoteFailure(format!("connection failed: {}", err))
        } else {
            EcsError::TransientRemoteFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for EcsError {
    fn from(err: serde_json::Error) -> Self {
        EcsError::Json(err.to_string())
    }
}

impl From<std::io::Error> for EcsError {
    fn from(err: std::io::Error) -> Self {
        EcsError::Config(err.to_string())
    }
}

/// Result type alias for ecsctl operations
pub type Result<T> = std::result::Result<T, EcsError>;
