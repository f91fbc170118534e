//! Inventory API access
//!
//! Everything that talks to the remote inventory lives here: the HTTP
//! client with its retry policy and pagination, credential resolution,
//! and the per-resource listing modules (clusters, instances,
//! containers).

pub mod client;
pub mod clusters;
pub mod containers;
pub mod credentials;
pub mod instances;
pub mod retry;
pub mod traits;

use serde::Deserialize;

pub use client::EcsClient;
pub use clusters::run_clusters_command;
pub use containers::run_containers_command;
pub use credentials::CredentialsResolver;
pub use instances::run_ec2_command;

/// Per-id failure entry carried by describe responses
///
/// A failure for one id does not fail the batch; it is logged and the
/// remaining records are returned.
#[derive(Deserialize, Debug)]
pub struct ApiFailure {
    pub arn: Option<String>,
    pub reason: Option<String>,
}
