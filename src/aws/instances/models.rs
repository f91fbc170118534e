//! Container instance data models

use serde::{Deserialize, Serialize};

use crate::aws::traits::EcsResource;

/// Container instance data from the ECS API
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(rename = "ec2InstanceId")]
    pub id: String,
    pub instance_type: Option<String>,
    pub state: Option<String>,
    pub private_ip: Option<String>,
    pub public_ip: Option<String>,
    /// Derived by the browse join, never read from the server
    #[serde(skip_deserializing)]
    pub running_task_count: u32,
}

impl Instance {
    /// Instance type for display
    pub fn instance_type(&self) -> &str {
        self.instance_type.as_deref().unwrap_or("-")
    }

    /// Lifecycle state (pending, running, draining, stopped)
    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("unknown")
    }

    /// Private IP for display
    pub fn private_ip(&self) -> &str {
        self.private_ip.as_deref().unwrap_or("-")
    }

    /// Public IP for display; most cluster instances have none
    pub fn public_ip(&self) -> &str {
        self.public_ip.as_deref().unwrap_or("-")
    }
}

impl EcsResource for Instance {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }
}
