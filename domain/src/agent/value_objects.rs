//! Agent value objects.
//!
//! - [`AgentKey`] - cluster-wide key derived from an agent's ip and name
//! - [`AttachedAgent`] - a live connection to this controller (never persisted)

use super::entities::AgentStatus;
use crate::region::AgentRegion;
use serde::{Deserialize, Serialize};

/// Key identifying one agent slot across the cluster.
///
/// Built as `<ip>_<name>`; the same key is used by the agent registry,
/// the command queue and the telemetry caches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentKey(String);

impl AgentKey {
    pub fn new(ip: &str, name: &str) -> Self {
        Self(format!("{ip}_{name}"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an agent currently attached to this controller process.
///
/// Exists only while the underlying connection is open. `region` is the raw
/// string the agent reported, which may carry an `_owned_<user>` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedAgent {
    pub ip: String,
    pub name: String,
    pub region: String,
    pub port: u16,
    pub status: AgentStatus,
}

impl AttachedAgent {
    pub fn new(
        ip: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            ip: ip.into(),
            name: name.into(),
            region: region.into(),
            port,
            status: AgentStatus::Ready,
        }
    }

    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn key(&self) -> AgentKey {
        AgentKey::new(&self.ip, &self.name)
    }

    pub fn agent_region(&self) -> AgentRegion {
        AgentRegion::parse(self.region.as_str())
    }
}
