//! Agent registry entities.

use super::value_objects::{AgentKey, AttachedAgent};
use crate::core::error::DomainError;
use crate::region::AgentRegion;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of an agent slot.
///
/// `Ready`, `Busy` and `Error` are reported by the agent connection itself;
/// `Inactive` and `WrongRegion` are only ever assigned by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    #[default]
    Ready,
    Inactive,
    WrongRegion,
    Busy,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Ready => "READY",
            AgentStatus::Inactive => "INACTIVE",
            AgentStatus::WrongRegion => "WRONG_REGION",
            AgentStatus::Busy => "BUSY",
            AgentStatus::Error => "ERROR",
        }
    }

    /// Whether an agent in this state still counts toward available capacity.
    pub fn is_active(&self) -> bool {
        !matches!(self, AgentStatus::Inactive | AgentStatus::WrongRegion)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "READY" => Ok(AgentStatus::Ready),
            "INACTIVE" => Ok(AgentStatus::Inactive),
            "WRONG_REGION" => Ok(AgentStatus::WrongRegion),
            "BUSY" => Ok(AgentStatus::Busy),
            "ERROR" => Ok(AgentStatus::Error),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

/// Durable record of one agent slot in the cluster-wide registry.
///
/// At most one record exists per `(ip, name)`; [`AgentRecord::key`] is the
/// identity stores deduplicate on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub ip: String,
    pub name: String,
    pub region: String,
    pub port: u16,
    pub status: AgentStatus,
    pub approved: bool,
}

impl AgentRecord {
    pub fn new(ip: impl Into<String>, name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            name: name.into(),
            region: region.into(),
            port: 0,
            status: AgentStatus::Ready,
            approved: false,
        }
    }

    /// Create a record for an identity seen attached for the first time.
    pub fn from_attached(agent: &AttachedAgent, approved: bool) -> Self {
        let mut record = Self::new(agent.ip.as_str(), agent.name.as_str(), agent.region.as_str());
        record.fill_from(agent);
        record.approved = approved;
        record
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn approved(mut self) -> Self {
        self.approved = true;
        self
    }

    pub fn key(&self) -> AgentKey {
        AgentKey::new(&self.ip, &self.name)
    }

    pub fn agent_region(&self) -> AgentRegion {
        AgentRegion::parse(self.region.as_str())
    }

    /// Whether the live identity disagrees with this record on anything
    /// reconciliation copies over.
    pub fn differs_from(&self, agent: &AttachedAgent) -> bool {
        self.port != agent.port || self.status != agent.status || self.region != agent.region
    }

    /// Copy the live connection details onto the record.
    pub fn fill_from(&mut self, agent: &AttachedAgent) {
        self.region = agent.region.clone();
        self.port = agent.port;
        self.status = agent.status;
    }
}
