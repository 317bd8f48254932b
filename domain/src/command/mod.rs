//! Cluster command domain.
//!
//! Commands travel between controller nodes through a shared expiring cache.
//! Each node only acts on keys prefixed with its own region, so the key
//! format `<region>|<agentKey>` is the whole routing scheme.

use crate::agent::entities::AgentRecord;
use crate::agent::value_objects::AgentKey;
use crate::region::extract_region;
use serde::{Deserialize, Serialize};

/// Separator between the region prefix and the agent key.
pub const KEY_SEPARATOR: char = '|';

/// What a node should do with the agent named in a [`ClusterCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    /// Stop the agent process.
    StopAgent,
    /// Start publishing the agent's system telemetry to the shared cache.
    ShareTelemetry,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::StopAgent => "STOP_AGENT",
            CommandType::ShareTelemetry => "SHARE_TELEMETRY",
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command addressed to one agent, queued for whichever node holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCommand {
    pub agent_ip: String,
    pub agent_name: String,
    pub command_type: CommandType,
}

impl ClusterCommand {
    pub fn new(
        agent_ip: impl Into<String>,
        agent_name: impl Into<String>,
        command_type: CommandType,
    ) -> Self {
        Self {
            agent_ip: agent_ip.into(),
            agent_name: agent_name.into(),
            command_type,
        }
    }

    pub fn for_record(record: &AgentRecord, command_type: CommandType) -> Self {
        Self::new(record.ip.as_str(), record.name.as_str(), command_type)
    }
}

/// Queue key `<region>|<agentKey>`.
///
/// The region part never carries an owner suffix, so owned and shared agents
/// of one region are handled by the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandKey(String);

impl CommandKey {
    pub fn new(region: &str, agent_key: &AgentKey) -> Self {
        Self(format!(
            "{}{}{}",
            extract_region(region),
            KEY_SEPARATOR,
            agent_key
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the node serving `region` owns this key.
    pub fn belongs_to(&self, region: &str) -> bool {
        self.0
            .strip_prefix(region)
            .is_some_and(|rest| rest.starts_with(KEY_SEPARATOR))
    }
}

impl std::fmt::Display for CommandKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_key_strips_owner() {
        let record = AgentRecord::new("10.0.0.1", "a1", "seoul_owned_alice");
        let key = CommandKey::new(&record.region, &record.key());
        assert_eq!(key.as_str(), "seoul|10.0.0.1_a1");
    }

    #[test]
    fn test_belongs_to_requires_full_region() {
        let agent = AgentKey::new("10.0.0.1", "a1");
        let key = CommandKey::new("seoul_owned_bob", &agent);
        assert!(key.belongs_to("seoul"));
        assert!(!key.belongs_to("seo"));
        assert!(!key.belongs_to("tokyo"));
        assert!(!CommandKey::new("seoul2", &agent).belongs_to("seoul"));
    }

    #[test]
    fn test_command_for_record() {
        let record = AgentRecord::new("10.0.0.1", "a1", "seoul");
        let command = ClusterCommand::for_record(&record, CommandType::StopAgent);
        assert_eq!(command.agent_ip, "10.0.0.1");
        assert_eq!(command.agent_name, "a1");
        assert_eq!(command.command_type.to_string(), "STOP_AGENT");
    }
}
