//! In-process attachment registry.

use super::connection::AgentConnection;
use async_trait::async_trait;
use dashmap::DashMap;
use fleet_application::{AttachmentError, AttachmentRegistry};
use fleet_domain::{AgentKey, AttachedAgent, TelemetrySnapshot};
use std::sync::Arc;
use tracing::{debug, info};

/// Connections attached to this node, keyed by agent key.
#[derive(Default)]
pub struct LocalAttachmentRegistry {
    connections: DashMap<AgentKey, Arc<dyn AgentConnection>>,
}

impl LocalAttachmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, replacing any earlier one for the same agent.
    pub fn attach(&self, connection: Arc<dyn AgentConnection>) {
        let identity = connection.identity();
        info!(agent = %identity.key(), region = %identity.region, "Agent attached");
        self.connections.insert(identity.key(), connection);
    }

    pub fn detach(&self, key: &AgentKey) -> Option<Arc<dyn AgentConnection>> {
        let removed = self.connections.remove(key).map(|(_, conn)| conn);
        if removed.is_some() {
            info!(agent = %key, "Agent detached");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    fn connection(&self, agent: &AttachedAgent) -> Result<Arc<dyn AgentConnection>, AttachmentError> {
        self.connections
            .get(&agent.key())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AttachmentError::NotAttached(agent.key().to_string()))
    }
}

#[async_trait]
impl AttachmentRegistry for LocalAttachmentRegistry {
    fn list_attached(&self) -> Vec<AttachedAgent> {
        self.connections
            .iter()
            .map(|entry| entry.value().identity())
            .collect()
    }

    fn resolve(&self, ip: &str, name: &str) -> Option<AttachedAgent> {
        self.connections
            .get(&AgentKey::new(ip, name))
            .map(|entry| entry.value().identity())
    }

    async fn stop(&self, agent: &AttachedAgent) -> Result<(), AttachmentError> {
        let connection = self.connection(agent)?;
        connection.stop().await?;
        debug!(agent = %agent.key(), "Stop sent");
        self.detach(&agent.key());
        Ok(())
    }

    async fn share_telemetry(&self, agent: &AttachedAgent) -> Result<(), AttachmentError> {
        self.connection(agent)?.share_telemetry().await
    }

    async fn current_snapshot(
        &self,
        agent: &AttachedAgent,
    ) -> Result<TelemetrySnapshot, AttachmentError> {
        self.connection(agent)?.snapshot().await
    }
}
