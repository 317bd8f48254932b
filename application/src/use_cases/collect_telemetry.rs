//! Telemetry pipeline use case
//!
//! Agents are registered as telemetry targets with a TTL; a collection pass
//! reads the current snapshot of every live target and overwrites the shared
//! snapshot cache. Monitoring stops on its own once a target is no longer
//! re-registered.

use crate::ports::attachment_registry::AttachmentRegistry;
use crate::ports::expiring_cache::{TelemetrySnapshotCache, TelemetryTargetCache};
use fleet_domain::{AgentKey, AttachedAgent, TelemetrySnapshot};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Registers telemetry targets and keeps the snapshot cache fresh.
pub struct TelemetryPipeline {
    targets: Arc<TelemetryTargetCache>,
    snapshots: Arc<TelemetrySnapshotCache>,
    attachments: Arc<dyn AttachmentRegistry>,
    target_ttl: Duration,
}

impl TelemetryPipeline {
    pub fn new(
        targets: Arc<TelemetryTargetCache>,
        snapshots: Arc<TelemetrySnapshotCache>,
        attachments: Arc<dyn AttachmentRegistry>,
        target_ttl: Duration,
    ) -> Self {
        Self {
            targets,
            snapshots,
            attachments,
            target_ttl,
        }
    }

    /// Register (or renew) an agent for monitoring.
    pub fn register_target(&self, agent: AttachedAgent) {
        debug!(agent = %agent.key(), ttl_secs = self.target_ttl.as_secs(), "Telemetry target registered");
        self.targets.put(agent.key(), agent, Some(self.target_ttl));
    }

    /// Collect a snapshot for every live target. Returns the number refreshed.
    ///
    /// Targets attached to another node fail to read and are skipped; their
    /// owning node refreshes them.
    pub async fn collect(&self) -> usize {
        let mut refreshed = 0;
        for key in self.targets.keys_near_expiry() {
            let Some(agent) = self.targets.get(&key) else {
                continue;
            };
            match self.attachments.current_snapshot(&agent).await {
                Ok(snapshot) => {
                    self.snapshots.put(key, snapshot, None);
                    refreshed += 1;
                }
                Err(e) => {
                    trace!(agent = %key, "Telemetry not collected: {}", e);
                }
            }
        }
        refreshed
    }

    /// Last collected snapshot for an agent, or an empty snapshot.
    pub fn snapshot(&self, ip: &str, name: &str) -> TelemetrySnapshot {
        self.snapshots
            .get(&AgentKey::new(ip, name))
            .unwrap_or_default()
    }
}
