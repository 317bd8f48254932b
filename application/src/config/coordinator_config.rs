//! Coordinator configuration: per-node settings for the coordination loops.
//!
//! [`CoordinatorConfig`] is built by the infrastructure config loader from the
//! TOML file and handed to [`ClusterCoordinator`](crate::ClusterCoordinator).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Periods of the background loops.
///
/// Each loop waits a full period after a pass finishes before starting the
/// next one, so a slow pass never stacks up behind itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleParams {
    /// Command queue drain period.
    pub dispatch_interval: Duration,
    /// Telemetry collection period.
    pub telemetry_interval: Duration,
    /// Registry reconciliation period.
    pub reconcile_interval: Duration,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            dispatch_interval: Duration::from_secs(3),
            telemetry_interval: Duration::from_secs(1),
            reconcile_interval: Duration::from_secs(5),
        }
    }
}

/// Settings for one controller node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Region this node serves.
    pub region: String,
    /// Whether commands for agents attached elsewhere go through the shared queue.
    ///
    /// With a single controller every agent is local, so the queue and its
    /// dispatcher loop are skipped.
    pub cluster_mode: bool,
    /// Approval flag given to records created for newly seen agents.
    pub auto_approve: bool,
    /// Cap on shared agents one console may use per region.
    pub max_agents_per_console: usize,
    /// How long a queued command waits for its node before it expires.
    pub command_ttl: Duration,
    /// How long a telemetry registration lasts without being renewed.
    pub telemetry_target_ttl: Duration,
    pub schedule: ScheduleParams,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            region: "NONE".to_string(),
            cluster_mode: true,
            auto_approve: true,
            max_agents_per_console: 10,
            command_ttl: Duration::from_secs(10),
            telemetry_target_ttl: Duration::from_secs(60),
            schedule: ScheduleParams::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_cluster_mode(mut self, enabled: bool) -> Self {
        self.cluster_mode = enabled;
        self
    }

    pub fn with_auto_approve(mut self, enabled: bool) -> Self {
        self.auto_approve = enabled;
        self
    }

    pub fn with_max_agents_per_console(mut self, max: usize) -> Self {
        self.max_agents_per_console = max;
        self
    }

    pub fn with_command_ttl(mut self, ttl: Duration) -> Self {
        self.command_ttl = ttl;
        self
    }

    pub fn with_telemetry_target_ttl(mut self, ttl: Duration) -> Self {
        self.telemetry_target_ttl = ttl;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleParams) -> Self {
        self.schedule = schedule;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = ScheduleParams::default();
        assert_eq!(schedule.dispatch_interval, Duration::from_secs(3));
        assert_eq!(schedule.telemetry_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_builder() {
        let config = CoordinatorConfig::new("seoul")
            .with_cluster_mode(false)
            .with_max_agents_per_console(3)
            .with_command_ttl(Duration::from_secs(5));

        assert_eq!(config.region, "seoul");
        assert!(!config.cluster_mode);
        assert!(config.auto_approve);
        assert_eq!(config.max_agents_per_console, 3);
        assert_eq!(config.command_ttl, Duration::from_secs(5));
    }
}
