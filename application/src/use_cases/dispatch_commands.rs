//! Command dispatch use case
//!
//! Controller nodes share no link but the command queue. A node that cannot
//! act on an agent itself parks a [`ClusterCommand`] under
//! `<region>|<agentKey>`; the node serving that region drains its own prefix
//! on every pass.
//!
//! Delivery is at most once and best effort. An entry is consumed by its one
//! attempt whatever the outcome, and a command nobody picks up before its
//! TTL simply disappears. Both commands are safe to lose: stopping is
//! idempotent and a telemetry share can be requested again.

use crate::ports::attachment_registry::{AttachmentError, AttachmentRegistry};
use crate::ports::cluster_event_log::{ClusterEvent, ClusterEventLog, NoClusterEventLog};
use crate::ports::expiring_cache::CommandQueue;
use crate::use_cases::collect_telemetry::TelemetryPipeline;
use fleet_domain::{AgentKey, AttachedAgent, ClusterCommand, CommandKey, CommandType};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Outcome counts of one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands executed against a local attachment.
    pub executed: usize,
    /// Commands whose agent is not attached here.
    pub unresolved: usize,
    /// Commands whose execution raised an error.
    pub failed: usize,
}

impl DispatchReport {
    pub fn total(&self) -> usize {
        self.executed + self.unresolved + self.failed
    }
}

/// Enqueues commands and drains the ones addressed to this node's region.
pub struct CommandDispatcher {
    region: String,
    queue: Arc<CommandQueue>,
    attachments: Arc<dyn AttachmentRegistry>,
    telemetry: Arc<TelemetryPipeline>,
    command_ttl: Duration,
    event_log: Arc<dyn ClusterEventLog>,
}

impl CommandDispatcher {
    pub fn new(
        region: impl Into<String>,
        queue: Arc<CommandQueue>,
        attachments: Arc<dyn AttachmentRegistry>,
        telemetry: Arc<TelemetryPipeline>,
        command_ttl: Duration,
    ) -> Self {
        Self {
            region: region.into(),
            queue,
            attachments,
            telemetry,
            command_ttl,
            event_log: Arc::new(NoClusterEventLog),
        }
    }

    /// Create with a cluster event log.
    pub fn with_event_log(mut self, event_log: Arc<dyn ClusterEventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    /// Park a command for the node serving `region`.
    ///
    /// Overwrites any command already pending for the same agent; the caller
    /// gets no delivery acknowledgment.
    pub fn enqueue(&self, region: &str, agent_key: &AgentKey, command: ClusterCommand) -> CommandKey {
        let key = CommandKey::new(region, agent_key);
        debug!(key = %key, command = %command.command_type, "Command enqueued");
        self.event_log.log(ClusterEvent::new(
            "command_enqueued",
            serde_json::json!({
                "key": key.as_str(),
                "agent_ip": command.agent_ip,
                "agent_name": command.agent_name,
                "command": command.command_type.as_str(),
            }),
        ));
        self.queue.put(key.clone(), command, Some(self.command_ttl));
        key
    }

    /// Run a command against an agent attached to this node.
    pub async fn execute(
        &self,
        agent: &AttachedAgent,
        command_type: CommandType,
    ) -> Result<(), AttachmentError> {
        match command_type {
            CommandType::StopAgent => self.attachments.stop(agent).await,
            CommandType::ShareTelemetry => {
                self.attachments.share_telemetry(agent).await?;
                self.telemetry.register_target(agent.clone());
                Ok(())
            }
        }
    }

    /// Drain every pending command addressed to this node's region.
    ///
    /// Errors never abort the pass. Each entry is removed from the queue
    /// before its single attempt.
    pub async fn dispatch_pending(&self) -> DispatchReport {
        let mut report = DispatchReport::default();

        for key in self.queue.keys_near_expiry() {
            if !key.belongs_to(&self.region) {
                continue;
            }
            // Claimed before executing: a command put while this one runs
            // stays queued for the next pass.
            if let Some(command) = self.queue.take(&key) {
                self.dispatch_one(&key, &command, &mut report).await;
            }
        }

        if report.total() > 0 {
            info!(
                region = %self.region,
                executed = report.executed,
                unresolved = report.unresolved,
                failed = report.failed,
                "Dispatch pass finished"
            );
        }
        report
    }

    async fn dispatch_one(&self, key: &CommandKey, command: &ClusterCommand, report: &mut DispatchReport) {
        let Some(agent) = self
            .attachments
            .resolve(&command.agent_ip, &command.agent_name)
        else {
            debug!(key = %key, "Command target not attached here, dropping");
            report.unresolved += 1;
            self.log_outcome("command_dropped", key, command, None);
            return;
        };

        match self.execute(&agent, command.command_type).await {
            Ok(()) => {
                report.executed += 1;
                self.log_outcome("command_dispatched", key, command, None);
            }
            Err(e) => {
                error!(key = %key, command = %command.command_type, "Command failed: {}", e);
                report.failed += 1;
                self.log_outcome("command_dropped", key, command, Some(e.to_string()));
            }
        }
    }

    fn log_outcome(
        &self,
        event_type: &'static str,
        key: &CommandKey,
        command: &ClusterCommand,
        error: Option<String>,
    ) {
        self.event_log.log(ClusterEvent::new(
            event_type,
            serde_json::json!({
                "key": key.as_str(),
                "command": command.command_type.as_str(),
                "error": error,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::expiring_cache::ExpiringCache;
    use crate::test_support::{MapCache, MockAttachments};
    use fleet_domain::TelemetrySnapshot;

    struct Fixture {
        queue: Arc<MapCache<CommandKey, ClusterCommand>>,
        attachments: Arc<MockAttachments>,
        telemetry: Arc<TelemetryPipeline>,
        dispatcher: CommandDispatcher,
    }

    fn fixture(region: &str, agents: Vec<AttachedAgent>) -> Fixture {
        let queue = Arc::new(MapCache::<CommandKey, ClusterCommand>::default());
        let attachments = Arc::new(MockAttachments::with(agents));
        let telemetry = Arc::new(TelemetryPipeline::new(
            Arc::new(MapCache::<AgentKey, AttachedAgent>::default()),
            Arc::new(MapCache::<AgentKey, TelemetrySnapshot>::default()),
            attachments.clone(),
            Duration::from_secs(60),
        ));
        let dispatcher = CommandDispatcher::new(
            region,
            queue.clone(),
            attachments.clone(),
            telemetry.clone(),
            Duration::from_secs(10),
        );
        Fixture {
            queue,
            attachments,
            telemetry,
            dispatcher,
        }
    }

    fn stop(ip: &str, name: &str) -> ClusterCommand {
        ClusterCommand::new(ip, name, CommandType::StopAgent)
    }

    #[tokio::test]
    async fn test_local_command_executes_and_is_evicted() {
        let agent = AttachedAgent::new("10.0.0.1", "a1", "seoul", 12000);
        let f = fixture("seoul", vec![agent.clone()]);

        f.dispatcher.enqueue("seoul", &agent.key(), stop("10.0.0.1", "a1"));
        let report = f.dispatcher.dispatch_pending().await;

        assert_eq!(report.executed, 1);
        assert_eq!(f.attachments.stopped_keys(), vec![agent.key()]);
        assert_eq!(f.queue.len(), 0);
    }

    #[tokio::test]
    async fn test_reenqueue_overwrites_pending_command() {
        let agent = AttachedAgent::new("10.0.0.1", "a1", "seoul", 12000);
        let f = fixture("seoul", vec![agent.clone()]);

        f.dispatcher.enqueue("seoul", &agent.key(), stop("10.0.0.1", "a1"));
        f.dispatcher.enqueue(
            "seoul",
            &agent.key(),
            ClusterCommand::new("10.0.0.1", "a1", CommandType::ShareTelemetry),
        );
        let report = f.dispatcher.dispatch_pending().await;

        assert_eq!(report.executed, 1);
        assert!(f.attachments.stopped_keys().is_empty());
        assert_eq!(f.attachments.shared_keys(), vec![agent.key()]);
    }

    #[tokio::test]
    async fn test_share_registers_telemetry_target() {
        let agent = AttachedAgent::new("10.0.0.1", "a1", "seoul", 12000);
        let f = fixture("seoul", vec![agent.clone()]);

        f.dispatcher.enqueue(
            "seoul",
            &agent.key(),
            ClusterCommand::new("10.0.0.1", "a1", CommandType::ShareTelemetry),
        );
        f.dispatcher.dispatch_pending().await;

        assert_eq!(f.telemetry.collect().await, 1);
        assert!(!f.telemetry.snapshot("10.0.0.1", "a1").is_empty());
    }

    #[tokio::test]
    async fn test_other_region_commands_are_left_alone() {
        let f = fixture("seoul", vec![]);
        let key = AgentKey::new("10.0.0.2", "b1");

        f.dispatcher.enqueue("tokyo", &key, stop("10.0.0.2", "b1"));
        let report = f.dispatcher.dispatch_pending().await;

        assert_eq!(report.total(), 0);
        assert!(f.queue.get(&CommandKey::new("tokyo", &key)).is_some());
    }

    #[tokio::test]
    async fn test_unresolved_command_is_evicted() {
        let f = fixture("seoul", vec![]);
        let key = AgentKey::new("10.0.0.3", "gone");

        f.dispatcher.enqueue("seoul", &key, stop("10.0.0.3", "gone"));
        let report = f.dispatcher.dispatch_pending().await;

        assert_eq!(report.unresolved, 1);
        assert_eq!(f.queue.len(), 0);
    }

    #[tokio::test]
    async fn test_failed_command_is_evicted_and_pass_continues() {
        let a1 = AttachedAgent::new("10.0.0.1", "a1", "seoul", 12000);
        let a2 = AttachedAgent::new("10.0.0.2", "a2", "seoul", 12000);
        let f = fixture("seoul", vec![a1.clone(), a2.clone()]);
        f.attachments.fail_actions();

        f.dispatcher.enqueue("seoul", &a1.key(), stop("10.0.0.1", "a1"));
        f.dispatcher.enqueue("seoul", &a2.key(), stop("10.0.0.2", "a2"));
        let report = f.dispatcher.dispatch_pending().await;

        assert_eq!(report.failed, 2);
        assert_eq!(f.queue.len(), 0);
    }

    #[tokio::test]
    async fn test_command_put_during_execution_survives_the_pass() {
        let agent = AttachedAgent::new("10.0.0.1", "a1", "seoul", 12000);
        let f = fixture("seoul", vec![agent.clone()]);
        let queue = f.queue.clone();
        f.attachments.on_stop(move |stopped| {
            queue.put(
                CommandKey::new("seoul", &stopped.key()),
                ClusterCommand::new(stopped.ip.as_str(), stopped.name.as_str(), CommandType::ShareTelemetry),
                Some(Duration::from_secs(10)),
            );
        });

        f.dispatcher.enqueue("seoul", &agent.key(), stop("10.0.0.1", "a1"));
        let report = f.dispatcher.dispatch_pending().await;

        assert_eq!(report.executed, 1);
        assert_eq!(f.attachments.stopped_keys(), vec![agent.key()]);
        let pending = f.queue.get(&CommandKey::new("seoul", &agent.key())).unwrap();
        assert_eq!(pending.command_type, CommandType::ShareTelemetry);

        let report = f.dispatcher.dispatch_pending().await;
        assert_eq!(report.executed, 1);
        assert_eq!(f.attachments.shared_keys(), vec![agent.key()]);
        assert_eq!(f.queue.len(), 0);
    }

    #[tokio::test]
    async fn test_owned_agent_routes_to_physical_region() {
        let agent = AttachedAgent::new("10.0.0.1", "a1", "seoul_owned_alice", 12000);
        let f = fixture("seoul", vec![agent.clone()]);

        let key = f
            .dispatcher
            .enqueue("seoul_owned_alice", &agent.key(), stop("10.0.0.1", "a1"));
        assert_eq!(key.as_str(), "seoul|10.0.0.1_a1");

        let report = f.dispatcher.dispatch_pending().await;
        assert_eq!(report.executed, 1);
    }
}
