//! Cluster coordinator
//!
//! Façade over the coordination use cases of one controller node. It owns the
//! dispatcher, reconciliation engine, telemetry pipeline and quota calculator,
//! runs their background loops, and exposes the operations callers use to act
//! on agents without knowing which node holds them.
//!
//! Nothing here talks to another node directly: an action on an agent attached
//! elsewhere becomes a queued command that the owning node picks up on its next
//! dispatch pass.

use crate::config::CoordinatorConfig;
use crate::ports::agent_record_store::{AgentRecordStore, StoreError};
use crate::ports::attachment_registry::{AttachmentError, AttachmentRegistry};
use crate::ports::cluster_event_log::{ClusterEventLog, NoClusterEventLog};
use crate::ports::expiring_cache::{CommandQueue, TelemetrySnapshotCache, TelemetryTargetCache};
use crate::ports::region_directory::RegionDirectory;
use crate::use_cases::collect_telemetry::TelemetryPipeline;
use crate::use_cases::compute_quota::QuotaCalculator;
use crate::use_cases::dispatch_commands::{CommandDispatcher, DispatchReport};
use crate::use_cases::reconcile_agents::{ReconcileError, ReconcileReport, ReconciliationEngine};
use crate::use_cases::shared::spawn_periodic;
use fleet_domain::{
    AgentRecord, AttachedAgent, ClusterCommand, CommandType, RegionQuota, TelemetrySnapshot,
};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Adapters a coordinator is built from.
///
/// The three caches must be the cluster-visible ones shared by every node;
/// the attachment registry is this process's own.
pub struct ClusterPorts {
    pub attachments: Arc<dyn AttachmentRegistry>,
    pub store: Arc<dyn AgentRecordStore>,
    pub regions: Arc<dyn RegionDirectory>,
    pub command_queue: Arc<CommandQueue>,
    pub telemetry_targets: Arc<TelemetryTargetCache>,
    pub telemetry_snapshots: Arc<TelemetrySnapshotCache>,
    pub event_log: Arc<dyn ClusterEventLog>,
}

impl ClusterPorts {
    pub fn new(
        attachments: Arc<dyn AttachmentRegistry>,
        store: Arc<dyn AgentRecordStore>,
        regions: Arc<dyn RegionDirectory>,
        command_queue: Arc<CommandQueue>,
        telemetry_targets: Arc<TelemetryTargetCache>,
        telemetry_snapshots: Arc<TelemetrySnapshotCache>,
    ) -> Self {
        Self {
            attachments,
            store,
            regions,
            command_queue,
            telemetry_targets,
            telemetry_snapshots,
            event_log: Arc::new(NoClusterEventLog),
        }
    }

    /// Create with a cluster event log.
    pub fn with_event_log(mut self, event_log: Arc<dyn ClusterEventLog>) -> Self {
        self.event_log = event_log;
        self
    }
}

struct BackgroundTasks {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// Coordination façade for one controller node.
pub struct ClusterCoordinator {
    config: CoordinatorConfig,
    attachments: Arc<dyn AttachmentRegistry>,
    store: Arc<dyn AgentRecordStore>,
    dispatcher: Arc<CommandDispatcher>,
    reconciler: Arc<ReconciliationEngine>,
    telemetry: Arc<TelemetryPipeline>,
    quota: QuotaCalculator,
    background: Mutex<Option<BackgroundTasks>>,
}

impl ClusterCoordinator {
    pub fn new(config: CoordinatorConfig, ports: ClusterPorts) -> Self {
        let telemetry = Arc::new(TelemetryPipeline::new(
            ports.telemetry_targets,
            ports.telemetry_snapshots,
            ports.attachments.clone(),
            config.telemetry_target_ttl,
        ));
        let dispatcher = Arc::new(
            CommandDispatcher::new(
                config.region.as_str(),
                ports.command_queue,
                ports.attachments.clone(),
                telemetry.clone(),
                config.command_ttl,
            )
            .with_event_log(ports.event_log.clone()),
        );
        let reconciler = Arc::new(
            ReconciliationEngine::new(
                config.region.as_str(),
                ports.attachments.clone(),
                ports.store.clone(),
                ports.regions.clone(),
            )
            .with_auto_approve(config.auto_approve)
            .with_event_log(ports.event_log),
        );
        let quota = QuotaCalculator::new(
            ports.store.clone(),
            ports.regions,
            config.max_agents_per_console,
        );

        Self {
            config,
            attachments: ports.attachments,
            store: ports.store,
            dispatcher,
            reconciler,
            telemetry,
            quota,
            background: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    // ==================== Lifecycle ====================

    /// Start the background loops. Must be called inside a Tokio runtime.
    ///
    /// Calling `start` on a running coordinator does nothing.
    pub fn start(&self) {
        let mut background = self.lock_background();
        if background.is_some() {
            warn!(region = %self.config.region, "Coordinator already running");
            return;
        }

        let token = CancellationToken::new();
        let schedule = &self.config.schedule;
        let mut handles = Vec::new();

        if self.config.cluster_mode {
            let dispatcher = self.dispatcher.clone();
            handles.push(spawn_periodic(
                "dispatch",
                schedule.dispatch_interval,
                token.clone(),
                move || {
                    let dispatcher = dispatcher.clone();
                    async move {
                        dispatcher.dispatch_pending().await;
                    }
                },
            ));
        }

        let telemetry = self.telemetry.clone();
        handles.push(spawn_periodic(
            "telemetry",
            schedule.telemetry_interval,
            token.clone(),
            move || {
                let telemetry = telemetry.clone();
                async move {
                    telemetry.collect().await;
                }
            },
        ));

        let reconciler = self.reconciler.clone();
        handles.push(spawn_periodic(
            "reconcile",
            schedule.reconcile_interval,
            token.clone(),
            move || {
                let reconciler = reconciler.clone();
                async move {
                    if let Err(e) = reconciler.reconcile().await {
                        error!("Agent reconciliation failed, retrying next interval: {}", e);
                    }
                }
            },
        ));

        info!(
            region = %self.config.region,
            cluster_mode = self.config.cluster_mode,
            "Cluster coordinator started"
        );
        *background = Some(BackgroundTasks { token, handles });
    }

    /// Stop the background loops and wait for them to finish their current pass.
    pub async fn shutdown(&self) {
        let Some(tasks) = self.lock_background().take() else {
            return;
        };
        tasks.token.cancel();
        for result in futures::future::join_all(tasks.handles).await {
            if let Err(e) = result {
                warn!("Background loop ended abnormally: {}", e);
            }
        }
        info!(region = %self.config.region, "Cluster coordinator stopped");
    }

    pub fn is_running(&self) -> bool {
        self.lock_background().is_some()
    }

    fn lock_background(&self) -> std::sync::MutexGuard<'_, Option<BackgroundTasks>> {
        self.background
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ==================== Agent operations ====================

    /// Stop an agent wherever it is attached. Fire-and-forget.
    pub async fn stop(&self, record: &AgentRecord) {
        self.send(record, CommandType::StopAgent).await;
    }

    /// Ask the node holding an agent to publish its telemetry. Fire-and-forget.
    pub async fn request_telemetry_share(&self, record: &AgentRecord) {
        self.send(record, CommandType::ShareTelemetry).await;
    }

    async fn send(&self, record: &AgentRecord, command_type: CommandType) {
        if let Some(agent) = self.attachments.resolve(&record.ip, &record.name) {
            if let Err(e) = self.dispatcher.execute(&agent, command_type).await {
                warn!(agent = %record.key(), command = %command_type, "Local command failed: {}", e);
            }
            return;
        }

        if !self.config.cluster_mode {
            debug!(agent = %record.key(), command = %command_type, "Agent not attached, nothing to do");
            return;
        }

        self.dispatcher.enqueue(
            &record.region,
            &record.key(),
            ClusterCommand::for_record(record, command_type),
        );
    }

    /// Stop an agent known to be attached to this node.
    pub async fn stop_attached(&self, agent: &AttachedAgent) -> Result<(), AttachmentError> {
        self.dispatcher.execute(agent, CommandType::StopAgent).await
    }

    /// Register (or renew) an attached agent for telemetry collection.
    pub fn register_telemetry_target(&self, agent: AttachedAgent) {
        self.telemetry.register_target(agent);
    }

    /// Last telemetry snapshot for an agent, empty if none was collected.
    pub fn telemetry_snapshot(&self, ip: &str, name: &str) -> TelemetrySnapshot {
        self.telemetry.snapshot(ip, name)
    }

    // ==================== Registry queries ====================

    /// Available agents per region for `user_id`.
    pub async fn available_agents(&self, user_id: &str) -> Result<RegionQuota, StoreError> {
        self.quota.available_agents(user_id).await
    }

    /// Registry records of this node's region, owned agents included.
    pub async fn list_local_region_agents(&self) -> Result<Vec<AgentRecord>, StoreError> {
        self.store.find_by_region_prefix(&self.config.region).await
    }

    // ==================== Single passes ====================

    pub async fn reconcile(&self) -> Result<ReconcileReport, ReconcileError> {
        self.reconciler.reconcile().await
    }

    pub async fn dispatch_pending(&self) -> DispatchReport {
        self.dispatcher.dispatch_pending().await
    }

    pub async fn collect_telemetry(&self) -> usize {
        self.telemetry.collect().await
    }
}
