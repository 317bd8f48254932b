//! Application layer for fleet-controller
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{CoordinatorConfig, ScheduleParams};
pub use ports::{
    agent_record_store::{AgentRecordStore, RecordBatch, StoreError},
    attachment_registry::{AttachmentError, AttachmentRegistry},
    cluster_event_log::{ClusterEvent, ClusterEventLog, NoClusterEventLog},
    expiring_cache::{CommandQueue, ExpiringCache, TelemetrySnapshotCache, TelemetryTargetCache},
    region_directory::RegionDirectory,
};
pub use use_cases::cluster_coordinator::{ClusterCoordinator, ClusterPorts};
pub use use_cases::collect_telemetry::TelemetryPipeline;
pub use use_cases::compute_quota::QuotaCalculator;
pub use use_cases::dispatch_commands::{CommandDispatcher, DispatchReport};
pub use use_cases::reconcile_agents::{ReconcileError, ReconcileReport, ReconciliationEngine};
