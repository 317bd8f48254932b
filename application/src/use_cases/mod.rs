//! Use cases
//!
//! Coordination passes run by every controller node, and the façade that
//! schedules them.

pub mod cluster_coordinator;
pub mod collect_telemetry;
pub mod compute_quota;
pub mod dispatch_commands;
pub mod reconcile_agents;
pub(crate) mod shared;
