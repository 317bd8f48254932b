//! Logging infrastructure: structured cluster event logging.
//!
//! Provides [`JsonlClusterEventLog`], an append-only JSONL writer that
//! implements the [`ClusterEventLog`](fleet_application::ClusterEventLog) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlClusterEventLog;
