//! Port for structured cluster event logging.
//!
//! Defines the [`ClusterEventLog`] trait for recording coordinator events
//! (commands queued and dispatched, reconciliation outcomes) to an audit log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures what the
//! coordinator did to which agent in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured cluster event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields; the adapter stamps the time.
pub struct ClusterEvent {
    /// Event type identifier (e.g., "command_enqueued", "reconcile_completed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ClusterEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging cluster events to a structured log.
///
/// `log` is synchronous and non-fallible so it can never disturb a
/// coordination pass; logging failures are ignored.
pub trait ClusterEventLog: Send + Sync {
    /// Record a cluster event.
    fn log(&self, event: ClusterEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoClusterEventLog;

impl ClusterEventLog for NoClusterEventLog {
    fn log(&self, _event: ClusterEvent) {}
}
