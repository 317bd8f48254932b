//! Agent telemetry domain.

use serde::{Deserialize, Serialize};

/// Most recent system metrics collected from one agent.
///
/// The zero value (`Default`) stands in for "nothing collected yet".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub ip: String,
    pub cpu_used_percentage: f32,
    /// Total memory in KiB.
    pub total_memory: u64,
    /// Free memory in KiB.
    pub free_memory: u64,
    /// Network bytes received per second.
    pub received_per_sec: u64,
    /// Network bytes sent per second.
    pub sent_per_sec: u64,
    /// Collection time in epoch milliseconds, 0 when never collected.
    pub collect_time: u64,
}

impl TelemetrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.collect_time == 0
    }

    pub fn used_memory(&self) -> u64 {
        self.total_memory.saturating_sub(self.free_memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = TelemetrySnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.used_memory(), 0);
    }

    #[test]
    fn test_used_memory_saturates() {
        let snapshot = TelemetrySnapshot {
            total_memory: 100,
            free_memory: 150,
            collect_time: 1,
            ..Default::default()
        };
        assert_eq!(snapshot.used_memory(), 0);
        assert!(!snapshot.is_empty());
    }
}
