//! Loop and cache timing from TOML (`[schedule]` and `[cache]` sections)

use fleet_application::ScheduleParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Background loop periods in milliseconds.
///
/// ```toml
/// [schedule]
/// dispatch_interval_ms = 3000
/// telemetry_interval_ms = 1000
/// reconcile_interval_ms = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScheduleConfig {
    pub dispatch_interval_ms: u64,
    pub telemetry_interval_ms: u64,
    pub reconcile_interval_ms: u64,
}

impl Default for FileScheduleConfig {
    fn default() -> Self {
        Self {
            dispatch_interval_ms: 3000,
            telemetry_interval_ms: 1000,
            reconcile_interval_ms: 5000,
        }
    }
}

impl FileScheduleConfig {
    pub fn to_schedule_params(&self) -> ScheduleParams {
        ScheduleParams {
            dispatch_interval: Duration::from_millis(self.dispatch_interval_ms),
            telemetry_interval: Duration::from_millis(self.telemetry_interval_ms),
            reconcile_interval: Duration::from_millis(self.reconcile_interval_ms),
        }
    }

    pub(super) fn fields(&self) -> [(&'static str, u64); 3] {
        [
            ("schedule.dispatch_interval_ms", self.dispatch_interval_ms),
            ("schedule.telemetry_interval_ms", self.telemetry_interval_ms),
            ("schedule.reconcile_interval_ms", self.reconcile_interval_ms),
        ]
    }
}

/// Entry lifetimes in the shared caches, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// How long a queued command waits for its node
    pub command_ttl_secs: u64,
    /// How long a telemetry registration lasts without renewal
    pub telemetry_target_ttl_secs: u64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            command_ttl_secs: 10,
            telemetry_target_ttl_secs: 60,
        }
    }
}

impl FileCacheConfig {
    pub(super) fn fields(&self) -> [(&'static str, u64); 2] {
        [
            ("cache.command_ttl_secs", self.command_ttl_secs),
            ("cache.telemetry_target_ttl_secs", self.telemetry_target_ttl_secs),
        ]
    }
}
