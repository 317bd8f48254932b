//! Expiring cache port
//!
//! Defines the cluster-visible key/value cache the coordinator uses as its
//! command bus and telemetry exchange. Every node sees the same entries;
//! visibility across nodes is eventual.

use fleet_domain::{AgentKey, AttachedAgent, ClusterCommand, CommandKey, TelemetrySnapshot};
use std::time::Duration;

/// Key/value cache with per-entry time-to-live.
///
/// Implementations must make `put`, `get`, `evict` and `take` atomic per key and safe
/// to call from several loops at once. No ordering across keys is implied.
pub trait ExpiringCache<K, V>: Send + Sync {
    /// Insert or overwrite `key`. `None` keeps the entry until it is evicted.
    fn put(&self, key: K, value: V, ttl: Option<Duration>);

    /// Value for `key`, or `None` if absent or expired.
    fn get(&self, key: &K) -> Option<V>;

    /// Remove `key` if present.
    fn evict(&self, key: &K);

    /// Remove `key` and return its value, or `None` if absent or expired.
    ///
    /// Atomic per key: a value put after the removal is left in place.
    fn take(&self, key: &K) -> Option<V>;

    /// Keys of every entry still alive at the time of the call.
    ///
    /// Expired entries are never returned; implementations may drop them here.
    fn keys_near_expiry(&self) -> Vec<K>;
}

/// Queue of commands waiting for the node that serves their region.
pub type CommandQueue = dyn ExpiringCache<CommandKey, ClusterCommand>;

/// Agents registered for telemetry collection.
pub type TelemetryTargetCache = dyn ExpiringCache<AgentKey, AttachedAgent>;

/// Latest telemetry snapshot per agent.
pub type TelemetrySnapshotCache = dyn ExpiringCache<AgentKey, TelemetrySnapshot>;
