//! Cluster-visible caches.
//!
//! [`DashMapExpiringCache`] backs the command queue and the telemetry
//! exchange when every node runs in one process (tests, simulation, a
//! single-controller deployment). A distributed cache implements the same
//! [`ExpiringCache`](fleet_application::ExpiringCache) port.

mod dashmap_cache;

pub use dashmap_cache::DashMapExpiringCache;
