//! Application-level configuration.
//!
//! - [`CoordinatorConfig`] - per-node region, cluster switches, caps and TTLs
//! - [`ScheduleParams`] - background loop periods

pub mod coordinator_config;

pub use coordinator_config::{CoordinatorConfig, ScheduleParams};
