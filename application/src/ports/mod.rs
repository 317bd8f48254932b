//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_record_store;
pub mod attachment_registry;
pub mod cluster_event_log;
pub mod expiring_cache;
pub mod region_directory;
