//! Domain layer for fleet-controller
//!
//! This crate contains the agent registry model, region parsing, cluster
//! commands, telemetry snapshots and quota arithmetic.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Regions
//!
//! Each controller node serves one region. An agent's region string is either
//! `<region>` (a shared agent) or `<region>_owned_<userId>` (reserved for one
//! user); see [`AgentRegion`].
//!
//! ## Records and attachments
//!
//! - **AgentRecord**: durable, cluster-wide registry entry, one per `(ip, name)`
//! - **AttachedAgent**: live connection held by exactly one controller process
//!
//! ## Commands
//!
//! A [`ClusterCommand`] is parked in a shared cache under a [`CommandKey`]
//! (`<region>|<agentKey>`) until the node serving that region picks it up.

pub mod agent;
pub mod command;
pub mod config;
pub mod core;
pub mod quota;
pub mod region;
pub mod telemetry;

// Re-export commonly used types
pub use agent::{
    entities::{AgentRecord, AgentStatus},
    value_objects::{AgentKey, AttachedAgent},
};
pub use command::{ClusterCommand, CommandKey, CommandType};
pub use config::{
    OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::error::DomainError;
pub use quota::{QuotaTally, RegionCounts, RegionQuota};
pub use region::{AgentRegion, OWNED_MARKER, extract_region};
pub use telemetry::TelemetrySnapshot;
