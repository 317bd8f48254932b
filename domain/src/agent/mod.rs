//! Agent domain.
//!
//! - [`entities::AgentRecord`] - durable registry entry for one agent slot
//! - [`entities::AgentStatus`] - reported or coordinator-assigned status
//! - [`value_objects::AgentKey`] - cluster-wide `<ip>_<name>` key
//! - [`value_objects::AttachedAgent`] - live connection identity

pub mod entities;
pub mod value_objects;
