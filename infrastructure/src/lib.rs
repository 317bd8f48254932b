//! Infrastructure layer for fleet-controller
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod attachment;
pub mod cache;
pub mod config;
pub mod logging;
pub mod region;
pub mod store;

// Re-export commonly used types
pub use attachment::{AgentConnection, LocalAttachmentRegistry, SimulatedAgentConnection};
pub use cache::DashMapExpiringCache;
pub use config::{ConfigError, ConfigLoader, FileConfig, FileSimulatedAgent};
pub use logging::JsonlClusterEventLog;
pub use region::StaticRegionDirectory;
pub use store::{InMemoryAgentRecordStore, JsonFileAgentRecordStore};
