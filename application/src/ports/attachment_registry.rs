//! Attachment registry port
//!
//! Defines the interface to the agent connections held by this controller
//! process. The wire protocol behind a connection is opaque here.

use async_trait::async_trait;
use fleet_domain::{AttachedAgent, TelemetrySnapshot};
use thiserror::Error;

/// Errors that can occur while acting on an attached agent
#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("Agent not attached: {0}")]
    NotAttached(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// In-memory set of agents attached to this node.
///
/// Implementations must tolerate concurrent iteration and mutation from the
/// background loops and from externally triggered calls.
#[async_trait]
pub trait AttachmentRegistry: Send + Sync {
    /// Every agent currently attached to this node.
    fn list_attached(&self) -> Vec<AttachedAgent>;

    /// The attached agent with this ip and name, if it is connected here.
    fn resolve(&self, ip: &str, name: &str) -> Option<AttachedAgent>;

    /// Ask the agent process to shut down.
    async fn stop(&self, agent: &AttachedAgent) -> Result<(), AttachmentError>;

    /// Ask the agent to start reporting system telemetry.
    async fn share_telemetry(&self, agent: &AttachedAgent) -> Result<(), AttachmentError>;

    /// Read the agent's current system telemetry.
    async fn current_snapshot(
        &self,
        agent: &AttachedAgent,
    ) -> Result<TelemetrySnapshot, AttachmentError>;
}
