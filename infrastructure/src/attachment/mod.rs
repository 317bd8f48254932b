//! Attachment registry adapters.
//!
//! [`LocalAttachmentRegistry`] tracks the agent connections held by this
//! process. What sits behind a connection is abstracted by [`AgentConnection`];
//! [`SimulatedAgentConnection`] stands in for a real agent in tests and in the
//! `run` command.

mod connection;
mod registry;

pub use connection::{AgentConnection, SimulatedAgentConnection};
pub use registry::LocalAttachmentRegistry;
