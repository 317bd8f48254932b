//! Simulated agents from TOML (`[[simulation.agents]]` tables)
//!
//! ```toml
//! [[simulation.agents]]
//! ip = "10.0.0.1"
//! name = "agent-1"
//! region = "seoul_owned_alice"
//! port = 12000
//! ```

use fleet_domain::AttachedAgent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimulationConfig {
    pub agents: Vec<FileSimulatedAgent>,
}

/// One agent attached at startup by `fleet-controller run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSimulatedAgent {
    pub ip: String,
    pub name: String,
    /// Reported region; defaults to the controller's own
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    12000
}

impl FileSimulatedAgent {
    pub fn to_attached(&self, controller_region: &str) -> AttachedAgent {
        AttachedAgent::new(
            self.ip.as_str(),
            self.name.as_str(),
            self.region.as_deref().unwrap_or(controller_region),
            self.port,
        )
    }
}
