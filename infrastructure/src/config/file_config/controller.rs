//! Controller configuration from TOML (`[controller]` section)

use serde::{Deserialize, Serialize};

/// Settings of this controller node.
///
/// ```toml
/// [controller]
/// region = "seoul"
/// cluster_mode = true
/// auto_approve = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileControllerConfig {
    /// Region this node serves
    pub region: String,
    /// Route commands for remote agents through the shared queue
    pub cluster_mode: bool,
    /// Approve records created for newly seen agents
    pub auto_approve: bool,
}

impl Default for FileControllerConfig {
    fn default() -> Self {
        Self {
            region: "NONE".to_string(),
            cluster_mode: true,
            auto_approve: true,
        }
    }
}
