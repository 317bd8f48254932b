//! Cluster configuration from TOML (`[cluster]` section)

use serde::{Deserialize, Serialize};

/// Cluster-wide settings shared by every node.
///
/// ```toml
/// [cluster]
/// regions = ["seoul", "tokyo"]
/// max_agents_per_console = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClusterConfig {
    /// Every region served by some node. Empty means only this node's region.
    pub regions: Vec<String>,
    /// Cap on shared agents one console may use per region
    pub max_agents_per_console: usize,
}

impl Default for FileClusterConfig {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            max_agents_per_console: 10,
        }
    }
}
