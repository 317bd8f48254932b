//! Persistence settings from TOML (`[store]` and `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Agent registry location.
///
/// Without a `path` the registry lives in memory and is lost on exit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    pub path: Option<PathBuf>,
}

/// Cluster event log location. Disabled when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub event_log: Option<PathBuf>,
}
