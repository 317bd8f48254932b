//! Configuration file loading for fleet-controller
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FLEET_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./fleet.toml` or `./.fleet.toml`
//! 4. Global: `$XDG_CONFIG_HOME/fleet-controller/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileCacheConfig, FileClusterConfig, FileConfig, FileControllerConfig, FileLoggingConfig,
    FileScheduleConfig, FileSimulatedAgent, FileSimulationConfig, FileStoreConfig,
};
pub use loader::{ConfigError, ConfigLoader};
