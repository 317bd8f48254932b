//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "fleet-controller";
const PROJECT_FILES: [&str; 2] = ["fleet.toml", ".fleet.toml"];
const ENV_PREFIX: &str = "FLEET_";

/// Errors raised while reading configuration sources
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `FLEET_`-prefixed environment variables (`FLEET_CONTROLLER__REGION=seoul`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./fleet.toml` or `./.fleet.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/fleet-controller/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment)
    }

    /// Load only default configuration plus environment (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, ConfigError> {
        Self::extract(Figment::new().merge(Serialized::defaults(FileConfig::default())))
    }

    fn extract(figment: Figment) -> Result<FileConfig, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used
    pub fn config_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("[{}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("[FOUND] Project:  {}", path.display())),
            None => lines.push("[     ] Project:  ./fleet.toml or ./.fleet.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("[{}] Global:   {}", mark, path.display()));
        }

        lines.push(format!("[     ] Env:      {}*", ENV_PREFIX));
        lines.push("[     ] Default:  built-in defaults".to_string());
        lines
    }
}
