//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into
//! [`CoordinatorConfig`] once validated.

mod cluster;
mod controller;
mod simulation;
mod storage;
mod timing;

pub use cluster::FileClusterConfig;
pub use controller::FileControllerConfig;
pub use simulation::{FileSimulatedAgent, FileSimulationConfig};
pub use storage::{FileLoggingConfig, FileStoreConfig};
pub use timing::{FileCacheConfig, FileScheduleConfig};

use fleet_application::CoordinatorConfig;
use fleet_domain::command::KEY_SEPARATOR;
use fleet_domain::{ConfigIssue, ConfigIssueCode, OWNED_MARKER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub controller: FileControllerConfig,
    pub cluster: FileClusterConfig,
    pub schedule: FileScheduleConfig,
    pub cache: FileCacheConfig,
    pub store: FileStoreConfig,
    pub logging: FileLoggingConfig,
    pub simulation: FileSimulationConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let region = self.controller.region.trim();

        if region.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyRegion,
                "controller.region cannot be empty",
            ));
        }

        for name in std::iter::once(region).chain(self.listed_regions()) {
            if name.contains(OWNED_MARKER) || name.contains(KEY_SEPARATOR) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ReservedRegionName {
                        region: name.to_string(),
                    },
                    format!(
                        "region '{}' must not contain '{}' or '{}'",
                        name, OWNED_MARKER, KEY_SEPARATOR
                    ),
                ));
            }
        }

        if !region.is_empty()
            && self.listed_regions().next().is_some()
            && !self.listed_regions().any(|r| r == region)
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownControllerRegion {
                    region: region.to_string(),
                },
                format!(
                    "controller.region '{}' is not listed in cluster.regions",
                    region
                ),
            ));
        }

        for (field, value) in self
            .schedule
            .fields()
            .into_iter()
            .chain(self.cache.fields())
        {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroDuration {
                        field: field.to_string(),
                    },
                    format!("{} cannot be 0", field),
                ));
            }
        }

        if self.cluster.max_agents_per_console == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroConsoleCap,
                "cluster.max_agents_per_console is 0: only owned agents will be available",
            ));
        }

        issues
    }

    /// Regions known to the cluster. The controller's own region is always included.
    pub fn known_regions(&self) -> BTreeSet<String> {
        let mut regions: BTreeSet<String> =
            self.listed_regions().map(str::to_string).collect();
        let own = self.controller.region.trim();
        if !own.is_empty() {
            regions.insert(own.to_string());
        }
        regions
    }

    /// `cluster.regions` entries, trimmed, blanks skipped.
    fn listed_regions(&self) -> impl Iterator<Item = &str> {
        self.cluster
            .regions
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
    }

    pub fn to_coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::new(self.controller.region.trim())
            .with_cluster_mode(self.controller.cluster_mode)
            .with_auto_approve(self.controller.auto_approve)
            .with_max_agents_per_console(self.cluster.max_agents_per_console)
            .with_command_ttl(Duration::from_secs(self.cache.command_ttl_secs))
            .with_telemetry_target_ttl(Duration::from_secs(self.cache.telemetry_target_ttl_secs))
            .with_schedule(self.schedule.to_schedule_params())
    }
}
