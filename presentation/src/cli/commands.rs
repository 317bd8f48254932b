//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use fleet_domain::AgentStatus;
use std::path::PathBuf;

/// Output format for listings and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, colored table
    Table,
    /// JSON output
    Json,
}

impl From<OutputFormat> for fleet_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => fleet_domain::OutputFormat::Table,
            OutputFormat::Json => fleet_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for fleet-controller
#[derive(Parser, Debug)]
#[command(name = "fleet-controller")]
#[command(author, version, about = "Cluster coordinator for load-generating agents")]
#[command(long_about = r#"
fleet-controller runs one controller node of a load-testing cluster.

Each node serves one region and holds connections to the agents of that
region. Nodes share an agent registry and a command queue; a node asked to
stop an agent it does not hold leaves the command for the node that does.

Configuration files are loaded from (in priority order):
1. FLEET_* environment variables (e.g. FLEET_CONTROLLER__REGION=seoul)
2. --config <path>     Explicit config file
3. ./fleet.toml        Project-level config
4. ~/.config/fleet-controller/config.toml   Global config

Example:
  fleet-controller run --region seoul
  fleet-controller agents --region seoul -o json
  fleet-controller quota --user alice
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write diagnostic logs to daily-rolling files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a controller node with the configured simulated agents until Ctrl-C
    Run {
        /// Region served by this node (overrides controller.region)
        #[arg(long)]
        region: Option<String>,
    },

    /// List registry records
    Agents {
        /// Only records whose region starts with this prefix
        #[arg(long)]
        region: Option<String>,

        /// Only records in this status (READY, INACTIVE, WRONG_REGION, BUSY, ERROR)
        #[arg(long)]
        status: Option<AgentStatus>,
    },

    /// Show available agents per region for a user
    Quota {
        /// User whose owned agents are counted
        #[arg(short, long)]
        user: String,
    },

    /// Show the merged configuration and where it was loaded from
    ShowConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::parse_from(["fleet-controller", "run", "--region", "seoul", "-vv"]);
        assert_eq!(
            cli.command,
            Command::Run {
                region: Some("seoul".to_string())
            }
        );
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Table);
    }

    #[test]
    fn test_parse_quota_json() {
        let cli = Cli::parse_from(["fleet-controller", "-o", "json", "quota", "--user", "alice"]);
        assert_eq!(
            cli.command,
            Command::Quota {
                user: "alice".to_string()
            }
        );
        assert_eq!(
            fleet_domain::OutputFormat::from(cli.output),
            fleet_domain::OutputFormat::Json
        );
    }

    #[test]
    fn test_parse_agents_status_filter() {
        let cli = Cli::parse_from(["fleet-controller", "agents", "--status", "wrong_region"]);
        assert_eq!(
            cli.command,
            Command::Agents {
                region: None,
                status: Some(AgentStatus::WrongRegion)
            }
        );
    }

    #[test]
    fn test_agents_rejects_unknown_status() {
        let err = Cli::try_parse_from(["fleet-controller", "agents", "--status", "sleeping"])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown agent status: sleeping"));
    }

    #[test]
    fn test_quota_requires_user() {
        assert!(Cli::try_parse_from(["fleet-controller", "quota"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
