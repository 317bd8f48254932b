//! CLI entrypoint for fleet-controller
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use fleet_application::{
    AgentRecordStore, ClusterCoordinator, ClusterEventLog, ClusterPorts, RegionDirectory,
};
use fleet_domain::{
    AgentKey, AgentRecord, AgentStatus, AttachedAgent, ClusterCommand, CommandKey, OutputFormat,
    TelemetrySnapshot,
};
use fleet_infrastructure::{
    ConfigLoader, DashMapExpiringCache, FileConfig, InMemoryAgentRecordStore,
    JsonFileAgentRecordStore, JsonlClusterEventLog, LocalAttachmentRegistry,
    SimulatedAgentConnection, StaticRegionDirectory,
};
use fleet_presentation::{Cli, Command, ConsoleFormatter, OutputFormatter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()?
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    if let Command::Run {
        region: Some(region),
    } = &cli.command
    {
        file_config.controller.region = region.clone();
    }

    let format = OutputFormat::from(cli.output);
    match cli.command {
        Command::ShowConfig => show_config(&file_config, cli.config.as_deref()),
        Command::Run { .. } => {
            check_config(&file_config)?;
            run_node(&file_config, format).await
        }
        Command::Agents { region, status } => {
            check_config(&file_config)?;
            list_agents(&file_config, region, status, format).await
        }
        Command::Quota { user } => {
            check_config(&file_config)?;
            show_quota(&file_config, &user, format).await
        }
    }
}

/// Initialize logging based on verbosity level, plus a rolling file when asked.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(filter).with(console).init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "fleet-controller.log"));
    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Ok(Some(guard))
}

/// Print every config issue; refuse to continue on any error.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    if issues.is_empty() {
        return Ok(());
    }
    eprint!("{}", ConsoleFormatter::format_issues(&issues));
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("configuration has {} error(s)", errors);
    }
    Ok(())
}

fn show_config(config: &FileConfig, explicit: Option<&Path>) -> Result<()> {
    println!("Configuration sources (in priority order):");
    for line in ConfigLoader::config_sources(explicit) {
        println!("  {}", line);
    }
    println!();
    println!("{}", toml::to_string_pretty(config).context("cannot render configuration")?);

    let issues = config.validate();
    if !issues.is_empty() {
        print!("{}", ConsoleFormatter::format_issues(&issues));
    }
    Ok(())
}

async fn open_store(config: &FileConfig) -> Result<Arc<dyn AgentRecordStore>> {
    Ok(match &config.store.path {
        Some(path) => Arc::new(
            JsonFileAgentRecordStore::open(path)
                .await
                .with_context(|| format!("cannot open agent registry {}", path.display()))?,
        ),
        None => Arc::new(InMemoryAgentRecordStore::new()),
    })
}

// === Dependency Injection ===
async fn build_coordinator(
    config: &FileConfig,
    attachments: Arc<LocalAttachmentRegistry>,
) -> Result<ClusterCoordinator> {
    let coordinator_config = config.to_coordinator_config();
    let regions: Arc<dyn RegionDirectory> =
        Arc::new(StaticRegionDirectory::new(config.known_regions()));

    let mut ports = ClusterPorts::new(
        attachments,
        open_store(config).await?,
        regions,
        Arc::new(DashMapExpiringCache::<CommandKey, ClusterCommand>::new()),
        Arc::new(DashMapExpiringCache::<AgentKey, AttachedAgent>::new()),
        Arc::new(DashMapExpiringCache::<AgentKey, TelemetrySnapshot>::new()),
    );

    if let Some(path) = &config.logging.event_log {
        match JsonlClusterEventLog::open(path, coordinator_config.region.as_str()) {
            Some(log) => {
                info!(path = %log.path().display(), "Cluster event log enabled");
                let log: Arc<dyn ClusterEventLog> = Arc::new(log);
                ports = ports.with_event_log(log);
            }
            None => warn!("Cluster event log disabled"),
        }
    }

    Ok(ClusterCoordinator::new(coordinator_config, ports))
}

async fn run_node(config: &FileConfig, format: OutputFormat) -> Result<()> {
    let attachments = Arc::new(LocalAttachmentRegistry::new());
    for agent in &config.simulation.agents {
        let identity = agent.to_attached(config.controller.region.trim());
        attachments.attach(Arc::new(SimulatedAgentConnection::new(identity)));
    }

    let coordinator = build_coordinator(config, attachments.clone()).await?;
    info!(
        region = %coordinator.config().region,
        agents = attachments.len(),
        "Starting controller node"
    );
    coordinator.start();

    tokio::signal::ctrl_c()
        .await
        .context("cannot listen for Ctrl-C")?;
    info!("Shutdown requested");
    coordinator.shutdown().await;

    let agents = coordinator.list_local_region_agents().await?;
    println!("{}", ConsoleFormatter.render_agents(&agents, format));
    Ok(())
}

async fn list_agents(
    config: &FileConfig,
    region: Option<String>,
    status: Option<AgentStatus>,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(config).await?;
    let mut agents: Vec<AgentRecord> = match region {
        Some(region) => store.find_by_region_prefix(&region).await?,
        None => store.find_all().await?,
    };
    if let Some(status) = status {
        agents.retain(|a| a.status == status);
    }
    agents.sort_by(|a, b| (&a.region, &a.ip, &a.name).cmp(&(&b.region, &b.ip, &b.name)));
    println!("{}", ConsoleFormatter.render_agents(&agents, format));
    Ok(())
}

async fn show_quota(config: &FileConfig, user: &str, format: OutputFormat) -> Result<()> {
    let coordinator = build_coordinator(config, Arc::new(LocalAttachmentRegistry::new())).await?;
    let quota = coordinator.available_agents(user).await?;
    println!("{}", ConsoleFormatter.render_quota(user, &quota, format));
    Ok(())
}
