//! Output formatter trait

use fleet_domain::{AgentRecord, ConfigIssue, OutputFormat, RegionQuota};

/// Trait for rendering command results
pub trait OutputFormatter {
    /// Registry records, one per row
    fn format_agents(&self, agents: &[AgentRecord]) -> String;

    /// Available agents per region for one user
    fn format_quota(&self, user: &str, quota: &RegionQuota) -> String;

    /// Configuration problems found at startup
    fn format_issues(&self, issues: &[ConfigIssue]) -> String;

    /// Dispatch on the requested format
    fn render_agents(&self, agents: &[AgentRecord], format: OutputFormat) -> String;

    fn render_quota(&self, user: &str, quota: &RegionQuota, format: OutputFormat) -> String;
}
