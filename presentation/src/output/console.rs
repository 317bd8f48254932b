//! Console output formatter for registry listings and quotas

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use fleet_domain::{AgentRecord, AgentStatus, ConfigIssue, OutputFormat, RegionQuota, Severity};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format registry records as an aligned table
    pub fn format_agents(agents: &[AgentRecord]) -> String {
        if agents.is_empty() {
            return format!("{}\n", "No agents registered.".dimmed());
        }

        let ip_width = column_width(agents.iter().map(|a| a.ip.len()), "IP");
        let name_width = column_width(agents.iter().map(|a| a.name.len()), "NAME");
        let region_width = column_width(agents.iter().map(|a| a.region.len()), "REGION");

        let mut output = String::new();
        output.push_str(&format!(
            "{}\n",
            format!(
                "{:<ip_width$}  {:<name_width$}  {:<region_width$}  {:>5}  {:<12}  {}",
                "IP", "NAME", "REGION", "PORT", "STATUS", "APPROVED"
            )
            .cyan()
            .bold()
        ));

        for agent in agents {
            let status = format!("{:<12}", agent.status.as_str());
            output.push_str(&format!(
                "{:<ip_width$}  {:<name_width$}  {:<region_width$}  {:>5}  {}  {}\n",
                agent.ip,
                agent.name,
                agent.region,
                agent.port,
                Self::status_colored(agent.status, &status),
                if agent.approved { "yes".green() } else { "no".dimmed() },
            ));
        }

        output.push_str(&format!("{}\n", format!("{} agent(s)", agents.len()).dimmed()));
        output
    }

    /// Format a quota report as a table
    pub fn format_quota(user: &str, quota: &RegionQuota) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n\n",
            "Available agents for".cyan().bold(),
            user.bold()
        ));

        if quota.as_map().is_empty() {
            output.push_str(&format!("{}\n", "No regions known.".dimmed()));
            return output;
        }

        let width = column_width(quota.regions().map(str::len), "REGION");
        output.push_str(&format!(
            "{}\n",
            format!("{:<width$}  {:>9}", "REGION", "AVAILABLE").bold()
        ));
        for (region, available) in quota.iter() {
            let count = format!("{:>9}", available);
            let count = if available == 0 { count.dimmed() } else { count.green() };
            output.push_str(&format!("{:<width$}  {}\n", region, count));
        }
        output.push_str(&format!("{:<width$}  {:>9}\n", "total".dimmed(), quota.total()));
        output
    }

    /// Format configuration issues, errors first
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<&ConfigIssue> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());

        sorted
            .into_iter()
            .map(|issue| {
                let label = match issue.severity {
                    Severity::Error => "error:".red().bold(),
                    Severity::Warning => "warning:".yellow().bold(),
                };
                format!("{} {}\n", label, issue.message)
            })
            .collect()
    }

    /// Format registry records as JSON
    pub fn format_agents_json(agents: &[AgentRecord]) -> String {
        serde_json::to_string_pretty(agents).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format a quota report as JSON
    pub fn format_quota_json(user: &str, quota: &RegionQuota) -> String {
        serde_json::to_string_pretty(&serde_json::json!({
            "user": user,
            "regions": quota.as_map(),
            "total": quota.total(),
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }

    fn status_colored(status: AgentStatus, text: &str) -> ColoredString {
        match status {
            AgentStatus::Ready => text.green(),
            AgentStatus::Busy => text.yellow(),
            AgentStatus::Inactive => text.dimmed(),
            AgentStatus::WrongRegion | AgentStatus::Error => text.red(),
        }
    }
}

fn column_width(lengths: impl Iterator<Item = usize>, header: &str) -> usize {
    lengths.max().unwrap_or(0).max(header.len())
}

impl OutputFormatter for ConsoleFormatter {
    fn format_agents(&self, agents: &[AgentRecord]) -> String {
        Self::format_agents(agents)
    }

    fn format_quota(&self, user: &str, quota: &RegionQuota) -> String {
        Self::format_quota(user, quota)
    }

    fn format_issues(&self, issues: &[ConfigIssue]) -> String {
        Self::format_issues(issues)
    }

    fn render_agents(&self, agents: &[AgentRecord], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_agents(agents),
            OutputFormat::Json => Self::format_agents_json(agents),
        }
    }

    fn render_quota(&self, user: &str, quota: &RegionQuota, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_quota(user, quota),
            OutputFormat::Json => Self::format_quota_json(user, quota),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_domain::{ConfigIssueCode, QuotaTally};

    fn quota() -> RegionQuota {
        let mut tally = QuotaTally::new(["seoul", "tokyo"]);
        tally.add_shared("seoul");
        tally.add_owned("seoul");
        tally.finish(10)
    }

    #[test]
    fn test_agents_table_lists_every_record() {
        colored::control::set_override(false);
        let agents = vec![
            AgentRecord::new("10.0.0.1", "a1", "seoul").with_port(12000).approved(),
            AgentRecord::new("10.0.0.2", "a2", "seoul_owned_alice")
                .with_status(AgentStatus::WrongRegion),
        ];

        let output = ConsoleFormatter::format_agents(&agents);

        assert!(output.contains("REGION"));
        assert!(output.contains("seoul_owned_alice"));
        assert!(output.contains("WRONG_REGION"));
        assert!(output.contains("12000"));
        assert!(output.contains("2 agent(s)"));
    }

    #[test]
    fn test_agents_json_round_trips() {
        let agents = vec![AgentRecord::new("10.0.0.1", "a1", "seoul")];

        let json = ConsoleFormatter::format_agents_json(&agents);
        let parsed: Vec<AgentRecord> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, agents);
    }

    #[test]
    fn test_quota_json_shape() {
        let json = ConsoleFormatter::format_quota_json("alice", &quota());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["user"], "alice");
        assert_eq!(value["regions"]["seoul"], 2);
        assert_eq!(value["regions"]["tokyo"], 0);
        assert_eq!(value["total"], 2);
    }

    #[test]
    fn test_quota_table_has_every_region() {
        colored::control::set_override(false);
        let output = ConsoleFormatter.render_quota("alice", &quota(), OutputFormat::Table);

        assert!(output.contains("alice"));
        assert!(output.contains("seoul"));
        assert!(output.contains("tokyo"));
    }

    #[test]
    fn test_issues_errors_first() {
        colored::control::set_override(false);
        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::ZeroConsoleCap, "cap is zero"),
            ConfigIssue::error(ConfigIssueCode::EmptyRegion, "region is empty"),
        ];

        let output = ConsoleFormatter::format_issues(&issues);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "error: region is empty");
        assert_eq!(lines[1], "warning: cap is zero");
    }
}
