//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for agent listings and quota reports
///
/// This is a domain concept representing how command output should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, colored table (default)
    #[default]
    Table,
    /// JSON output
    Json,
}
