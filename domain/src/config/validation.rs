//! Configuration validation issues.
//!
//! Config loaders report problems as [`ConfigIssue`]s rather than failing on
//! the first one, so every problem in a file is shown at once.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the controller cannot start with this configuration.
    Error,
    /// Non-fatal: the controller starts but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `controller.region` is empty.
    EmptyRegion,
    /// The controller's region is not one of `cluster.regions`.
    UnknownControllerRegion { region: String },
    /// A region name contains the owner marker or the key separator.
    ReservedRegionName { region: String },
    /// A scheduling interval or TTL is zero.
    ZeroDuration { field: String },
    /// `cluster.max_agents_per_console` is zero; no shared agent is ever available.
    ZeroConsoleCap,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
