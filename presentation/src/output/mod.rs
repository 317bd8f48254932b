//! Output formatting for agent listings, quotas and config reports.

pub mod console;
pub mod formatter;
