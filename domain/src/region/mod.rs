//! Region domain.
//!
//! An agent's region string has the shape `<regionName>` for a shared agent
//! or `<regionName>_owned_<userId>` for an agent reserved by one user.
//! [`AgentRegion`] splits that string into its physical region and the
//! optional owner so region comparisons never see the owner suffix.

use serde::{Deserialize, Serialize};

/// Marker separating the physical region from the owning user id.
pub const OWNED_MARKER: &str = "_owned_";

/// A parsed agent region string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentRegion {
    raw: String,
    name: String,
    owner: Option<String>,
}

impl AgentRegion {
    /// Parse a raw region string.
    ///
    /// Everything before the first `_owned_` marker is the region name;
    /// everything after it is the owner.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (name, owner) = match raw.find(OWNED_MARKER) {
            Some(idx) => (
                raw[..idx].to_string(),
                Some(raw[idx + OWNED_MARKER.len()..].to_string()),
            ),
            None => (raw.clone(), None),
        };
        Self { raw, name, owner }
    }

    /// The full string as stored on the record.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The physical region, with any owner suffix stripped.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    /// Whether this region string reserves the agent for `user_id`.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.is_owned() && self.raw.ends_with(&format!("{OWNED_MARKER}{user_id}"))
    }

    /// Whether the physical region is blank (unusable for any comparison).
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

impl std::fmt::Display for AgentRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Strip the owner suffix from a raw region string.
pub fn extract_region(raw: &str) -> &str {
    match raw.find(OWNED_MARKER) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}
