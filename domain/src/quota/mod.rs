//! Agent quota domain.
//!
//! [`QuotaTally`] accumulates per-region counts of shared agents and agents
//! owned by the requesting user; [`QuotaTally::finish`] applies the
//! per-console cap to the shared pool only and yields a [`RegionQuota`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shared and owned counts for a single region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCounts {
    pub shared: usize,
    pub owned: usize,
}

/// Running tally over the known regions of the cluster.
#[derive(Debug, Clone, Default)]
pub struct QuotaTally {
    counts: BTreeMap<String, RegionCounts>,
}

impl QuotaTally {
    /// Start a tally with a zero entry for every known region.
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counts: regions
                .into_iter()
                .map(|r| (r.into(), RegionCounts::default()))
                .collect(),
        }
    }

    pub fn contains(&self, region: &str) -> bool {
        self.counts.contains_key(region)
    }

    /// Count one shared agent. Returns `false` if the region is not tracked.
    pub fn add_shared(&mut self, region: &str) -> bool {
        match self.counts.get_mut(region) {
            Some(counts) => {
                counts.shared += 1;
                true
            }
            None => false,
        }
    }

    /// Count one agent owned by the user. Returns `false` if the region is not tracked.
    pub fn add_owned(&mut self, region: &str) -> bool {
        match self.counts.get_mut(region) {
            Some(counts) => {
                counts.owned += 1;
                true
            }
            None => false,
        }
    }

    /// Cap each region's shared pool at `max_per_console`, then add owned agents uncapped.
    pub fn finish(self, max_per_console: usize) -> RegionQuota {
        let available = self
            .counts
            .iter()
            .map(|(region, c)| (region.clone(), c.shared.min(max_per_console) + c.owned))
            .collect();
        RegionQuota {
            available,
            counts: self.counts,
        }
    }
}

/// Available agents per region for one user. Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionQuota {
    available: BTreeMap<String, usize>,
    counts: BTreeMap<String, RegionCounts>,
}

impl RegionQuota {
    /// Available agents in `region`; 0 for regions not in the cluster.
    pub fn available(&self, region: &str) -> usize {
        self.available.get(region).copied().unwrap_or(0)
    }

    /// Uncapped shared/owned counts behind the figure for `region`.
    pub fn counts(&self, region: &str) -> Option<RegionCounts> {
        self.counts.get(region).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.available.iter().map(|(r, n)| (r.as_str(), *n))
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.available.keys().map(String::as_str)
    }

    pub fn total(&self) -> usize {
        self.available.values().sum()
    }

    pub fn as_map(&self) -> &BTreeMap<String, usize> {
        &self.available
    }
}
