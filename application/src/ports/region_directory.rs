//! Region directory port

use std::collections::BTreeSet;

/// Source of the regions currently known to the cluster.
pub trait RegionDirectory: Send + Sync {
    fn known_regions(&self) -> BTreeSet<String>;

    fn contains(&self, region: &str) -> bool {
        self.known_regions().contains(region)
    }
}
