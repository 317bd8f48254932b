//! Region directory adapters.

use fleet_application::RegionDirectory;
use std::collections::BTreeSet;

/// Region list taken from configuration.
#[derive(Debug, Default)]
pub struct StaticRegionDirectory {
    regions: BTreeSet<String>,
}

impl StaticRegionDirectory {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
        }
    }
}

impl RegionDirectory for StaticRegionDirectory {
    fn known_regions(&self) -> BTreeSet<String> {
        self.regions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_regions_are_deduplicated() {
        let dir = StaticRegionDirectory::new(["seoul", "tokyo", "seoul"]);
        assert_eq!(dir.known_regions().len(), 2);
        assert!(dir.contains("tokyo"));
        assert!(!dir.contains("busan"));
    }
}
