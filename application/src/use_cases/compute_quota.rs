//! Compute quota use case
//!
//! Works out how many agents a user may start a test with in each region:
//! the shared pool capped at the per-console limit, plus every agent the user
//! owns. Recomputed on every request from the registry.

use crate::ports::agent_record_store::{AgentRecordStore, StoreError};
use crate::ports::region_directory::RegionDirectory;
use fleet_domain::{QuotaTally, RegionQuota};
use std::sync::Arc;
use tracing::warn;

/// Derives per-region agent availability for a user.
pub struct QuotaCalculator {
    store: Arc<dyn AgentRecordStore>,
    regions: Arc<dyn RegionDirectory>,
    max_agents_per_console: usize,
}

impl QuotaCalculator {
    pub fn new(
        store: Arc<dyn AgentRecordStore>,
        regions: Arc<dyn RegionDirectory>,
        max_agents_per_console: usize,
    ) -> Self {
        Self {
            store,
            regions,
            max_agents_per_console,
        }
    }

    /// Available agents per known region for `user_id`.
    ///
    /// Counts approved, active agents only. Agents owned by other users are
    /// ignored; records whose region is not in the cluster are logged and skipped.
    pub async fn available_agents(&self, user_id: &str) -> Result<RegionQuota, StoreError> {
        let mut tally = QuotaTally::new(self.regions.known_regions());

        for record in self.store.find_all().await? {
            if !record.approved || !record.status.is_active() {
                continue;
            }

            let region = record.agent_region();
            if region.is_blank() {
                continue;
            }
            if !tally.contains(region.name()) {
                warn!(
                    region = region.name(),
                    user = user_id,
                    agent = %record.key(),
                    "Region does not exist in the cluster, agent not counted"
                );
                continue;
            }

            if region.is_owned_by(user_id) {
                tally.add_owned(region.name());
            } else if !region.is_owned() {
                tally.add_shared(region.name());
            }
        }

        Ok(tally.finish(self.max_agents_per_console))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedRegions, MemoryStore};
    use fleet_domain::{AgentRecord, AgentStatus};

    fn shared(i: usize, region: &str) -> AgentRecord {
        AgentRecord::new(format!("10.0.0.{i}"), "agent", region).approved()
    }

    fn calculator(records: Vec<AgentRecord>, regions: &[&str], max: usize) -> QuotaCalculator {
        QuotaCalculator::new(
            Arc::new(MemoryStore::with(records)),
            Arc::new(FixedRegions::of(regions)),
            max,
        )
    }

    #[tokio::test]
    async fn test_owned_agents_bypass_console_cap() {
        let mut records: Vec<_> = (1..=5).map(|i| shared(i, "seoul")).collect();
        records.push(shared(10, "seoul_owned_alice"));
        records.push(shared(11, "seoul_owned_alice"));

        let quota = calculator(records, &["seoul"], 3)
            .available_agents("alice")
            .await
            .unwrap();

        assert_eq!(quota.available("seoul"), 5);
    }

    #[tokio::test]
    async fn test_unapproved_and_foreign_owned_are_excluded() {
        let records = vec![
            shared(1, "seoul"),
            AgentRecord::new("10.0.0.2", "agent", "seoul"),
            shared(3, "seoul_owned_bob"),
        ];

        let quota = calculator(records, &["seoul"], 10)
            .available_agents("alice")
            .await
            .unwrap();

        assert_eq!(quota.available("seoul"), 1);
    }

    #[tokio::test]
    async fn test_unknown_region_is_skipped() {
        let records = vec![shared(1, "osaka"), shared(2, "seoul")];

        let quota = calculator(records, &["seoul"], 10)
            .available_agents("alice")
            .await
            .unwrap();

        assert_eq!(quota.available("osaka"), 0);
        assert_eq!(quota.as_map().len(), 1);
        assert_eq!(quota.total(), 1);
    }

    #[tokio::test]
    async fn test_inactive_agents_are_not_available() {
        let records = vec![
            shared(1, "seoul").with_status(AgentStatus::Inactive),
            shared(2, "seoul").with_status(AgentStatus::WrongRegion),
            shared(3, "seoul").with_status(AgentStatus::Busy),
        ];

        let quota = calculator(records, &["seoul"], 10)
            .available_agents("alice")
            .await
            .unwrap();

        assert_eq!(quota.available("seoul"), 1);
    }

    #[tokio::test]
    async fn test_every_known_region_is_reported() {
        let quota = calculator(vec![], &["seoul", "tokyo"], 10)
            .available_agents("alice")
            .await
            .unwrap();

        assert_eq!(quota.regions().collect::<Vec<_>>(), vec!["seoul", "tokyo"]);
    }
}
