//! Reconcile agents use case
//!
//! Brings the durable agent registry in line with the agents attached to this
//! node. One pass:
//!
//! 1. Index the local attachments by agent key.
//! 2. Walk every stored record. A record with a matching attachment is
//!    refreshed from it, or flagged `WRONG_REGION` when the agent reported a
//!    region this node does not serve. A record without one is marked
//!    `INACTIVE` if it belongs to this node's region, or deleted if its region
//!    no longer exists in the cluster.
//! 3. Create records for attachments the registry has never seen.
//! 4. Write all upserts and deletes as one batch.
//!
//! Records of other known regions that are not attached here are left to the
//! node serving that region.

use crate::ports::agent_record_store::{AgentRecordStore, RecordBatch, StoreError};
use crate::ports::attachment_registry::AttachmentRegistry;
use crate::ports::cluster_event_log::{ClusterEvent, ClusterEventLog, NoClusterEventLog};
use crate::ports::region_directory::RegionDirectory;
use fleet_domain::{AgentKey, AgentRecord, AgentStatus, AttachedAgent, extract_region};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a reconciliation pass
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Agent store error: {0}")]
    Store(#[from] StoreError),
}

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub updated: usize,
    pub created: usize,
    pub deleted: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.updated == 0 && self.created == 0 && self.deleted == 0
    }
}

/// Diffs local attachments against the agent registry.
pub struct ReconciliationEngine {
    region: String,
    auto_approve: bool,
    attachments: Arc<dyn AttachmentRegistry>,
    store: Arc<dyn AgentRecordStore>,
    regions: Arc<dyn RegionDirectory>,
    event_log: Arc<dyn ClusterEventLog>,
}

impl ReconciliationEngine {
    pub fn new(
        region: impl Into<String>,
        attachments: Arc<dyn AttachmentRegistry>,
        store: Arc<dyn AgentRecordStore>,
        regions: Arc<dyn RegionDirectory>,
    ) -> Self {
        Self {
            region: region.into(),
            auto_approve: true,
            attachments,
            store,
            regions,
            event_log: Arc::new(NoClusterEventLog),
        }
    }

    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    /// Create with a cluster event log.
    pub fn with_event_log(mut self, event_log: Arc<dyn ClusterEventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    /// Run one full pass and persist the result.
    ///
    /// A store failure fails the whole pass; nothing is retried until the next
    /// scheduled run.
    pub async fn reconcile(&self) -> Result<ReconcileReport, ReconcileError> {
        let attached = self.attachments.list_attached();
        let records = self.store.find_all().await?;
        let known = self.regions.known_regions();

        let (batch, report) = self.plan(attached, records, &known);

        if batch.is_empty() {
            debug!(region = %self.region, "Agent registry already up to date");
            return Ok(report);
        }

        self.store.apply(batch).await?;

        info!(
            region = %self.region,
            updated = report.updated,
            created = report.created,
            deleted = report.deleted,
            "Agent registry reconciled"
        );
        self.event_log.log(ClusterEvent::new(
            "reconcile_completed",
            serde_json::json!({
                "region": self.region,
                "updated": report.updated,
                "created": report.created,
                "deleted": report.deleted,
            }),
        ));
        Ok(report)
    }

    /// Compute the batch for one pass without touching the store.
    pub fn plan(
        &self,
        attached: Vec<AttachedAgent>,
        records: Vec<AgentRecord>,
        known_regions: &BTreeSet<String>,
    ) -> (RecordBatch, ReconcileReport) {
        let mut attached_map: HashMap<AgentKey, AttachedAgent> =
            attached.into_iter().map(|a| (a.key(), a)).collect();
        let mut batch = RecordBatch::default();
        let mut report = ReconcileReport::default();

        for mut record in records {
            match attached_map.remove(&record.key()) {
                Some(agent) => {
                    if self.serves(&agent.region) {
                        if record.differs_from(&agent) {
                            record.fill_from(&agent);
                            batch.upserts.push(record);
                            report.updated += 1;
                        }
                    } else if record.status != AgentStatus::WrongRegion {
                        warn!(
                            agent = %agent.key(),
                            reported = %agent.region,
                            serving = %self.region,
                            "Agent attached to a controller of another region"
                        );
                        record.status = AgentStatus::WrongRegion;
                        batch.upserts.push(record);
                        report.updated += 1;
                    }
                }
                None => {
                    let region = extract_region(&record.region);
                    if !known_regions.contains(region) {
                        debug!(agent = %record.key(), region, "Region left the cluster, deleting agent");
                        batch.deletes.push(record);
                        report.deleted += 1;
                    } else if region == self.region && record.status != AgentStatus::Inactive {
                        record.status = AgentStatus::Inactive;
                        batch.upserts.push(record);
                        report.updated += 1;
                    }
                }
            }
        }

        for agent in attached_map.into_values() {
            let mut record = AgentRecord::from_attached(&agent, self.auto_approve);
            if !self.serves(&agent.region) {
                record.status = AgentStatus::WrongRegion;
            }
            batch.upserts.push(record);
            report.created += 1;
        }

        (batch, report)
    }

    fn serves(&self, raw_region: &str) -> bool {
        extract_region(raw_region) == self.region
    }
}
