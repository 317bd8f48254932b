//! In-memory agent registry.

use super::{RecordMap, apply_batch, with_region_prefix};
use async_trait::async_trait;
use fleet_application::{AgentRecordStore, RecordBatch, StoreError};
use fleet_domain::AgentRecord;
use tokio::sync::RwLock;

/// Registry held in a `RwLock`; a batch is applied under one write lock.
#[derive(Default)]
pub struct InMemoryAgentRecordStore {
    records: RwLock<RecordMap>,
}

impl InMemoryAgentRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRecordStore for InMemoryAgentRecordStore {
    async fn find_all(&self) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_region_prefix(&self, region: &str) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(with_region_prefix(&*self.records.read().await, region))
    }

    async fn apply(&self, batch: RecordBatch) -> Result<(), StoreError> {
        apply_batch(&mut *self.records.write().await, batch);
        Ok(())
    }
}
