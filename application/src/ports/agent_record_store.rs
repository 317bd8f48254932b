//! Agent record store port
//!
//! Defines the durable, cluster-wide agent registry.

use async_trait::async_trait;
use fleet_domain::AgentRecord;
use thiserror::Error;

/// Errors that can occur while reading or writing the registry
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A set of writes applied to the registry as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    /// Records to insert or replace, matched on `(ip, name)`.
    pub upserts: Vec<AgentRecord>,
    /// Records to remove, matched on `(ip, name)`.
    pub deletes: Vec<AgentRecord>,
}

impl RecordBatch {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// Durable registry of every known agent.
///
/// Records are unique per `(ip, name)`: an upsert replaces any record with the
/// same key.
#[async_trait]
pub trait AgentRecordStore: Send + Sync {
    /// Every record in the registry.
    async fn find_all(&self) -> Result<Vec<AgentRecord>, StoreError>;

    /// Records whose raw region string starts with `region`.
    ///
    /// Owned agents (`<region>_owned_<user>`) match their region's prefix.
    async fn find_by_region_prefix(&self, region: &str) -> Result<Vec<AgentRecord>, StoreError>;

    /// Apply a batch atomically: readers see either none or all of it.
    async fn apply(&self, batch: RecordBatch) -> Result<(), StoreError>;

    async fn upsert_all(&self, records: Vec<AgentRecord>) -> Result<(), StoreError> {
        self.apply(RecordBatch {
            upserts: records,
            deletes: Vec::new(),
        })
        .await
    }

    async fn delete_all(&self, records: Vec<AgentRecord>) -> Result<(), StoreError> {
        self.apply(RecordBatch {
            upserts: Vec::new(),
            deletes: records,
        })
        .await
    }
}
