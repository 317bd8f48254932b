//! Agent registry adapters.
//!
//! - [`InMemoryAgentRecordStore`] keeps the registry in process memory
//! - [`JsonFileAgentRecordStore`] persists it to a JSON file that several
//!   nodes may share, serializing batches with an advisory lock

mod json_file;
mod memory;

pub use json_file::JsonFileAgentRecordStore;
pub use memory::InMemoryAgentRecordStore;

use fleet_application::RecordBatch;
use fleet_domain::{AgentKey, AgentRecord};
use std::collections::BTreeMap;

type RecordMap = BTreeMap<AgentKey, AgentRecord>;

fn index(records: impl IntoIterator<Item = AgentRecord>) -> RecordMap {
    records.into_iter().map(|r| (r.key(), r)).collect()
}

/// Deletes first, then upserts, so a batch that does both for one key keeps it.
fn apply_batch(map: &mut RecordMap, batch: RecordBatch) {
    for record in &batch.deletes {
        map.remove(&record.key());
    }
    for record in batch.upserts {
        map.insert(record.key(), record);
    }
}

fn with_region_prefix(map: &RecordMap, region: &str) -> Vec<AgentRecord> {
    map.values()
        .filter(|r| r.region.starts_with(region))
        .cloned()
        .collect()
}
