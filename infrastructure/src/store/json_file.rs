//! JSON file agent registry.
//!
//! The file is the only copy of the registry, so controllers on several
//! nodes can share one path. Every read loads the file. Every batch takes an
//! exclusive advisory lock on `<path>.lock`, reloads, applies, and writes the
//! result to `<path>.tmp` before renaming it over the target, so readers
//! always see a complete batch.

use super::{RecordMap, apply_batch, index, with_region_prefix};
use async_trait::async_trait;
use fleet_application::{AgentRecordStore, RecordBatch, StoreError};
use fleet_domain::AgentRecord;
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct JsonFileAgentRecordStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileAgentRecordStore {
    /// Open the registry at `path`. A missing file is an empty registry; a
    /// corrupt one is rejected.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self {
            lock_path: sibling(&path, ".lock"),
            path,
        };

        let records = store.load().await?;
        info!(path = %store.path.display(), records = records.len(), "Agent registry opened");
        Ok(store)
    }

    async fn load(&self) -> Result<RecordMap, StoreError> {
        let path = self.path.clone();
        blocking(move || load(&path)).await
    }
}

#[async_trait]
impl AgentRecordStore for JsonFileAgentRecordStore {
    async fn find_all(&self) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(self.load().await?.into_values().collect())
    }

    async fn find_by_region_prefix(&self, region: &str) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(with_region_prefix(&self.load().await?, region))
    }

    async fn apply(&self, batch: RecordBatch) -> Result<(), StoreError> {
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();
        blocking(move || apply_locked(&path, &lock_path, batch)).await
    }
}

async fn blocking<T, F>(work: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| StoreError::Unavailable(format!("registry task failed: {}", e)))?
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {}", path.display(), e))
}

fn load(path: &Path) -> Result<RecordMap, StoreError> {
    let records = match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Vec::new(),
        Ok(content) => serde_json::from_str::<Vec<AgentRecord>>(&content)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", path.display(), e)))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(io_error(path, e)),
    };
    Ok(index(records))
}

fn write_atomic(path: &Path, records: &RecordMap) -> Result<(), StoreError> {
    let list: Vec<&AgentRecord> = records.values().collect();
    let json =
        serde_json::to_string_pretty(&list).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let temp = sibling(path, ".tmp");
    std::fs::write(&temp, json).map_err(|e| io_error(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| io_error(path, e))?;

    debug!(path = %path.display(), records = list.len(), "Agent registry written");
    Ok(())
}

fn apply_locked(path: &Path, lock_path: &Path, batch: RecordBatch) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| io_error(lock_path, e))?;
    lock_file
        .lock_exclusive()
        .map_err(|e| io_error(lock_path, e))?;

    let result = load(path).and_then(|mut records| {
        apply_batch(&mut records, batch);
        write_atomic(path, &records)
    });
    drop(lock_file);
    result
}
