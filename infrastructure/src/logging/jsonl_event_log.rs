//! JSONL file writer for cluster events.
//!
//! Each [`ClusterEvent`] becomes one JSON line carrying its payload fields
//! plus `type`, `timestamp` and the `region` of the node that wrote it.
//! The file is opened in append mode so the trail survives restarts.

use fleet_application::ports::cluster_event_log::{ClusterEvent, ClusterEventLog};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only JSONL event log.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Every line is flushed as it is
/// written; a write failure is dropped silently.
pub struct JsonlClusterEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    region: String,
}

impl JsonlClusterEventLog {
    /// Open (or create) the log at `path` for the node serving `region`.
    ///
    /// Creates parent directories as needed. Returns `None` if the file cannot
    /// be opened; the caller falls back to no event log.
    pub fn open(path: impl AsRef<Path>, region: impl Into<String>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            region: region.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, event: ClusterEvent) -> Value {
        let mut map = match event.payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::String(event.event_type.to_string()));
        map.insert(
            "timestamp".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        map.insert("region".to_string(), Value::String(self.region.clone()));
        Value::Object(map)
    }
}

impl ClusterEventLog for JsonlClusterEventLog {
    fn log(&self, event: ClusterEvent) {
        let Ok(line) = serde_json::to_string(&self.record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlClusterEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
