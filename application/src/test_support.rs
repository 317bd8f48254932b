//! In-memory port implementations shared by the use case tests.

use crate::ports::agent_record_store::{AgentRecordStore, RecordBatch, StoreError};
use crate::ports::attachment_registry::{AttachmentError, AttachmentRegistry};
use crate::ports::expiring_cache::ExpiringCache;
use crate::ports::region_directory::RegionDirectory;
use async_trait::async_trait;
use fleet_domain::{AgentKey, AgentRecord, AttachedAgent, TelemetrySnapshot};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

// ==================== Attachments ====================

type StopHook = Box<dyn Fn(&AttachedAgent) + Send + Sync>;

#[derive(Default)]
pub struct MockAttachments {
    attached: Mutex<BTreeMap<AgentKey, AttachedAgent>>,
    pub stopped: Mutex<Vec<AgentKey>>,
    pub shared: Mutex<Vec<AgentKey>>,
    fail_actions: AtomicBool,
    on_stop: Mutex<Option<StopHook>>,
}

impl MockAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(agents: impl IntoIterator<Item = AttachedAgent>) -> Self {
        let registry = Self::new();
        for agent in agents {
            registry.attach(agent);
        }
        registry
    }

    pub fn attach(&self, agent: AttachedAgent) {
        self.attached.lock().unwrap().insert(agent.key(), agent);
    }

    pub fn detach(&self, ip: &str, name: &str) {
        self.attached.lock().unwrap().remove(&AgentKey::new(ip, name));
    }

    /// Run `hook` inside every successful `stop`, before it returns.
    pub fn on_stop(&self, hook: impl Fn(&AttachedAgent) + Send + Sync + 'static) {
        *self.on_stop.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn fail_actions(&self) {
        self.fail_actions.store(true, Ordering::SeqCst);
    }

    pub fn stopped_keys(&self) -> Vec<AgentKey> {
        self.stopped.lock().unwrap().clone()
    }

    pub fn shared_keys(&self) -> Vec<AgentKey> {
        self.shared.lock().unwrap().clone()
    }

    fn check(&self, agent: &AttachedAgent) -> Result<(), AttachmentError> {
        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(AttachmentError::Connection(format!("{} hung up", agent.key())));
        }
        Ok(())
    }
}

#[async_trait]
impl AttachmentRegistry for MockAttachments {
    fn list_attached(&self) -> Vec<AttachedAgent> {
        self.attached.lock().unwrap().values().cloned().collect()
    }

    fn resolve(&self, ip: &str, name: &str) -> Option<AttachedAgent> {
        self.attached
            .lock()
            .unwrap()
            .get(&AgentKey::new(ip, name))
            .cloned()
    }

    async fn stop(&self, agent: &AttachedAgent) -> Result<(), AttachmentError> {
        self.check(agent)?;
        self.stopped.lock().unwrap().push(agent.key());
        if let Some(hook) = self.on_stop.lock().unwrap().as_ref() {
            hook(agent);
        }
        Ok(())
    }

    async fn share_telemetry(&self, agent: &AttachedAgent) -> Result<(), AttachmentError> {
        self.check(agent)?;
        self.shared.lock().unwrap().push(agent.key());
        Ok(())
    }

    async fn current_snapshot(
        &self,
        agent: &AttachedAgent,
    ) -> Result<TelemetrySnapshot, AttachmentError> {
        self.check(agent)?;
        Ok(TelemetrySnapshot {
            ip: agent.ip.clone(),
            cpu_used_percentage: 12.5,
            total_memory: 1024,
            free_memory: 512,
            collect_time: 1,
            ..Default::default()
        })
    }
}

// ==================== Store ====================

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<AgentKey, AgentRecord>>,
    pub batches: Mutex<Vec<RecordBatch>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with(records: impl IntoIterator<Item = AgentRecord>) -> Self {
        let store = Self::default();
        {
            let mut map = store.records.lock().unwrap();
            for record in records {
                map.insert(record.key(), record);
            }
        }
        store
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, ip: &str, name: &str) -> Option<AgentRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&AgentKey::new(ip, name))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl AgentRecordStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_region_prefix(&self, region: &str) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.region.starts_with(region))
            .cloned()
            .collect())
    }

    async fn apply(&self, batch: RecordBatch) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write refused".to_string()));
        }
        let mut map = self.records.lock().unwrap();
        for record in &batch.upserts {
            map.insert(record.key(), record.clone());
        }
        for record in &batch.deletes {
            map.remove(&record.key());
        }
        self.batches.lock().unwrap().push(batch);
        Ok(())
    }
}

// ==================== Regions ====================

pub struct FixedRegions(pub BTreeSet<String>);

impl FixedRegions {
    pub fn of(regions: &[&str]) -> Self {
        Self(regions.iter().map(|r| r.to_string()).collect())
    }
}

impl RegionDirectory for FixedRegions {
    fn known_regions(&self) -> BTreeSet<String> {
        self.0.clone()
    }
}

// ==================== Cache ====================

pub struct MapCache<K, V> {
    entries: Mutex<HashMap<K, (V, Option<Instant>)>>,
}

impl<K, V> Default for MapCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> MapCache<K, V> {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl<K, V> ExpiringCache<K, V> for MapCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let deadline = ttl.map(|ttl| Instant::now() + ttl);
        self.entries.lock().unwrap().insert(key, (value, deadline));
    }

    fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((_, Some(deadline))) if Instant::now() >= *deadline => None,
            Some((value, _)) => Some(value.clone()),
            None => None,
        }
    }

    fn evict(&self, key: &K) {
        self.entries.lock().unwrap().remove(key);
    }

    fn take(&self, key: &K) -> Option<V> {
        match self.entries.lock().unwrap().remove(key) {
            Some((_, Some(deadline))) if Instant::now() >= deadline => None,
            Some((value, _)) => Some(value),
            None => None,
        }
    }

    fn keys_near_expiry(&self) -> Vec<K> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, (_, deadline)| deadline.is_none_or(|d| now < d));
        entries.keys().cloned().collect()
    }
}
