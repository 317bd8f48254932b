//! Agent connection capability.

use async_trait::async_trait;
use fleet_application::AttachmentError;
use fleet_domain::{AgentStatus, AttachedAgent, TelemetrySnapshot};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// One open connection to an agent process.
#[async_trait]
pub trait AgentConnection: Send + Sync {
    /// Identity the agent announced, with its current status.
    fn identity(&self) -> AttachedAgent;

    /// Tell the agent to shut down. The connection is closed afterwards.
    async fn stop(&self) -> Result<(), AttachmentError>;

    /// Tell the agent to start reporting system telemetry.
    async fn share_telemetry(&self) -> Result<(), AttachmentError>;

    /// Read the agent's current system telemetry.
    async fn snapshot(&self) -> Result<TelemetrySnapshot, AttachmentError>;
}

/// In-process agent that answers every request immediately.
///
/// Telemetry figures drift a little on every read so consecutive snapshots
/// differ.
pub struct SimulatedAgentConnection {
    identity: Mutex<AttachedAgent>,
    sharing: AtomicBool,
    stopped: AtomicBool,
    reads: AtomicU64,
}

impl SimulatedAgentConnection {
    pub fn new(identity: AttachedAgent) -> Self {
        Self {
            identity: Mutex::new(identity),
            sharing: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            reads: AtomicU64::new(0),
        }
    }

    pub fn set_status(&self, status: AgentStatus) {
        self.lock_identity().status = status;
    }

    pub fn is_sharing(&self) -> bool {
        self.sharing.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn lock_identity(&self) -> std::sync::MutexGuard<'_, AttachedAgent> {
        self.identity
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_open(&self) -> Result<(), AttachmentError> {
        if self.is_stopped() {
            return Err(AttachmentError::Connection(format!(
                "{} is shut down",
                self.lock_identity().key()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AgentConnection for SimulatedAgentConnection {
    fn identity(&self) -> AttachedAgent {
        self.lock_identity().clone()
    }

    async fn stop(&self) -> Result<(), AttachmentError> {
        self.ensure_open()?;
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn share_telemetry(&self) -> Result<(), AttachmentError> {
        self.ensure_open()?;
        self.sharing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn snapshot(&self) -> Result<TelemetrySnapshot, AttachmentError> {
        self.ensure_open()?;
        let read = self.reads.fetch_add(1, Ordering::Relaxed);
        let total_memory: u64 = 16 * 1024 * 1024;
        Ok(TelemetrySnapshot {
            ip: self.lock_identity().ip.clone(),
            cpu_used_percentage: 20.0 + (read % 10) as f32 * 5.0,
            total_memory,
            free_memory: total_memory / 2 - (read % 8) * 1024,
            received_per_sec: 1024 * (read % 5),
            sent_per_sec: 2048 * (read % 3),
            collect_time: chrono::Utc::now().timestamp_millis().max(1) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stopped_connection_refuses_requests() {
        let conn = SimulatedAgentConnection::new(AttachedAgent::new("10.0.0.1", "a1", "seoul", 12000));

        conn.stop().await.unwrap();

        assert!(conn.is_stopped());
        assert!(conn.share_telemetry().await.is_err());
        assert!(conn.snapshot().await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_is_stamped() {
        let conn = SimulatedAgentConnection::new(AttachedAgent::new("10.0.0.1", "a1", "seoul", 12000));

        let snapshot = conn.snapshot().await.unwrap();

        assert_eq!(snapshot.ip, "10.0.0.1");
        assert!(!snapshot.is_empty());
        assert!(snapshot.used_memory() > 0);
    }
}
