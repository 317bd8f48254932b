//! Shared utilities for use cases.
//!
//! Contains the periodic background loop used by the coordinator for the
//! dispatch, telemetry and reconciliation passes.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Spawn a loop that runs `pass` every `period` until `token` is cancelled.
///
/// Missed ticks are delayed rather than bursted, so a slow pass is followed
/// by a full period of rest. Cancellation is observed between passes only.
pub(crate) fn spawn_periodic<F, Fut>(
    name: &'static str,
    period: Duration,
    token: CancellationToken,
    mut pass: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(task = name, period_ms = period.as_millis() as u64, "Background loop started");

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => pass().await,
            }
        }

        debug!(task = name, "Background loop stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_loop_runs_until_cancelled() {
        let token = CancellationToken::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let handle = spawn_periodic("test", Duration::from_millis(10), token.clone(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        // Ticks at 0, 10, 20, 30, 40 and 50ms.
        tokio::time::sleep(Duration::from_millis(55)).await;
        token.cancel();
        handle.await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 6);

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }
}
