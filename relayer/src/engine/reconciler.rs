use crate::engine::submission::SubmissionProtocol;
use crate::engine::Relayer;
use crate::types::{FailureRecord, PingId};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Outcome of one drain run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Pongs included on chain
    pub submitted: usize,
    /// Pings that exhausted their retries
    pub failed: usize,
    /// Pings dropped without a submission (already processed, or not markable as pending)
    pub skipped: usize,
}

impl Relayer {
    /// Spawns a drain on the runtime. A no-op when a drain is already running: that drain keeps
    /// consuming the queue until it is empty.
    pub fn kick(self: &Arc<Self>) -> JoinHandle<Option<DrainReport>> {
        let relayer = Arc::clone(self);
        tokio::spawn(async move { relayer.drain().await })
    }

    /// Consumes the work queue until it is empty or shutdown is requested.
    ///
    /// Returns `None` without doing anything when another drain holds the latch.
    pub async fn drain(&self) -> Option<DrainReport> {
        let mut guard = self.latch.try_acquire()?;
        let mut report = DrainReport::default();
        debug!("Drain started");

        loop {
            while let Some(ping_id) = self.next_ping().await {
                let span = info_span!("ping", ping_id = %ping_id);
                self.reconcile(ping_id, &mut report).instrument(span).await;
            }
            drop(guard);

            // A ping admitted between the last pop and the release saw the latch taken and did not
            // start a drain of its own, pick it up here.
            if self.shutdown.is_cancelled() || self.state.lock().await.queue.is_empty() {
                break;
            }
            match self.latch.try_acquire() {
                Some(reacquired) => guard = reacquired,
                None => break,
            }
        }

        info!(submitted = report.submitted, failed = report.failed, skipped = report.skipped, "Drain finished");
        Some(report)
    }

    /// Waits until no drain is running, polling every `interval`.
    pub async fn wait_idle(&self, interval: Duration) {
        while self.latch.is_draining() {
            tokio::time::sleep(interval).await;
        }
    }

    async fn next_ping(&self) -> Option<PingId> {
        if self.shutdown.is_cancelled() {
            debug!("Shutdown requested, leaving the rest of the queue");
            return None;
        }
        self.state.lock().await.queue.pop()
    }

    async fn reconcile(&self, ping_id: PingId, report: &mut DrainReport) {
        let store = self.config.store();

        {
            let mut state = self.state.lock().await;
            if state.processed.contains(&ping_id) {
                debug!("Ping already processed, skipping");
                report.skipped += 1;
                return;
            }
            state.pending.insert(ping_id.clone());
        }

        // Without a durable pending marker a crash during submission would lose the ping for good.
        if let Err(e) = store.add_pending(&ping_id).await {
            error!(error = %e, "Failed to persist pending ping, leaving it for redelivery");
            self.state.lock().await.pending.remove(&ping_id);
            report.skipped += 1;
            return;
        }

        let params = self.config.params();
        let protocol = SubmissionProtocol::new(self.config.chain().as_ref(), params.fees, params.retry);

        match protocol.submit(&ping_id).await {
            Ok(receipt) => {
                {
                    let mut state = self.state.lock().await;
                    state.pending.remove(&ping_id);
                    state.processed.insert(ping_id.clone());
                    state.last_processed_block = receipt.block_number;
                }
                if let Err(e) = store.commit_success(receipt.block_number, &receipt.tx_hash, &ping_id).await {
                    // Stays pending in the store, the next start will submit it again.
                    error!(error = %e, pong_tx_hash = %receipt.tx_hash, "Failed to persist processed ping");
                }
                report.submitted += 1;
            }
            Err(e) => {
                warn!(error = %e, "Giving up on ping");
                if let Err(store_error) = store.append_failure(FailureRecord::new(ping_id.clone(), e.last_error())).await
                {
                    error!(error = %store_error, "Failed to record failed ping");
                }
                if let Err(store_error) = store.remove_pending(&ping_id).await {
                    error!(error = %store_error, "Failed to remove failed ping from pending");
                }
                self.state.lock().await.pending.remove(&ping_id);
                report.failed += 1;
            }
        }
    }
}
