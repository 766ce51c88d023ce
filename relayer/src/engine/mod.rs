//! The reconciliation engine.
//!
//! Pings reach the engine from two places, the live feed and the startup catch-up scan. Both go
//! through the ingestion gate ([`Relayer::admit`] / [`Relayer::ingest`]), which drops anything
//! already processed, already being submitted or already queued. The reconciler
//! ([`Relayer::drain`]) then submits queued pings one at a time and records every transition in
//! the [`StateStore`](crate::core::client::StateStore).

pub mod catchup;
pub mod latch;
pub mod queue;
pub mod reconciler;
pub mod startup;
pub mod submission;

use crate::core::config::Config;
use crate::types::PingId;
use latch::DrainLatch;
use queue::WorkQueue;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub use catchup::{CatchupError, CatchupReport};
pub use reconciler::DrainReport;
pub use startup::StartupReport;
pub use submission::{SubmissionError, SubmissionProtocol};

/// In-memory mirror of the persisted processing state plus the work queue.
#[derive(Debug, Default)]
pub(crate) struct EngineState {
    pub(crate) queue: WorkQueue,
    pub(crate) processed: HashSet<PingId>,
    pub(crate) pending: HashSet<PingId>,
    pub(crate) last_processed_block: u64,
}

/// Handle on the engine. Shared behind an [`Arc`] by the listener and the spawned drains.
///
/// The state mutex is never held across a chain or store call.
pub struct Relayer {
    config: Arc<Config>,
    state: Mutex<EngineState>,
    latch: DrainLatch,
    shutdown: CancellationToken,
}

impl Relayer {
    pub fn new(config: Arc<Config>, shutdown: CancellationToken) -> Arc<Self> {
        Arc::new(Self { config, state: Mutex::new(EngineState::default()), latch: DrainLatch::default(), shutdown })
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Dedup and enqueue, without waking the reconciler. Returns whether the ping was queued.
    pub async fn admit(&self, ping_id: PingId) -> bool {
        if ping_id.is_empty() {
            trace!("Ignoring empty ping id");
            return false;
        }
        let mut state = self.state.lock().await;
        if state.processed.contains(&ping_id) || state.pending.contains(&ping_id) {
            trace!(ping_id = %ping_id, "Ping already handled");
            return false;
        }
        let queued = state.queue.push(ping_id);
        if queued {
            trace!(queue_len = state.queue.len(), "Ping queued");
        }
        queued
    }

    /// [`admit`](Self::admit) then wake the reconciler. Used for pings coming from the live feed.
    pub async fn ingest(self: &Arc<Self>, ping_id: PingId) -> bool {
        let queued = self.admit(ping_id).await;
        if queued {
            self.kick();
        }
        queued
    }

    pub fn is_draining(&self) -> bool {
        self.latch.is_draining()
    }

    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    pub async fn last_processed_block(&self) -> u64 {
        self.state.lock().await.last_processed_block
    }

    pub async fn is_processed(&self, ping_id: &PingId) -> bool {
        self.state.lock().await.processed.contains(ping_id)
    }

    pub async fn is_pending(&self, ping_id: &PingId) -> bool {
        self.state.lock().await.pending.contains(ping_id)
    }

    #[cfg(test)]
    pub(crate) async fn with_state<R>(&self, f: impl FnOnce(&mut EngineState) -> R) -> R {
        f(&mut *self.state.lock().await)
    }

    #[cfg(test)]
    pub(crate) fn latch(&self) -> &DrainLatch {
        &self.latch
    }
}
