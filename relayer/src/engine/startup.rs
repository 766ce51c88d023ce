use crate::engine::catchup::CatchupReport;
use crate::engine::Relayer;
use crate::types::ProcessingState;
use crate::{RelayerError, RelayerResult};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct StartupReport {
    /// True when no state existed and a fresh record was written at the chain head
    pub initialised: bool,
    /// Pings found in `pending`, i.e. interrupted by the previous shutdown
    pub requeued: usize,
    pub catchup: CatchupReport,
    /// Whether a drain was started at the end of startup
    pub drain_started: bool,
}

impl Relayer {
    /// Restores the processing state and backfills what was missed while the relayer was down.
    ///
    /// 1. Load the state, or initialise it at the current head on a first run.
    /// 2. Queue every ping left in `pending` by the previous run.
    /// 3. Run the catch-up scan.
    /// 4. Start the reconciler if anything is queued.
    ///
    /// Failing to load or initialise the state, or to read the chain head for the catch-up scan,
    /// is fatal: live pongs would otherwise move the block cursor past blocks never scanned.
    /// A catch-up stopped by a failing chunk is not, its cursor only covers what was scanned.
    /// The live listener must be started after this returns.
    pub async fn bootstrap(self: &Arc<Self>) -> RelayerResult<StartupReport> {
        let store = self.config.store();
        let mut report = StartupReport::default();

        let persisted = match store
            .get()
            .await
            .map_err(|e| RelayerError::Bootstrap(format!("Failed to load processing state: {}", e)))?
        {
            Some(state) => state,
            None => {
                let head = self
                    .config
                    .chain()
                    .head_block_number()
                    .await
                    .map_err(|e| RelayerError::Bootstrap(format!("Failed to read chain head: {}", e)))?;
                let state = ProcessingState::starting_at(head);
                store
                    .put(&state)
                    .await
                    .map_err(|e| RelayerError::Bootstrap(format!("Failed to initialise processing state: {}", e)))?;
                info!(block_number = head, "No processing state found, starting from the chain head");
                report.initialised = true;
                state
            }
        };

        info!(
            last_processed_block = persisted.last_processed_block,
            processed = persisted.processed.len(),
            pending = persisted.pending.len(),
            "Processing state loaded"
        );

        {
            let mut state = self.state.lock().await;
            state.last_processed_block = persisted.last_processed_block;
            state.processed = persisted.processed;
            // Interrupted pings go back to the queue rather than to `pending`, otherwise the
            // ingestion gate would reject them as in flight.
            for ping_id in persisted.pending {
                if !state.processed.contains(&ping_id) && state.queue.push(ping_id) {
                    report.requeued += 1;
                }
            }
        }
        if report.requeued > 0 {
            warn!(count = report.requeued, "Resubmitting pings interrupted by the previous run");
        }

        report.catchup = self.catch_up().await?;

        if self.queue_len().await > 0 {
            self.kick();
            report.drain_started = true;
        }

        Ok(report)
    }
}
