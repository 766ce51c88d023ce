use crate::core::client::chain::ChainError;
use crate::engine::Relayer;
use crate::types::constant::RESUBSCRIBE_DELAY;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Feeds the live Ping stream of the chain client into the ingestion gate.
pub struct PingListener {
    relayer: Arc<Relayer>,
    cancellation: CancellationToken,
    resubscribe_delay: Duration,
}

impl PingListener {
    pub fn new(relayer: Arc<Relayer>, cancellation: CancellationToken) -> Self {
        Self { relayer, cancellation, resubscribe_delay: RESUBSCRIBE_DELAY }
    }

    pub fn with_resubscribe_delay(mut self, delay: Duration) -> Self {
        self.resubscribe_delay = delay;
        self
    }

    /// Runs until cancelled. A feed that ends is re-established after the resubscribe delay; failing
    /// to re-establish it is returned as an error.
    pub async fn run(self) -> Result<(), ChainError> {
        let chain = Arc::clone(self.relayer.config().chain());

        loop {
            let mut stream = match self.cancellation.run_until_cancelled(chain.subscribe_pings()).await {
                Some(stream) => stream?,
                None => break,
            };
            info!("Listening for Ping events");

            while let Some(Some(item)) = self.cancellation.run_until_cancelled(stream.next()).await {
                match item {
                    Ok(event) => {
                        debug!(ping_id = %event.ping_id, block_number = event.block_number, "Ping received");
                        self.relayer.ingest(event.ping_id).await;
                    }
                    Err(e) if e.is_recoverable() => warn!(error = %e, "Ping feed error, continuing"),
                    Err(e) => {
                        error!(error = %e, "Ping feed returned an unusable event, skipping");
                    }
                }
            }

            if self.cancellation.is_cancelled() {
                break;
            }
            warn!(delay_secs = self.resubscribe_delay.as_secs(), "Ping feed ended, resubscribing");
            if self.cancellation.run_until_cancelled(tokio::time::sleep(self.resubscribe_delay)).await.is_none() {
                break;
            }
        }

        info!("Ping listener stopped");
        Ok(())
    }
}
