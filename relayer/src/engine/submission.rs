use crate::core::client::chain::{ChainClient, ChainError};
use crate::types::params::{FeePolicy, RetryPolicy};
use crate::types::{PingId, PongReceipt, PongTransaction};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Pong submission failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

impl SubmissionError {
    /// Reason stored in the failure log.
    pub fn last_error(&self) -> &str {
        match self {
            Self::Exhausted { last_error, .. } => last_error,
        }
    }
}

/// Submits one pong per ping, retrying with a fresh nonce and an escalated priority fee.
///
/// Each attempt re-reads everything from the chain: a transaction from a failed attempt may have
/// been replaced or dropped, so nothing is carried over.
pub struct SubmissionProtocol<'a> {
    chain: &'a dyn ChainClient,
    fees: FeePolicy,
    retry: RetryPolicy,
}

impl<'a> SubmissionProtocol<'a> {
    pub fn new(chain: &'a dyn ChainClient, fees: FeePolicy, retry: RetryPolicy) -> Self {
        Self { chain, fees, retry }
    }

    pub async fn submit(&self, ping_id: &PingId) -> Result<PongReceipt, SubmissionError> {
        let mut attempt = 0;
        loop {
            match self.attempt(ping_id, attempt).await {
                Ok(receipt) => {
                    info!(
                        attempt,
                        pong_tx_hash = %receipt.tx_hash,
                        block_number = receipt.block_number,
                        "Pong included"
                    );
                    return Ok(receipt);
                }
                Err(e) => {
                    warn!(attempt, error = %e, recoverable = e.is_recoverable(), "Pong attempt failed");
                    match self.retry.backoff_after(attempt) {
                        Some(delay) => {
                            debug!(delay_ms = delay.as_millis() as u64, "Backing off before next attempt");
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => {
                            return Err(SubmissionError::Exhausted { attempts: attempt + 1, last_error: e.to_string() })
                        }
                    }
                }
            }
        }
    }

    async fn attempt(&self, ping_id: &PingId, attempt: u32) -> Result<PongReceipt, ChainError> {
        let nonce = self.chain.pending_transaction_count(self.chain.sender_address()).await?;
        let gas_limit = self.chain.estimate_pong_gas(ping_id).await?;
        let base_fee = self.fees.base_fee_or_default(self.chain.pending_base_fee().await?);
        let priority_fee = self.fees.priority_fee(attempt);
        let max_fee = self.fees.max_fee(base_fee, priority_fee);

        debug!(attempt, nonce, gas_limit, base_fee, priority_fee, max_fee, "Sending pong");

        self.chain
            .send_pong(PongTransaction {
                ping_id: ping_id.clone(),
                nonce,
                gas_limit,
                max_fee_per_gas: max_fee,
                max_priority_fee_per_gas: priority_fee,
            })
            .await
    }
}
