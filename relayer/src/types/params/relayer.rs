use crate::cli::relayer::RelayerCliArgs;
use crate::types::constant::{
    BASE_PRIORITY_FEE_WEI, CATCHUP_CHUNK_SIZE, DEFAULT_BASE_FEE_WEI, MAX_RETRIES, PRIORITY_FEE_INCREMENT_WEI,
    RETRY_BACKOFF_BASE_MS,
};
use crate::RelayerError;
use std::time::Duration;

/// Linear EIP-1559 fee escalation across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    pub base_priority_fee: u128,
    pub priority_fee_increment: u128,
    pub default_base_fee: u128,
}

impl FeePolicy {
    /// Priority fee for the zero based `attempt`. Never decreases as `attempt` grows.
    pub fn priority_fee(&self, attempt: u32) -> u128 {
        self.base_priority_fee.saturating_add(self.priority_fee_increment.saturating_mul(u128::from(attempt)))
    }

    pub fn base_fee_or_default(&self, pending_base_fee: Option<u128>) -> u128 {
        pending_base_fee.unwrap_or(self.default_base_fee)
    }

    pub fn max_fee(&self, base_fee: u128, priority_fee: u128) -> u128 {
        base_fee.saturating_add(priority_fee)
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            base_priority_fee: BASE_PRIORITY_FEE_WEI,
            priority_fee_increment: PRIORITY_FEE_INCREMENT_WEI,
            default_base_fee: DEFAULT_BASE_FEE_WEI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Delay to wait after the zero based `attempt` failed, or `None` when it was the last one.
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) < self.max_attempts {
            Some(self.backoff_base.saturating_mul(attempt + 1))
        } else {
            None
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: MAX_RETRIES, backoff_base: Duration::from_millis(RETRY_BACKOFF_BASE_MS) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayerParams {
    pub fees: FeePolicy,
    pub retry: RetryPolicy,
    pub catchup_chunk_size: u64,
}

impl Default for RelayerParams {
    fn default() -> Self {
        Self { fees: FeePolicy::default(), retry: RetryPolicy::default(), catchup_chunk_size: CATCHUP_CHUNK_SIZE }
    }
}

impl TryFrom<RelayerCliArgs> for RelayerParams {
    type Error = RelayerError;

    fn try_from(args: RelayerCliArgs) -> Result<Self, Self::Error> {
        if args.max_retries == 0 {
            return Err(RelayerError::Configuration("Max retries must be greater than 0".to_string()));
        }
        if args.catchup_chunk_size == 0 {
            return Err(RelayerError::Configuration("Catch-up chunk size must be greater than 0".to_string()));
        }
        Ok(Self {
            fees: FeePolicy {
                base_priority_fee: args.base_priority_fee_wei,
                priority_fee_increment: args.priority_fee_increment_wei,
                default_base_fee: args.default_base_fee_wei,
            },
            retry: RetryPolicy {
                max_attempts: args.max_retries,
                backoff_base: Duration::from_millis(args.retry_backoff_ms),
            },
            catchup_chunk_size: args.catchup_chunk_size,
        })
    }
}
