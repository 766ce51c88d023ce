use crate::types::constant::{
    BASE_PRIORITY_FEE_WEI, CATCHUP_CHUNK_SIZE, DEFAULT_BASE_FEE_WEI, MAX_RETRIES, PRIORITY_FEE_INCREMENT_WEI,
    RETRY_BACKOFF_BASE_MS,
};
use clap::Args;

/// Tuning of the submission protocol and of the startup backfill.
#[derive(Debug, Clone, Args)]
pub struct RelayerCliArgs {
    /// Number of attempts made for one ping before it is recorded as failed.
    #[arg(env = "PONG_RELAYER_MAX_RETRIES", long, default_value_t = MAX_RETRIES)]
    pub max_retries: u32,

    /// Base of the linear backoff between attempts, in milliseconds.
    #[arg(env = "PONG_RELAYER_RETRY_BACKOFF_MS", long, default_value_t = RETRY_BACKOFF_BASE_MS)]
    pub retry_backoff_ms: u64,

    /// Priority fee of the first attempt, in wei.
    #[arg(env = "PONG_RELAYER_BASE_PRIORITY_FEE_WEI", long, default_value_t = BASE_PRIORITY_FEE_WEI)]
    pub base_priority_fee_wei: u128,

    /// Priority fee added on every retry, in wei.
    #[arg(env = "PONG_RELAYER_PRIORITY_FEE_INCREMENT_WEI", long, default_value_t = PRIORITY_FEE_INCREMENT_WEI)]
    pub priority_fee_increment_wei: u128,

    /// Base fee assumed when the pending block does not report one, in wei.
    #[arg(env = "PONG_RELAYER_DEFAULT_BASE_FEE_WEI", long, default_value_t = DEFAULT_BASE_FEE_WEI)]
    pub default_base_fee_wei: u128,

    /// Number of blocks covered by one historical log query during catch-up.
    #[arg(env = "PONG_RELAYER_CATCHUP_CHUNK_SIZE", long, default_value_t = CATCHUP_CHUNK_SIZE)]
    pub catchup_chunk_size: u64,
}
