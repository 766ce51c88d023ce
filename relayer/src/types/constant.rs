use std::time::Duration;

/// Number of submission attempts made for a single ping before it is recorded as failed.
pub const MAX_RETRIES: u32 = 5;

/// Backoff before attempt `k + 1` is `RETRY_BACKOFF_BASE_MS * (k + 1)`.
pub const RETRY_BACKOFF_BASE_MS: u64 = 2_000;

pub const ONE_GWEI: u128 = 1_000_000_000;

/// Priority fee paid on the first attempt (1.5 gwei).
pub const BASE_PRIORITY_FEE_WEI: u128 = 3 * ONE_GWEI / 2;

/// Added to the priority fee on every retry (1 gwei).
pub const PRIORITY_FEE_INCREMENT_WEI: u128 = ONE_GWEI;

/// Used when the pending block does not expose a base fee (20 gwei).
pub const DEFAULT_BASE_FEE_WEI: u128 = 20 * ONE_GWEI;

/// Width of a historical log query. Most providers cap `eth_getLogs` at 500 blocks.
pub const CATCHUP_CHUNK_SIZE: u64 = 499;

pub const DEFAULT_STATUS_ID: &str = "main_status";

pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

pub const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(5);

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;
