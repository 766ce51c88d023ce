//! Validated configuration.
//!
//! The CLI layer only knows about optional strings. The conversions in this module turn them into
//! the typed parameters the rest of the crate works with, failing with
//! [`RelayerError::Configuration`](crate::RelayerError::Configuration) on the first missing or
//! malformed value.

pub mod database;
pub mod ethereum;
pub mod relayer;

pub use database::DatabaseParams;
pub use ethereum::EthereumParams;
pub use relayer::{FeePolicy, RelayerParams, RetryPolicy};
