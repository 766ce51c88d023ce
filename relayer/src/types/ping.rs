use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single Ping occurrence: the hash of the transaction that emitted it.
///
/// The value is kept as the `0x`-prefixed hex string reported by the node so that it can be
/// stored and compared without any chain specific decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PingId(String);

impl PingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PingId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<B256> for PingId {
    fn from(value: B256) -> Self {
        Self(value.to_string())
    }
}

/// A Ping observed on chain, either through a historical query or the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingEvent {
    pub ping_id: PingId,
    pub block_number: u64,
}

impl PingEvent {
    pub fn new(ping_id: impl Into<PingId>, block_number: u64) -> Self {
        Self { ping_id: ping_id.into(), block_number }
    }
}

/// Fully priced `pong` call, ready to be signed by the chain client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PongTransaction {
    pub ping_id: PingId,
    pub nonce: u64,
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Receipt of an included pong transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PongReceipt {
    pub tx_hash: String,
    pub block_number: u64,
}
