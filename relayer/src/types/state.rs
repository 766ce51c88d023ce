use crate::types::ping::PingId;
use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Durable progress of the relayer.
///
/// Outside of an active submission a ping is never in both `processed` and `pending`.
/// A ping left in `pending` after a restart was interrupted mid-submission and is resubmitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingState {
    pub last_processed_block: u64,
    #[serde(default)]
    pub processed: HashSet<PingId>,
    #[serde(default)]
    pub pending: HashSet<PingId>,
    #[serde(default)]
    pub last_processed_ping: Option<PingId>,
    #[serde(default)]
    pub last_pong_tx_hash: Option<String>,
}

impl ProcessingState {
    pub fn starting_at(block_number: u64) -> Self {
        Self { last_processed_block: block_number, ..Default::default() }
    }
}

/// Audit entry for a ping that exhausted its retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub ping_id: PingId,
    pub reason: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl FailureRecord {
    pub fn new(ping_id: PingId, reason: impl Into<String>) -> Self {
        // bson stores milliseconds, rounding keeps records comparable after a round trip
        Self { ping_id, reason: reason.into(), timestamp: Utc::now().round_subsecs(3) }
    }
}
