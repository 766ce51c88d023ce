pub mod constant;
pub mod error;
pub mod mongodb;

use crate::types::{FailureRecord, PingId, ProcessingState};
use async_trait::async_trait;
pub use error::DatabaseError;
pub use mongodb::MongoDbClient;

/// Durable storage of the single [`ProcessingState`] record and of the failure log.
///
/// Every method is a single write against the backing store. `commit_success` in particular
/// must apply all of its changes atomically: a crash may never leave a ping in `processed`
/// while the block cursor still points before it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// get - Load the processing state, `None` on a fresh deployment
    async fn get(&self) -> Result<Option<ProcessingState>, DatabaseError>;

    /// put - Write the full record, replacing whatever was stored
    async fn put(&self, state: &ProcessingState) -> Result<(), DatabaseError>;

    /// add_pending - Mark a ping as being submitted
    async fn add_pending(&self, ping_id: &PingId) -> Result<(), DatabaseError>;

    /// commit_success - Move a ping from pending to processed and advance the block cursor
    async fn commit_success(
        &self,
        block_number: u64,
        pong_tx_hash: &str,
        ping_id: &PingId,
    ) -> Result<(), DatabaseError>;

    /// remove_pending - Drop a ping from pending without marking it processed
    async fn remove_pending(&self, ping_id: &PingId) -> Result<(), DatabaseError>;

    /// set_last_processed_block - Advance the block cursor
    async fn set_last_processed_block(&self, block_number: u64) -> Result<(), DatabaseError>;

    /// append_failure - Append an entry to the failure log
    async fn append_failure(&self, record: FailureRecord) -> Result<(), DatabaseError>;
}
