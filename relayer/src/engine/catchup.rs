use crate::core::client::chain::ChainError;
use crate::core::client::database::DatabaseError;
use crate::engine::Relayer;
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CatchupError {
    #[error("Failed to read the chain head: {0}")]
    HeadUnavailable(#[source] ChainError),

    #[error("Failed to query Ping events in blocks {from_block}..={to_block}: {source}")]
    ChunkQuery { from_block: u64, to_block: u64, source: ChainError },

    #[error("Failed to persist block cursor {block_number}: {source}")]
    CursorPersist { block_number: u64, source: DatabaseError },
}

/// Summary of a catch-up run. `aborted` holds the error that stopped the scan early, if any.
#[derive(Debug, Default)]
pub struct CatchupReport {
    pub chunks_scanned: usize,
    pub events_found: usize,
    pub admitted: usize,
    pub last_scanned_block: u64,
    pub aborted: Option<CatchupError>,
}

/// Splits the blocks after `last_processed` up to `head` into inclusive windows of `chunk_size`.
#[derive(Debug, Clone)]
pub struct BlockChunks {
    next: u64,
    head: u64,
    chunk_size: u64,
}

impl BlockChunks {
    pub fn new(last_processed: u64, head: u64, chunk_size: u64) -> Self {
        Self { next: last_processed.saturating_add(1), head, chunk_size: chunk_size.max(1) }
    }
}

impl Iterator for BlockChunks {
    type Item = RangeInclusive<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.head {
            return None;
        }
        let from = self.next;
        let to = from.saturating_add(self.chunk_size - 1).min(self.head);
        self.next = to.saturating_add(1);
        // u64::MAX as head would otherwise never terminate
        if to == u64::MAX {
            self.head = 0;
            self.next = 1;
        }
        Some(from..=to)
    }
}

impl Relayer {
    /// Backfills Ping events emitted while the relayer was not running.
    ///
    /// Chunks are scanned in order. Every event found goes through [`Relayer::admit`], then the
    /// block cursor is persisted at the end of the chunk. The first failing chunk stops the scan,
    /// keeping the progress made so far. Nothing is submitted here: the caller starts the
    /// reconciler once the scan is over.
    pub async fn catch_up(&self) -> Result<CatchupReport, CatchupError> {
        let chain = self.config.chain();
        let store = self.config.store();
        let chunk_size = self.config.params().catchup_chunk_size;

        let start_from = self.last_processed_block().await;
        let head = chain.head_block_number().await.map_err(CatchupError::HeadUnavailable)?;

        let mut report = CatchupReport { last_scanned_block: start_from, ..Default::default() };
        if start_from >= head {
            debug!(start_from, head, "No blocks to catch up on");
            return Ok(report);
        }
        info!(start_from, head, chunk_size, "Catching up on missed Ping events");

        for range in BlockChunks::new(start_from, head, chunk_size) {
            let (from_block, to_block) = (*range.start(), *range.end());

            let events = match chain.ping_events(from_block, to_block).await {
                Ok(events) => events,
                Err(source) => {
                    warn!(from_block, to_block, error = %source, "Ping query failed, aborting catch-up");
                    report.aborted = Some(CatchupError::ChunkQuery { from_block, to_block, source });
                    break;
                }
            };

            report.events_found += events.len();
            for event in events {
                if self.admit(event.ping_id).await {
                    report.admitted += 1;
                }
            }

            if let Err(source) = store.set_last_processed_block(to_block).await {
                warn!(block_number = to_block, error = %source, "Failed to persist block cursor, aborting catch-up");
                report.aborted = Some(CatchupError::CursorPersist { block_number: to_block, source });
                break;
            }
            self.state.lock().await.last_processed_block = to_block;
            report.chunks_scanned += 1;
            report.last_scanned_block = to_block;
            debug!(from_block, to_block, admitted = report.admitted, "Chunk scanned");
        }

        info!(
            chunks = report.chunks_scanned,
            events = report.events_found,
            admitted = report.admitted,
            last_scanned_block = report.last_scanned_block,
            aborted = report.aborted.is_some(),
            "Catch-up finished"
        );
        Ok(report)
    }
}
