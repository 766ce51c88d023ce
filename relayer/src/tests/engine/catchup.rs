use crate::core::client::chain::{ChainError, MockChainClient};
use crate::engine::CatchupError;
use crate::tests::common::{store_at_block, TestConfigBuilder};
use crate::types::{PingEvent, PingId};
use assert_matches::assert_matches;
use mockall::predicate::eq;
use std::sync::atomic::Ordering;

fn chain_with_head(head: u64) -> MockChainClient {
    let mut chain = MockChainClient::new();
    chain.expect_head_block_number().returning(move || Ok(head));
    chain
}

#[tokio::test]
async fn scans_every_chunk_and_moves_the_cursor() {
    let store = store_at_block(100);
    let mut chain = chain_with_head(1_300);
    chain
        .expect_ping_events()
        .with(eq(101), eq(599))
        .times(1)
        .returning(|_, _| Ok(vec![PingEvent::new("0xa1", 150), PingEvent::new("0xa2", 420)]));
    chain.expect_ping_events().with(eq(600), eq(1_098)).times(1).returning(|_, _| Ok(vec![]));
    chain
        .expect_ping_events()
        .with(eq(1_099), eq(1_300))
        .times(1)
        // same ping delivered twice by the node
        .returning(|_, _| Ok(vec![PingEvent::new("0xa3", 1_200), PingEvent::new("0xa3", 1_200)]));
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();
    relayer.with_state(|state| state.last_processed_block = 100).await;

    let report = relayer.catch_up().await.unwrap();

    assert_eq!(report.chunks_scanned, 3);
    assert_eq!(report.events_found, 4);
    assert_eq!(report.admitted, 3);
    assert_eq!(report.last_scanned_block, 1_300);
    assert!(report.aborted.is_none());
    assert_eq!(store.cursor_history(), vec![599, 1_098, 1_300]);
    assert_eq!(relayer.last_processed_block().await, 1_300);
    assert_eq!(relayer.queue_len().await, 3);
    // catch-up only fills the queue
    assert!(!relayer.is_draining());
}

#[tokio::test]
async fn failed_chunk_keeps_the_progress_made_so_far() {
    let store = store_at_block(100);
    let mut chain = chain_with_head(1_300);
    chain.expect_ping_events().with(eq(101), eq(599)).times(1).returning(|_, _| Ok(vec![PingEvent::new("0xa1", 150)]));
    chain
        .expect_ping_events()
        .with(eq(600), eq(1_098))
        .times(1)
        .returning(|_, _| Err(ChainError::Rpc("query returned more than 10000 results".to_string())));
    chain.expect_ping_events().with(eq(1_099), eq(1_300)).never();
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();
    relayer.with_state(|state| state.last_processed_block = 100).await;

    let report = relayer.catch_up().await.unwrap();

    assert_matches!(report.aborted, Some(CatchupError::ChunkQuery { from_block: 600, to_block: 1_098, .. }));
    assert_eq!(report.chunks_scanned, 1);
    assert_eq!(report.last_scanned_block, 599);
    assert_eq!(store.snapshot().unwrap().last_processed_block, 599);
    assert_eq!(relayer.last_processed_block().await, 599);
    assert_eq!(relayer.queue_len().await, 1);
}

#[tokio::test]
async fn cursor_write_failure_stops_the_scan() {
    let store = store_at_block(100);
    store.fail_cursor.store(true, Ordering::SeqCst);
    let mut chain = chain_with_head(1_300);
    chain.expect_ping_events().times(1).returning(|_, _| Ok(vec![PingEvent::new("0xa1", 150)]));
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();
    relayer.with_state(|state| state.last_processed_block = 100).await;

    let report = relayer.catch_up().await.unwrap();

    assert_matches!(report.aborted, Some(CatchupError::CursorPersist { block_number: 599, .. }));
    assert_eq!(relayer.last_processed_block().await, 100);
    // events of the chunk were admitted before the write failed
    assert_eq!(relayer.queue_len().await, 1);
}

#[tokio::test]
async fn nothing_to_do_when_up_to_date() {
    let mut chain = chain_with_head(500);
    chain.expect_ping_events().never();
    let relayer = TestConfigBuilder::new().configure_store(store_at_block(500)).configure_chain(chain).build();
    relayer.with_state(|state| state.last_processed_block = 500).await;

    let report = relayer.catch_up().await.unwrap();

    assert_eq!(report.chunks_scanned, 0);
    assert_eq!(report.last_scanned_block, 500);
}

#[tokio::test]
async fn unreadable_head_is_an_error() {
    let mut chain = MockChainClient::new();
    chain.expect_head_block_number().returning(|| Err(ChainError::Rpc("connection refused".to_string())));
    chain.expect_ping_events().never();
    let relayer = TestConfigBuilder::new().configure_chain(chain).build();

    assert_matches!(relayer.catch_up().await, Err(CatchupError::HeadUnavailable(ChainError::Rpc(_))));
}

#[tokio::test]
async fn already_processed_events_are_not_queued() {
    let mut chain = chain_with_head(10);
    chain.expect_ping_events().returning(|_, _| Ok(vec![PingEvent::new("0xdone", 5), PingEvent::new("0xnew", 6)]));
    let relayer = TestConfigBuilder::new().configure_store(store_at_block(0)).configure_chain(chain).build();
    relayer.with_state(|state| state.processed.insert(PingId::from("0xdone"))).await;

    let report = relayer.catch_up().await.unwrap();

    assert_eq!(report.events_found, 2);
    assert_eq!(report.admitted, 1);
}
