use crate::core::client::chain::{ChainError, MockChainClient};
use crate::core::client::database::{DatabaseError, MockStateStore};
use crate::engine::CatchupError;
use crate::tests::common::constants::PENDING_BASE_FEE;
use crate::tests::common::{expect_attempt_reads, receipt_for, wait_until, InMemoryStateStore, TestConfigBuilder};
use crate::types::{PingId, ProcessingState};
use crate::RelayerError;
use assert_matches::assert_matches;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn first_start_begins_at_the_chain_head() {
    let store = Arc::new(InMemoryStateStore::default());
    let mut chain = MockChainClient::new();
    chain.expect_head_block_number().returning(|| Ok(5_000));
    chain.expect_ping_events().never();
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();

    let report = relayer.bootstrap().await.unwrap();

    assert!(report.initialised);
    assert_eq!(report.requeued, 0);
    assert!(!report.drain_started);
    assert_eq!(report.catchup.chunks_scanned, 0);
    assert_eq!(store.snapshot(), Some(ProcessingState::starting_at(5_000)));
    assert_eq!(relayer.last_processed_block().await, 5_000);
}

#[tokio::test]
async fn interrupted_pings_are_resubmitted_once() {
    let mut persisted = ProcessingState::starting_at(10);
    persisted.pending.insert(PingId::from("0xabc"));
    persisted.processed.insert(PingId::from("0xold"));
    let store = Arc::new(InMemoryStateStore::with_state(persisted));

    let mut chain = MockChainClient::new();
    expect_attempt_reads(&mut chain, Some(PENDING_BASE_FEE));
    chain.expect_head_block_number().returning(|| Ok(10));
    chain.expect_send_pong().times(1).returning(|tx| Ok(receipt_for(&tx.ping_id)));
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();

    let report = relayer.bootstrap().await.unwrap();
    assert!(!report.initialised);
    assert_eq!(report.requeued, 1);
    assert!(report.drain_started);

    // the live feed replays the same ping while it is being resubmitted
    assert!(!relayer.ingest(PingId::from("0xabc")).await);

    let ping = PingId::from("0xabc");
    wait_until(200, || {
        let relayer = relayer.clone();
        let ping = ping.clone();
        async move { relayer.is_processed(&ping).await && !relayer.is_draining() }
    })
    .await;
    assert!(!relayer.ingest(ping.clone()).await);

    let persisted = store.snapshot().unwrap();
    assert!(persisted.pending.is_empty());
    assert!(persisted.processed.contains(&ping));
    assert!(persisted.processed.contains(&PingId::from("0xold")));
}

#[tokio::test]
async fn pending_entry_already_processed_is_not_requeued() {
    let mut persisted = ProcessingState::starting_at(10);
    persisted.pending.insert(PingId::from("0xold"));
    persisted.processed.insert(PingId::from("0xold"));
    let mut chain = MockChainClient::new();
    chain.expect_head_block_number().returning(|| Ok(10));
    chain.expect_send_pong().never();
    let relayer = TestConfigBuilder::new()
        .configure_store(Arc::new(InMemoryStateStore::with_state(persisted)))
        .configure_chain(chain)
        .build();

    let report = relayer.bootstrap().await.unwrap();

    assert_eq!(report.requeued, 0);
    assert!(!report.drain_started);
}

#[tokio::test]
async fn unreadable_state_is_fatal() {
    let mut store = MockStateStore::new();
    store.expect_get().times(1).returning(|| Err(DatabaseError::RecordNotFound("main_status".to_string())));
    store.expect_put().never();
    let relayer = TestConfigBuilder::new().configure_store(Arc::new(store)).build();

    assert_matches!(relayer.bootstrap().await, Err(RelayerError::Bootstrap(message)) => {
        assert!(message.contains("main_status"));
    });
}

#[tokio::test]
async fn in_memory_get_failure_is_fatal_too() {
    let store = Arc::new(InMemoryStateStore::default());
    store.fail_get.store(true, Ordering::SeqCst);
    let relayer = TestConfigBuilder::new().configure_store(store).build();

    assert_matches!(relayer.bootstrap().await, Err(RelayerError::Bootstrap(_)));
}

#[tokio::test]
async fn unreadable_head_during_catch_up_is_fatal() {
    let mut persisted = ProcessingState::starting_at(10);
    persisted.pending.insert(PingId::from("0xabc"));
    let store = Arc::new(InMemoryStateStore::with_state(persisted));
    let mut chain = MockChainClient::new();
    chain.expect_head_block_number().returning(|| Err(ChainError::Rpc("node syncing".to_string())));
    chain.expect_ping_events().never();
    chain.expect_send_pong().never();
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();

    assert_matches!(
        relayer.bootstrap().await,
        Err(RelayerError::Catchup(CatchupError::HeadUnavailable(ChainError::Rpc(_))))
    );
    // nothing was submitted, so the cursor still points before the unscanned blocks
    assert!(!relayer.is_draining());
    assert_eq!(store.snapshot().unwrap().last_processed_block, 10);
    assert!(store.cursor_history().is_empty());
}

#[tokio::test]
async fn failing_catch_up_chunk_does_not_stop_startup() {
    let store = Arc::new(InMemoryStateStore::with_state(ProcessingState::starting_at(10)));
    let mut chain = MockChainClient::new();
    chain.expect_head_block_number().returning(|| Ok(2_000));
    chain
        .expect_ping_events()
        .times(1)
        .returning(|_, _| Err(ChainError::Rpc("query timeout".to_string())));
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();

    let report = relayer.bootstrap().await.unwrap();

    assert_matches!(report.catchup.aborted, Some(CatchupError::ChunkQuery { from_block: 11, to_block: 509, .. }));
    assert_eq!(store.snapshot().unwrap().last_processed_block, 10);
    assert_eq!(relayer.last_processed_block().await, 10);
}
