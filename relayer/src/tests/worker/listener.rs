use crate::core::client::chain::{ChainError, MockChainClient, PingStream};
use crate::tests::common::constants::PENDING_BASE_FEE;
use crate::tests::common::{expect_attempt_reads, receipt_for, store_at_block, wait_until, TestConfigBuilder};
use crate::types::{PingEvent, PingId};
use crate::worker::PingListener;
use assert_matches::assert_matches;
use futures::StreamExt;
use mockall::Sequence;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn feed_is_deduplicated_and_resubscribed() {
    let store = store_at_block(1_000);
    let mut chain = MockChainClient::new();
    expect_attempt_reads(&mut chain, Some(PENDING_BASE_FEE));
    chain.expect_send_pong().times(2).returning(|tx| Ok(receipt_for(&tx.ping_id)));

    let mut seq = Sequence::new();
    chain.expect_subscribe_pings().times(1).in_sequence(&mut seq).returning(|| {
        let items = vec![
            Ok(PingEvent::new("0x01", 1_001)),
            Ok(PingEvent::new("0x01", 1_001)),
            Err(ChainError::EventStream { message: "filter not found".to_string() }),
            Ok(PingEvent::new("0x02", 1_002)),
        ];
        Ok(futures::stream::iter(items).boxed() as PingStream)
    });
    chain
        .expect_subscribe_pings()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(ChainError::Rpc("connection refused".to_string())));

    let cancellation = CancellationToken::new();
    let relayer = TestConfigBuilder::new().configure_store(store.clone()).configure_chain(chain).build();
    let listener =
        PingListener::new(relayer.clone(), cancellation.clone()).with_resubscribe_delay(Duration::from_secs(1));

    assert_matches!(listener.run().await, Err(ChainError::Rpc(_)));

    wait_until(200, || {
        let relayer = relayer.clone();
        async move {
            relayer.is_processed(&PingId::from("0x01")).await
                && relayer.is_processed(&PingId::from("0x02")).await
                && !relayer.is_draining()
        }
    })
    .await;
    assert_eq!(store.snapshot().unwrap().processed.len(), 2);
}

#[tokio::test]
async fn stops_cleanly_on_cancellation() {
    let mut chain = MockChainClient::new();
    chain.expect_subscribe_pings().times(1).returning(|| Ok(futures::stream::pending().boxed() as PingStream));
    let cancellation = CancellationToken::new();
    let relayer = TestConfigBuilder::new().configure_chain(chain).build();

    let handle = tokio::spawn(PingListener::new(relayer, cancellation.clone()).run());
    tokio::task::yield_now().await;
    cancellation.cancel();

    assert_matches!(handle.await.unwrap(), Ok(()));
}

#[tokio::test]
async fn cancelled_before_subscribing_returns_immediately() {
    let mut chain = MockChainClient::new();
    chain.expect_subscribe_pings().returning(|| Ok(futures::stream::pending().boxed() as PingStream));
    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let relayer = TestConfigBuilder::new().configure_chain(chain).build();

    assert_matches!(PingListener::new(relayer, cancellation).run().await, Ok(()));
}
