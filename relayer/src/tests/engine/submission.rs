use crate::core::client::chain::{ChainError, MockChainClient};
use crate::engine::{SubmissionError, SubmissionProtocol};
use crate::tests::common::constants::{GAS_LIMIT, NONCE, PENDING_BASE_FEE, SENDER};
use crate::tests::common::{expect_attempt_reads, receipt_for};
use crate::types::constant::ONE_GWEI;
use crate::types::params::{FeePolicy, RetryPolicy};
use crate::types::{PingId, PongTransaction};
use assert_matches::assert_matches;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn protocol(chain: &MockChainClient) -> SubmissionProtocol<'_> {
    SubmissionProtocol::new(chain, FeePolicy::default(), RetryPolicy::default())
}

#[tokio::test]
async fn first_attempt_is_priced_from_the_pending_block() {
    let mut chain = MockChainClient::new();
    expect_attempt_reads(&mut chain, Some(PENDING_BASE_FEE));
    chain
        .expect_send_pong()
        .withf(|tx: &PongTransaction| {
            tx.ping_id == PingId::from("0xabc")
                && tx.nonce == NONCE
                && tx.gas_limit == GAS_LIMIT
                && tx.max_priority_fee_per_gas == 3 * ONE_GWEI / 2
                && tx.max_fee_per_gas == PENDING_BASE_FEE + 3 * ONE_GWEI / 2
        })
        .times(1)
        .returning(|tx| Ok(receipt_for(&tx.ping_id)));

    let receipt = protocol(&chain).submit(&PingId::from("0xabc")).await.unwrap();
    assert_eq!(receipt, receipt_for(&PingId::from("0xabc")));
}

#[tokio::test]
async fn missing_base_fee_uses_the_default() {
    let mut chain = MockChainClient::new();
    expect_attempt_reads(&mut chain, None);
    chain
        .expect_send_pong()
        .withf(|tx: &PongTransaction| tx.max_fee_per_gas == 20 * ONE_GWEI + 3 * ONE_GWEI / 2)
        .times(1)
        .returning(|tx| Ok(receipt_for(&tx.ping_id)));

    assert!(protocol(&chain).submit(&PingId::from("0xabc")).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_five_attempts_with_escalating_fees() {
    let priority_fees = Arc::new(Mutex::new(Vec::new()));
    let mut chain = MockChainClient::new();
    expect_attempt_reads(&mut chain, Some(PENDING_BASE_FEE));
    let recorded = Arc::clone(&priority_fees);
    chain.expect_send_pong().times(5).returning(move |tx| {
        recorded.lock().unwrap().push(tx.max_priority_fee_per_gas);
        Err(ChainError::Transaction("replacement transaction underpriced".to_string()))
    });

    let started = tokio::time::Instant::now();
    let result = protocol(&chain).submit(&PingId::from("0xdef")).await;

    assert_matches!(result, Err(SubmissionError::Exhausted { attempts: 5, ref last_error }) => {
        assert!(last_error.contains("underpriced"));
    });
    let fees = priority_fees.lock().unwrap().clone();
    assert_eq!(fees, (0..5u128).map(|k| 3 * ONE_GWEI / 2 + k * ONE_GWEI).collect::<Vec<_>>());
    assert!(fees.windows(2).all(|pair| pair[0] <= pair[1]));
    // 2s + 4s + 6s + 8s of backoff, none after the last attempt
    assert_eq!(started.elapsed(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn recovers_after_a_transient_failure_with_a_fresh_nonce() {
    let mut chain = MockChainClient::new();
    chain.expect_sender_address().returning(|| SENDER);
    let nonce_reads = Arc::new(AtomicUsize::new(0));
    let reads = Arc::clone(&nonce_reads);
    chain.expect_pending_transaction_count().times(2).returning(move |_| {
        Ok(NONCE + reads.fetch_add(1, Ordering::SeqCst) as u64)
    });
    chain.expect_estimate_pong_gas().returning(|_| Ok(GAS_LIMIT));
    chain.expect_pending_base_fee().returning(|| Ok(Some(PENDING_BASE_FEE)));

    let sends = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&sends);
    chain.expect_send_pong().times(2).returning(move |tx| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(ChainError::Rpc("connection reset".to_string()));
        }
        assert_eq!(tx.nonce, NONCE + 1);
        assert_eq!(tx.max_priority_fee_per_gas, 5 * ONE_GWEI / 2);
        Ok(receipt_for(&tx.ping_id))
    });

    assert!(protocol(&chain).submit(&PingId::from("0xabc")).await.is_ok());
    assert_eq!(nonce_reads.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn failure_to_read_the_nonce_counts_as_an_attempt() {
    let mut chain = MockChainClient::new();
    chain.expect_sender_address().returning(|| SENDER);
    chain.expect_pending_transaction_count().times(2).returning(|_| Err(ChainError::Rpc("timeout".to_string())));
    chain.expect_send_pong().never();

    let retry = RetryPolicy { max_attempts: 2, backoff_base: Duration::from_millis(10) };
    let result = SubmissionProtocol::new(&chain, FeePolicy::default(), retry).submit(&PingId::from("0xabc")).await;

    assert_matches!(result, Err(SubmissionError::Exhausted { attempts: 2, .. }));
}
