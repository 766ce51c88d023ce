use crate::core::client::chain::{ChainClient, ChainError, PingStream};
use crate::types::params::EthereumParams;
use crate::types::{PingEvent, PingId, PongReceipt, PongTransaction};
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::BlockNumberOrTag;
use alloy::network::{EthereumWallet, ReceiptResponse as _, TransactionBuilder};
use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder, ReqwestProvider};
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use futures::StreamExt;
use std::str::FromStr as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// Only the parts of the PingPong contract the relayer touches.
sol!(
    #[derive(Debug)]
    contract PingPong {
        event Ping();
        event Pong(bytes32 txHash);

        function ping() external;
        function pong(bytes32 _txHash) external;
    }
);

/// How long to wait for a broadcast pong to be mined before the attempt counts as failed.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(180);

pub struct EthereumChainClient {
    provider: Arc<ReqwestProvider>,
    wallet: EthereumWallet,
    sender: Address,
    contract_address: Address,
    chain_id: u64,
    poll_interval: Duration,
}

impl EthereumChainClient {
    pub fn new(params: &EthereumParams) -> Self {
        let sender = params.signer.address();
        let wallet = EthereumWallet::from(params.signer.clone());
        let provider = Arc::new(ProviderBuilder::new().on_http(params.rpc_url.clone()));

        info!(%sender, contract = %params.contract_address, chain_id = params.chain_id, "Ethereum client ready");

        Self {
            provider,
            wallet,
            sender,
            contract_address: params.contract_address,
            chain_id: params.chain_id,
            poll_interval: params.poll_interval,
        }
    }

    fn ping_filter(&self) -> Filter {
        Filter::new().address(self.contract_address).event_signature(PingPong::Ping::SIGNATURE_HASH)
    }

    fn pong_request(&self, ping_id: &PingId) -> Result<TransactionRequest, ChainError> {
        let tx_hash = B256::from_str(ping_id.as_str()).map_err(|_| ChainError::InvalidPingId(ping_id.to_string()))?;
        let calldata = PingPong::pongCall { _txHash: tx_hash }.abi_encode();
        Ok(TransactionRequest::default().with_from(self.sender).with_to(self.contract_address).with_input(calldata))
    }
}

/// Extracts the ping id (emitting transaction hash) and block of a Ping log.
pub(crate) fn ping_event_from_log(log: &Log) -> Result<PingEvent, ChainError> {
    let tx_hash = log.transaction_hash.ok_or(ChainError::MissingField("transaction_hash"))?;
    let block_number = log.block_number.ok_or(ChainError::MissingField("block_number"))?;
    Ok(PingEvent::new(tx_hash, block_number))
}

/// Maps a batch of Ping logs, skipping the ones the node returned incomplete.
pub(crate) fn ping_events_from_logs(logs: &[Log]) -> Vec<PingEvent> {
    logs.iter()
        .filter_map(|log| match ping_event_from_log(log) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(error = %e, log_index = ?log.log_index, "Skipping unusable Ping log");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ChainClient for EthereumChainClient {
    fn sender_address(&self) -> Address {
        self.sender
    }

    async fn head_block_number(&self) -> Result<u64, ChainError> {
        self.provider.get_block_number().await.map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn pending_transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        self.provider.get_transaction_count(address).pending().await.map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn estimate_pong_gas(&self, ping_id: &PingId) -> Result<u64, ChainError> {
        let request = self.pong_request(ping_id)?;
        self.provider
            .estimate_gas(&request)
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to estimate pong gas: {}", e)))
    }

    async fn pending_base_fee(&self) -> Result<Option<u128>, ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Pending, false.into())
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        Ok(block.and_then(|block| block.header.base_fee_per_gas).map(u128::from))
    }

    async fn ping_events(&self, from_block: u64, to_block: u64) -> Result<Vec<PingEvent>, ChainError> {
        let filter = self.ping_filter().from_block(from_block).to_block(to_block);
        let logs = self.provider.get_logs(&filter).await.map_err(|e| ChainError::Rpc(e.to_string()))?;
        debug!(from_block, to_block, count = logs.len(), "Fetched Ping logs");
        Ok(ping_events_from_logs(&logs))
    }

    async fn send_pong(&self, tx: PongTransaction) -> Result<PongReceipt, ChainError> {
        let request = self
            .pong_request(&tx.ping_id)?
            .with_nonce(tx.nonce)
            .with_chain_id(self.chain_id)
            .with_gas_limit(tx.gas_limit)
            .with_max_fee_per_gas(tx.max_fee_per_gas)
            .with_max_priority_fee_per_gas(tx.max_priority_fee_per_gas);

        let envelope = request.build(&self.wallet).await.map_err(|e| ChainError::Signing(e.to_string()))?;
        let encoded = envelope.encoded_2718();

        let pending = self
            .provider
            .send_raw_transaction(&encoded)
            .await
            .map_err(|e| ChainError::Transaction(format!("Failed to broadcast pong: {}", e)))?;
        let tx_hash = *pending.tx_hash();
        debug!(ping_id = %tx.ping_id, %tx_hash, nonce = tx.nonce, "Pong broadcast");

        let receipt = pending
            .with_timeout(Some(RECEIPT_TIMEOUT))
            .get_receipt()
            .await
            .map_err(|e| ChainError::Transaction(format!("Pong {} was not mined: {}", tx_hash, e)))?;

        if !receipt.status() {
            return Err(ChainError::Transaction(format!("Pong {} reverted", tx_hash)));
        }
        let block_number = receipt.block_number.ok_or(ChainError::MissingField("block_number"))?;

        Ok(PongReceipt { tx_hash: receipt.transaction_hash.to_string(), block_number })
    }

    async fn subscribe_pings(&self) -> Result<PingStream, ChainError> {
        let poller = self
            .provider
            .watch_logs(&self.ping_filter())
            .await
            .map_err(|e| ChainError::EventStream { message: format!("Failed to watch Ping events: {}", e) })?;

        let stream = poller
            .with_poll_interval(self.poll_interval)
            .into_stream()
            .flat_map(|logs| futures::stream::iter(logs.into_iter().map(|log| ping_event_from_log(&log))));

        Ok(stream.boxed())
    }
}
