pub mod error;
pub mod ethereum;

use crate::types::{PingEvent, PingId, PongReceipt, PongTransaction};
use alloy::primitives::Address;
use async_trait::async_trait;
pub use error::ChainError;
pub use ethereum::EthereumChainClient;
use futures::stream::BoxStream;

pub type PingStream = BoxStream<'static, Result<PingEvent, ChainError>>;

/// Everything the relayer needs from the chain hosting the PingPong contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address that signs and pays for pong transactions
    fn sender_address(&self) -> Address;

    /// Latest block number known to the node
    async fn head_block_number(&self) -> Result<u64, ChainError>;

    /// Transaction count of `address`, mempool included
    async fn pending_transaction_count(&self, address: Address) -> Result<u64, ChainError>;

    /// Gas needed by `pong(ping_id)`
    async fn estimate_pong_gas(&self, ping_id: &PingId) -> Result<u64, ChainError>;

    /// Base fee of the pending block, `None` when the node does not report one
    async fn pending_base_fee(&self) -> Result<Option<u128>, ChainError>;

    /// Ping events emitted in `from_block..=to_block`
    async fn ping_events(&self, from_block: u64, to_block: u64) -> Result<Vec<PingEvent>, ChainError>;

    /// Signs and broadcasts `tx`, then waits until it is included in a block
    async fn send_pong(&self, tx: PongTransaction) -> Result<PongReceipt, ChainError>;

    /// Live feed of Ping events. Delivery is at-least-once, consumers must deduplicate.
    async fn subscribe_pings(&self) -> Result<PingStream, ChainError>;
}
