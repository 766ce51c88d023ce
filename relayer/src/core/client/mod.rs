pub mod chain;
pub mod database;

pub use chain::{ChainClient, EthereumChainClient};
pub use database::{MongoDbClient, StateStore};
