use alloy::sol_types;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    #[error("Contract interaction failed: {0}")]
    Contract(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Transaction signing failed: {0}")]
    Signing(String),

    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    #[error("Ping id {0} is not a 32 byte hash")]
    InvalidPingId(String),

    #[error("Event stream error: {message}")]
    EventStream { message: String },
}

impl From<sol_types::Error> for ChainError {
    fn from(e: sol_types::Error) -> Self {
        ChainError::Contract(e.to_string())
    }
}

impl ChainError {
    /// Returns true if the error is transient (network/connection issues) and the same call may
    /// succeed later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rpc(_) | Self::Transaction(_) | Self::EventStream { .. })
    }
}
