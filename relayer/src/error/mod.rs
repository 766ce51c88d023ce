use thiserror::Error;

use crate::core::client::chain::ChainError;
use crate::core::client::database::DatabaseError;
use crate::engine::catchup::CatchupError;

/// Result type for relayer operations
pub type RelayerResult<T> = Result<T, RelayerError>;

/// Errors that stop the relayer. Everything recoverable is absorbed by the engine and only logged.
#[derive(Error, Debug)]
pub enum RelayerError {
    /// Missing or malformed configuration, detected before anything is started
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Startup could not load or initialise the processing state
    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Catch-up error: {0}")]
    Catchup(#[from] CatchupError),

    #[error("Relayer error: {0}")]
    Other(#[from] anyhow::Error),
}
