pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod types;
pub mod utils;
pub mod worker;


// Re-export commonly used item
pub use error::{RelayerError, RelayerResult};
