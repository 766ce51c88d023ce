pub mod constant;
pub mod params;
pub mod ping;
pub mod state;

pub use ping::{PingEvent, PingId, PongReceipt, PongTransaction};
pub use state::{FailureRecord, ProcessingState};
