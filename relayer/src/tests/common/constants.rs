use crate::types::constant::ONE_GWEI;
use alloy::primitives::{address, Address};

pub const SENDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const NONCE: u64 = 7;
pub const GAS_LIMIT: u64 = 26_000;
pub const PENDING_BASE_FEE: u128 = 10 * ONE_GWEI;
pub const RECEIPT_BLOCK: u64 = 1_234;
