use crate::types::constant::{DEFAULT_POLL_INTERVAL_MS, SEPOLIA_CHAIN_ID};
use clap::Args;
use url::Url;

/// Parameters used to talk to the chain hosting the PingPong contract.
#[derive(Clone, Args)]
pub struct EthereumCliArgs {
    /// The URL of the Ethereum RPC node.
    #[arg(env = "PONG_RELAYER_ETHEREUM_RPC_URL", long)]
    pub ethereum_rpc_url: Option<Url>,

    /// The private key of the account sending pong transactions.
    #[arg(env = "PONG_RELAYER_ETHEREUM_PRIVATE_KEY", long, hide_env_values = true)]
    pub ethereum_private_key: Option<String>,

    /// The address of the PingPong contract.
    #[arg(env = "PONG_RELAYER_CONTRACT_ADDRESS", long)]
    pub contract_address: Option<String>,

    /// Chain id used when signing transactions. Defaults to Sepolia.
    #[arg(env = "PONG_RELAYER_CHAIN_ID", long, default_value_t = SEPOLIA_CHAIN_ID)]
    pub chain_id: u64,

    /// How often the live Ping filter is polled, in milliseconds.
    #[arg(env = "PONG_RELAYER_POLL_INTERVAL_MS", long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
}

// Hand written so the private key never ends up in the logs.
impl std::fmt::Debug for EthereumCliArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumCliArgs")
            .field("ethereum_rpc_url", &self.ethereum_rpc_url)
            .field("ethereum_private_key", &self.ethereum_private_key.as_ref().map(|_| "<redacted>"))
            .field("contract_address", &self.contract_address)
            .field("chain_id", &self.chain_id)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}
