use crate::cli::ethereum::EthereumCliArgs;
use crate::RelayerError;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr as _;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct EthereumParams {
    pub rpc_url: Url,
    pub signer: PrivateKeySigner,
    pub contract_address: Address,
    pub chain_id: u64,
    pub poll_interval: Duration,
}

impl TryFrom<EthereumCliArgs> for EthereumParams {
    type Error = RelayerError;

    fn try_from(args: EthereumCliArgs) -> Result<Self, Self::Error> {
        let rpc_url = args
            .ethereum_rpc_url
            .ok_or_else(|| RelayerError::Configuration("Ethereum RPC URL is required".to_string()))?;

        let signer = args
            .ethereum_private_key
            .ok_or_else(|| RelayerError::Configuration("Ethereum private key is required".to_string()))?
            .parse::<PrivateKeySigner>()
            .map_err(|e| RelayerError::Configuration(format!("Invalid Ethereum private key: {}", e)))?;

        let contract_address = Address::from_str(
            &args
                .contract_address
                .ok_or_else(|| RelayerError::Configuration("Contract address is required".to_string()))?,
        )
        .map_err(|e| RelayerError::Configuration(format!("Invalid contract address: {}", e)))?;

        if args.poll_interval_ms == 0 {
            return Err(RelayerError::Configuration("Poll interval must be greater than 0".to_string()));
        }

        Ok(Self {
            rpc_url,
            signer,
            contract_address,
            chain_id: args.chain_id,
            poll_interval: Duration::from_millis(args.poll_interval_ms),
        })
    }
}
