use crate::cli::RunCmd;
use crate::core::client::{ChainClient, EthereumChainClient, MongoDbClient, StateStore};
use crate::types::params::{DatabaseParams, EthereumParams, RelayerParams};
use crate::RelayerResult;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the engine needs: tuning parameters plus the two external collaborators.
pub struct Config {
    params: RelayerParams,
    store: Arc<dyn StateStore>,
    chain: Arc<dyn ChainClient>,
}

impl Config {
    pub fn new(params: RelayerParams, store: Arc<dyn StateStore>, chain: Arc<dyn ChainClient>) -> Self {
        Self { params, store, chain }
    }

    /// Validates the command line and connects the MongoDB store and the Ethereum client.
    pub async fn from_run_cmd(run_cmd: &RunCmd) -> RelayerResult<Self> {
        let ethereum_params = EthereumParams::try_from(run_cmd.ethereum_args.clone())?;
        let database_params = DatabaseParams::try_from(run_cmd.mongodb_args.clone())?;
        let params = RelayerParams::try_from(run_cmd.relayer_args.clone())?;
        debug!(?params, "Relayer parameters validated");

        let store = MongoDbClient::new(&database_params).await?;
        info!(database = %database_params.database_name, status_id = %database_params.status_id, "Connected to MongoDB");
        let chain = EthereumChainClient::new(&ethereum_params);

        Ok(Self::new(params, Arc::new(store), Arc::new(chain)))
    }

    pub fn params(&self) -> &RelayerParams {
        &self.params
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    pub fn chain(&self) -> &Arc<dyn ChainClient> {
        &self.chain
    }
}
