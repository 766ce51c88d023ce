use crate::types::constant::DEFAULT_STATUS_ID;
use clap::Args;

/// Parameters used to config MongoDB.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB server.
    #[arg(env = "PONG_RELAYER_MONGODB_CONNECTION_URL", long, default_value = "mongodb://localhost:27017")]
    pub mongodb_connection_url: String,

    /// The name of the database.
    #[arg(env = "PONG_RELAYER_DATABASE_NAME", long, default_value = "pong_relayer")]
    pub mongodb_database_name: String,

    /// Key of the processing state record. Two relayers sharing a database need distinct ids.
    #[arg(env = "PONG_RELAYER_STATUS_ID", long, default_value = DEFAULT_STATUS_ID)]
    pub status_id: String,
}
