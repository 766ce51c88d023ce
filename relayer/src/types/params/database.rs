use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::RelayerError;

#[derive(Debug, Clone)]
pub struct DatabaseParams {
    pub connection_url: String,
    pub database_name: String,
    pub status_id: String,
}

impl TryFrom<MongoDBCliArgs> for DatabaseParams {
    type Error = RelayerError;

    fn try_from(args: MongoDBCliArgs) -> Result<Self, Self::Error> {
        if args.status_id.trim().is_empty() {
            return Err(RelayerError::Configuration("Status id must not be empty".to_string()));
        }
        Ok(Self {
            connection_url: args.mongodb_connection_url,
            database_name: args.mongodb_database_name,
            status_id: args.status_id,
        })
    }
}
