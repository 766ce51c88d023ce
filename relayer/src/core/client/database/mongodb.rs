use super::error::DatabaseError;
use crate::core::client::database::constant::{FAILED_PINGS_COLLECTION, STATUS_COLLECTION};
use crate::core::client::database::StateStore;
use crate::types::params::DatabaseParams;
use crate::types::{FailureRecord, PingId, ProcessingState};
use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ReplaceOptions;
use mongodb::{bson, Client, Collection, Database};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub trait ToDocument {
    fn to_document(&self) -> Result<Document, DatabaseError>;
}

impl<T: Serialize> ToDocument for T {
    fn to_document(&self) -> Result<Document, DatabaseError> {
        let doc = bson::to_bson(self)?;

        if let Bson::Document(doc) = doc {
            Ok(doc)
        } else {
            Err(DatabaseError::FailedToSerializeDocument(format!("Failed to serialize document: {}", doc)))
        }
    }
}

/// Shape of the processing state as stored in MongoDB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDocument {
    pub status_id: String,
    #[serde(flatten)]
    pub state: ProcessingState,
}

/// MongoDB backed [`StateStore`].
pub struct MongoDbClient {
    database: Arc<Database>,
    status_id: String,
}

impl MongoDbClient {
    pub async fn new(config: &DatabaseParams) -> Result<Self, DatabaseError> {
        let client = Client::with_uri_str(&config.connection_url).await?;
        let database = Arc::new(client.database(&config.database_name));
        Ok(Self { database, status_id: config.status_id.clone() })
    }

    fn status_collection(&self) -> Collection<StatusDocument> {
        self.database.collection(STATUS_COLLECTION)
    }

    /// Untyped view of the status collection, for writes of an already converted record.
    fn raw_status_collection(&self) -> Collection<Document> {
        self.database.collection(STATUS_COLLECTION)
    }

    fn failed_pings_collection(&self) -> Collection<FailureRecord> {
        self.database.collection(FAILED_PINGS_COLLECTION)
    }

    fn status_filter(&self) -> Document {
        doc! { "status_id": &self.status_id }
    }

    /// Applies `update` to the status record, which must already exist.
    async fn update_status(&self, update: Document) -> Result<(), DatabaseError> {
        let result = self.status_collection().update_one(self.status_filter(), update, None).await?;
        if result.matched_count == 0 {
            warn!(status_id = %self.status_id, "Status record not found while updating");
            return Err(DatabaseError::RecordNotFound(self.status_id.clone()));
        }
        Ok(())
    }
}

/// Full status record as written by `put`, converted once and sent as is.
fn status_document(status_id: &str, state: &ProcessingState) -> Result<Document, DatabaseError> {
    StatusDocument { status_id: status_id.to_string(), state: state.clone() }.to_document()
}

fn to_bson_int(value: u64) -> Result<i64, DatabaseError> {
    i64::try_from(value).map_err(|_| DatabaseError::ValueOutOfRange(value))
}

#[async_trait]
impl StateStore for MongoDbClient {
    async fn get(&self) -> Result<Option<ProcessingState>, DatabaseError> {
        let document = self.status_collection().find_one(self.status_filter(), None).await?;
        debug!(status_id = %self.status_id, found = document.is_some(), "Fetched processing state");
        Ok(document.map(|document| document.state))
    }

    async fn put(&self, state: &ProcessingState) -> Result<(), DatabaseError> {
        let document = status_document(&self.status_id, state)?;
        let options = ReplaceOptions::builder().upsert(true).build();
        self.raw_status_collection().replace_one(self.status_filter(), document, options).await?;
        debug!(
            status_id = %self.status_id,
            last_processed_block = state.last_processed_block,
            "Processing state written"
        );
        Ok(())
    }

    async fn add_pending(&self, ping_id: &PingId) -> Result<(), DatabaseError> {
        self.update_status(doc! { "$addToSet": { "pending": ping_id.as_str() } }).await?;
        debug!(ping_id = %ping_id, "Ping marked as pending");
        Ok(())
    }

    async fn commit_success(
        &self,
        block_number: u64,
        pong_tx_hash: &str,
        ping_id: &PingId,
    ) -> Result<(), DatabaseError> {
        let update = doc! {
            "$set": {
                "last_processed_block": to_bson_int(block_number)?,
                "last_processed_ping": ping_id.as_str(),
                "last_pong_tx_hash": pong_tx_hash,
            },
            "$addToSet": { "processed": ping_id.as_str() },
            "$pull": { "pending": ping_id.as_str() },
        };
        self.update_status(update).await?;
        debug!(ping_id = %ping_id, block_number, pong_tx_hash, "Ping committed as processed");
        Ok(())
    }

    async fn remove_pending(&self, ping_id: &PingId) -> Result<(), DatabaseError> {
        self.update_status(doc! { "$pull": { "pending": ping_id.as_str() } }).await?;
        debug!(ping_id = %ping_id, "Ping removed from pending");
        Ok(())
    }

    async fn set_last_processed_block(&self, block_number: u64) -> Result<(), DatabaseError> {
        self.update_status(doc! { "$set": { "last_processed_block": to_bson_int(block_number)? } }).await?;
        debug!(block_number, "Block cursor advanced");
        Ok(())
    }

    async fn append_failure(&self, record: FailureRecord) -> Result<(), DatabaseError> {
        self.failed_pings_collection().insert_one(&record, None).await?;
        debug!(ping_id = %record.ping_id, "Failure record appended");
        Ok(())
    }
}
