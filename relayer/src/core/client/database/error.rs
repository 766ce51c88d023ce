use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Failed to serialize document: {0}")]
    FailedToSerializeDocument(String),

    #[error("Value {0} does not fit in a BSON integer")]
    ValueOutOfRange(u64),

    #[error("Processing state record {0} does not exist")]
    RecordNotFound(String),
}

impl From<bson::ser::Error> for DatabaseError {
    fn from(e: bson::ser::Error) -> Self {
        DatabaseError::FailedToSerializeDocument(e.to_string())
    }
}
