pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Documents are JSON objects; typed models live in `database::models`.
pub type Document = Value;

/// Upper bound on a single batch write, matching the hosted-store limit.
pub const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
    #[error("batch of {0} documents exceeds the {MAX_BATCH_SIZE}-document write limit")]
    BatchTooLarge(usize),
    #[error("failed to encode document for {collection}/{id}")]
    Encode {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode document {collection}/{id}")]
    Decode {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Document-oriented store with best-effort consistency. Every write is a
/// last-writer-wins overwrite of the targeted fields; no cross-document
/// transactions are assumed available.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Full overwrite of the document.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    /// Partial overwrite: top-level fields are written into the existing
    /// document, creating it when absent.
    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;

    /// All documents of a collection in stable id order.
    async fn query(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError>;

    /// Write up to `MAX_BATCH_SIZE` documents; larger batches are rejected.
    async fn batch_write(
        &self,
        collection: &str,
        docs: Vec<(String, Document)>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

pub fn encode<T: Serialize>(collection: &str, id: &str, value: &T) -> Result<Document, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Encode {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}

pub fn decode<T: DeserializeOwned>(
    collection: &str,
    id: &str,
    doc: Document,
) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|source| StoreError::Decode {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}
