use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::Result;

/// A document from a collection: an opaque key and a schemaless body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn new(key: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            key: key.into(),
            body,
        }
    }
}

/// A managed document database, addressed by collection and key.
///
/// Each call is a single round trip; there is no batching or transaction across calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Snapshot of every document in the collection, in whatever order the store returns them.
    async fn get(&self, collection: &str) -> Result<Vec<Document>>;

    /// Write the document at `key`, replacing anything already there.
    async fn set(&self, collection: &str, key: &str, body: Map<String, Value>) -> Result<()>;

    /// Remove the document at `key`.
    /// Backends may return [`crate::StoreError::NotFound`] if there was nothing there.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;
}
