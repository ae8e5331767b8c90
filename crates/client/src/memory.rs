use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{Document, DocumentStore, Result, StoreError};

type Collection = BTreeMap<String, Map<String, Value>>;

/// A document store that lives in memory, for offline use and tests.
/// Clones share the same underlying documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given documents already in `collection`
    pub fn seeded(collection: &str, docs: impl IntoIterator<Item = Document>) -> Self {
        let docs = docs.into_iter().map(|d| (d.key, d.body)).collect();
        let mut collections = HashMap::new();
        collections.insert(collection.to_string(), docs);

        Self {
            collections: Arc::new(RwLock::new(collections)),
        }
    }

    /// Number of documents currently in `collection`
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.len())
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    /// Body of the document at `key`, if there is one
    pub async fn body(&self, collection: &str, key: &str) -> Option<Map<String, Value>> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|c| c.get(key))
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(key, body)| Document::new(key.clone(), body.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(docs)
    }

    async fn set(&self, collection: &str, key: &str, body: Map<String, Value>) -> Result<()> {
        debug!("set {collection}/{key}");
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), body);

        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        debug!("delete {collection}/{key}");
        self.collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|c| c.remove(key))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })
    }
}
