#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coursebook_client::{
    Document, DocumentStore, MemoryStore, Result, StoreError, COURSES_COLLECTION,
};
use serde_json::{json, Map, Value};
use tokio::sync::Notify;

/// A call made to a [`RecordingStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get,
    Set(String, Map<String, Value>),
    Delete(String),
}

/// Wraps a [`MemoryStore`], remembering every call and optionally failing or stalling them.
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub docs: MemoryStore,
    calls: Arc<Mutex<Vec<Call>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    gate: Option<Arc<Notify>>,
    write_gate: Option<Arc<Notify>>,
}

impl RecordingStore {
    pub fn new(docs: MemoryStore) -> Self {
        Self {
            docs,
            ..Default::default()
        }
    }

    /// Every `get` waits for the returned [`Notify`] before answering
    pub fn gated(docs: MemoryStore) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                docs,
                gate: Some(gate.clone()),
                ..Default::default()
            },
            gate,
        )
    }

    /// Every `set` waits for the returned [`Notify`] before writing
    pub fn gated_writes(docs: MemoryStore) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                docs,
                write_gate: Some(gate.clone()),
                ..Default::default()
            },
            gate,
        )
    }

    /// Make every call from now on fail with the given message
    pub fn fail_with(&self, msg: &str) {
        *self.fail_with.lock().unwrap() = Some(msg.to_string());
    }

    pub fn succeed(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| f(c)).count()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &*self.fail_with.lock().unwrap() {
            Some(msg) => Err(StoreError::Other(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn get(&self, collection: &str) -> Result<Vec<Document>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.record(Call::Get)?;
        self.docs.get(collection).await
    }

    async fn set(&self, collection: &str, key: &str, body: Map<String, Value>) -> Result<()> {
        if let Some(gate) = &self.write_gate {
            gate.notified().await;
        }
        self.record(Call::Set(key.to_string(), body.clone()))?;
        self.docs.set(collection, key, body).await
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        self.record(Call::Delete(key.to_string()))?;
        self.docs.delete(collection, key).await
    }
}

pub fn course_doc(key: &str, name: &str) -> Document {
    let Value::Object(body) = json!({
        "courseID": key,
        "courseName": name,
        "courseDuration": "6 weeks",
        "courseDescription": "An introduction",
    }) else {
        unreachable!()
    };

    Document::new(key, body)
}

/// A document whose fields have the wrong types
pub fn broken_doc(key: &str) -> Document {
    let Value::Object(body) = json!({
        "courseName": 12,
        "courseDuration": ["not", "a", "string"],
    }) else {
        unreachable!()
    };

    Document::new(key, body)
}

pub fn seeded(docs: impl IntoIterator<Item = Document>) -> MemoryStore {
    MemoryStore::seeded(COURSES_COLLECTION, docs)
}
