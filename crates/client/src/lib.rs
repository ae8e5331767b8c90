//! Course records and the plumbing around them: a document store seam with an in-memory and a
//! Cloud Firestore backend, the [`CourseStore`] client on top, and the state controllers the
//! UI drives.
pub mod controller;
pub mod course;
pub mod document;
pub mod firestore;
pub mod memory;
pub mod store;

pub use course::{Course, CourseDraft, MissingField};
pub use document::{Document, DocumentStore};
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;
pub use store::{CourseStore, Malformed, MissingDelete, StorePolicy};
use thiserror::Error;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Name of the collection courses live in, unless configured otherwise
pub const COURSES_COLLECTION: &str = "Courses";

/// Any failure of a round trip to the document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    HTTPError(#[from] reqwest::Error),

    #[error("{message} (status {code})")]
    Status { code: u16, message: String },

    #[error("serde error: {}", .0)]
    SerdeError(#[from] serde_json::Error),

    #[error("no document {key} in {collection}")]
    NotFound { collection: String, key: String },

    /// Courses are keyed by id, so there has to be one
    #[error("course has no id")]
    MissingId,

    #[error("malformed document {key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("{}", .0)]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_http_error_message_passes_through() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let message = err.to_string();

        assert_eq!(StoreError::from(err).to_string(), message);
    }
}
