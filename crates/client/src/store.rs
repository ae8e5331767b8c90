use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

use crate::{Course, Document, DocumentStore, Result, StoreError, COURSES_COLLECTION};

/// What to do with documents that don't look like a [`Course`] when listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Malformed {
    /// Leave them out of the listing
    #[default]
    Skip,

    /// Fail the whole listing
    Fail,
}

/// What to do when deleting a course that isn't there
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingDelete {
    /// Treat it as deleted
    #[default]
    Ignore,

    /// Report [`StoreError::NotFound`]
    Fail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorePolicy {
    pub malformed: Malformed,
    pub missing_delete: MissingDelete,
}

/// The only way courses get in and out of the document store.
/// Holds nothing but a handle to the store, so it's cheap to clone and share.
#[derive(Clone)]
pub struct CourseStore {
    docs: Arc<dyn DocumentStore>,
    collection: String,
    policy: StorePolicy,
}

impl CourseStore {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs,
            collection: COURSES_COLLECTION.to_string(),
            policy: StorePolicy::default(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_policy(mut self, policy: StorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Every course in the collection, in the order the store gave them to us.
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        let docs = self.docs.get(&self.collection).await?;
        let total = docs.len();

        let mut courses = Vec::with_capacity(total);
        for doc in docs {
            match course_from_document(doc) {
                Ok(c) => courses.push(c),
                Err(e) if self.policy.malformed == Malformed::Skip => {
                    warn!("skipping document: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        debug!("listed {}/{} courses", courses.len(), total);
        Ok(courses)
    }

    /// Write `course` at the key `course.id`, replacing whatever was there.
    pub async fn create_course(&self, course: &Course) -> Result<()> {
        if course.id.is_empty() {
            return Err(StoreError::MissingId);
        }
        let Value::Object(body) = serde_json::to_value(course)? else {
            return Err(StoreError::Other(
                "course did not serialise to an object".to_string(),
            ));
        };

        self.docs.set(&self.collection, &course.id, body).await
    }

    /// Overwrite an existing course. The same write as [`Self::create_course`].
    pub async fn update_course(&self, course: &Course) -> Result<()> {
        self.create_course(course).await
    }

    pub async fn delete_course(&self, id: &str) -> Result<()> {
        match self.docs.delete(&self.collection, id).await {
            Err(StoreError::NotFound { .. })
                if self.policy.missing_delete == MissingDelete::Ignore =>
            {
                debug!("{} was already gone", id);
                Ok(())
            }
            x => x,
        }
    }
}

/// Map a document to a course, using its storage key as the id no matter what the body says.
fn course_from_document(doc: Document) -> Result<Course> {
    let Document { key, body } = doc;
    let mut course: Course =
        serde_json::from_value(Value::Object(body)).map_err(|e| StoreError::Malformed {
            key: key.clone(),
            reason: e.to_string(),
        })?;
    course.id = key;

    Ok(course)
}
