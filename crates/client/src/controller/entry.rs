use std::sync::Arc;

use log::debug;
use thiserror::Error;
use tokio::{
    runtime::Handle,
    sync::{broadcast, oneshot, watch},
};

use super::{Notice, NOTICE_CAPACITY};
use crate::{Course, CourseDraft, CourseStore, MissingField, Result, StoreError};

/// State of the course entry form, minus the fields themselves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryState {
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    /// Nothing was sent to the store
    #[error(transparent)]
    Invalid(#[from] MissingField),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates courses from user input, and saves edits to existing ones.
///
/// The form fields stay with the caller: clear them when [`Self::submit`] returns `Ok`.
pub struct CourseEntry {
    inner: Arc<Inner>,
}

struct Inner {
    store: CourseStore,
    state: watch::Sender<EntryState>,
    notices: broadcast::Sender<Notice>,
}

#[derive(Debug, Clone, Copy)]
enum Write {
    Create,
    Update,
}

impl CourseEntry {
    pub fn new(store: CourseStore) -> Self {
        let (state, _) = watch::channel(EntryState::default());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                store,
                state,
                notices,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<EntryState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> EntryState {
        self.inner.state.borrow().clone()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    /// Validate the draft, give it a fresh id and write it to the store.
    /// Returns the course as written.
    pub async fn submit(&self, draft: CourseDraft) -> Result<Course, SubmitError> {
        let course = self.inner.begin(draft, None)?;
        let result = self.inner.store.create_course(&course).await;
        self.inner.finish(Write::Create, course, result)
    }

    /// Overwrite the course at `id` with the draft.
    /// An empty `id` is treated as a new course.
    pub async fn save(&self, id: String, draft: CourseDraft) -> Result<Course, SubmitError> {
        let course = self.inner.begin(draft, Some(id))?;
        let result = self.inner.store.update_course(&course).await;
        self.inner.finish(Write::Update, course, result)
    }

    /// Start a submit on the given runtime.
    /// The result is sent back unless this controller is dropped first, in which case the
    /// receiver sees the channel close.
    pub fn spawn_submit(
        &self,
        rt: &Handle,
        draft: CourseDraft,
    ) -> oneshot::Receiver<Result<Course, SubmitError>> {
        self.spawn_write(rt, Write::Create, draft, None)
    }

    pub fn spawn_save(
        &self,
        rt: &Handle,
        id: String,
        draft: CourseDraft,
    ) -> oneshot::Receiver<Result<Course, SubmitError>> {
        self.spawn_write(rt, Write::Update, draft, Some(id))
    }

    fn spawn_write(
        &self,
        rt: &Handle,
        kind: Write,
        draft: CourseDraft,
        id: Option<String>,
    ) -> oneshot::Receiver<Result<Course, SubmitError>> {
        let (send, recv) = oneshot::channel();
        let course = match self.inner.begin(draft, id) {
            Ok(c) => c,
            Err(e) => {
                let _ = send.send(Err(e));
                return recv;
            }
        };

        let store = self.inner.store.clone();
        let inner = Arc::downgrade(&self.inner);
        rt.spawn(async move {
            let result = match kind {
                Write::Create => store.create_course(&course).await,
                Write::Update => store.update_course(&course).await,
            };
            let Some(inner) = inner.upgrade() else {
                debug!("course entry went away, discarding result");
                return;
            };

            let _ = send.send(inner.finish(kind, course, result));
        });

        recv
    }
}

impl Inner {
    /// Check the draft and go into the loading state. Nothing changes if the draft is invalid.
    fn begin(&self, draft: CourseDraft, id: Option<String>) -> Result<Course, SubmitError> {
        if let Err(field) = draft.validate() {
            debug!("rejecting draft: {}", field);
            let _ = self.notices.send(Notice::error(field.to_string()));
            return Err(field.into());
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let id = id.filter(|id| !id.is_empty()).unwrap_or_else(Course::new_id);
        Ok(draft.into_course(id))
    }

    fn finish(
        &self,
        kind: Write,
        course: Course,
        result: Result<()>,
    ) -> Result<Course, SubmitError> {
        match result {
            Ok(()) => {
                debug!("wrote course {}", course.id);
                self.state.send_modify(|s| s.is_loading = false);
                let _ = self.notices.send(Notice::info(match kind {
                    Write::Create => "Course added successfully",
                    Write::Update => "Course updated successfully",
                }));

                Ok(course)
            }
            Err(e) => {
                debug!("error writing course {}: {}", course.id, e);
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                let _ = self.notices.send(Notice::error(match kind {
                    Write::Create => format!("Failed to add course: {}", e),
                    Write::Update => format!("Failed to update course: {}", e),
                }));

                Err(e.into())
            }
        }
    }
}
