use std::sync::{Arc, Weak};

use log::debug;
use tokio::{
    runtime::Handle,
    sync::{broadcast, watch},
    task::JoinHandle,
};

use super::{Notice, NOTICE_CAPACITY};
use crate::{Course, CourseStore, Result};

/// Everything the course list screen shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub courses: Vec<Course>,
    pub is_loading: bool,
    /// Message from the last failed load. Cleared by the next successful one.
    pub error: Option<String>,
}

/// Loads the list of courses, and deletes from it.
///
/// Overlapping reloads aren't coordinated: whichever finishes last decides the state.
pub struct CourseList {
    inner: Arc<Inner>,
}

struct Inner {
    store: CourseStore,
    state: watch::Sender<ListState>,
    notices: broadcast::Sender<Notice>,
}

impl CourseList {
    pub fn new(store: CourseStore) -> Self {
        let (state, _) = watch::channel(ListState::default());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                store,
                state,
                notices,
            }),
        }
    }

    /// Get notified of every state change
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.inner.state.subscribe()
    }

    /// A copy of the current state
    pub fn state(&self) -> ListState {
        self.inner.state.borrow().clone()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    /// Fetch the courses again.
    /// On failure, the error is recorded and the previous courses are left alone.
    pub async fn reload(&self) {
        self.inner.begin_reload();
        let result = self.inner.store.list_courses().await;
        self.inner.finish_reload(result);
    }

    /// Delete the course with the given id, then reload if that worked.
    /// Either way, the user gets a notice. The list's `error` is not touched.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let result = self.inner.store.delete_course(id).await;
        self.inner.notify_removed(id, &result);
        if result.is_ok() {
            self.reload().await;
        }

        result
    }

    /// Start a reload on the given runtime.
    /// If this controller is dropped before the store answers, the answer is thrown away.
    pub fn spawn_reload(&self, rt: &Handle) -> JoinHandle<()> {
        self.inner.begin_reload();
        let store = self.inner.store.clone();
        let inner = Arc::downgrade(&self.inner);

        rt.spawn(async move {
            let result = store.list_courses().await;
            if let Some(inner) = upgrade(&inner) {
                inner.finish_reload(result);
            }
        })
    }

    /// Start deleting a course on the given runtime, reloading afterwards if that worked.
    pub fn spawn_remove(&self, rt: &Handle, id: String) -> JoinHandle<()> {
        let store = self.inner.store.clone();
        let inner = Arc::downgrade(&self.inner);

        rt.spawn(async move {
            let result = store.delete_course(&id).await;
            let Some(strong) = upgrade(&inner) else {
                return;
            };
            strong.notify_removed(&id, &result);
            if result.is_err() {
                return;
            }

            strong.begin_reload();
            drop(strong);
            let result = store.list_courses().await;
            if let Some(inner) = upgrade(&inner) {
                inner.finish_reload(result);
            }
        })
    }
}

fn upgrade(inner: &Weak<Inner>) -> Option<Arc<Inner>> {
    let strong = inner.upgrade();
    if strong.is_none() {
        debug!("course list went away, discarding result");
    }

    strong
}

impl Inner {
    fn begin_reload(&self) {
        self.state.send_modify(|s| s.is_loading = true);
    }

    fn finish_reload(&self, result: Result<Vec<Course>>) {
        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(courses) => {
                    debug!("loaded {} courses", courses.len());
                    s.courses = courses;
                    s.error = None;
                }
                Err(e) => {
                    debug!("error loading courses: {}", e);
                    s.error = Some(e.to_string());
                }
            }
        });
    }

    fn notify_removed(&self, id: &str, result: &Result<()>) {
        let notice = match result {
            Ok(()) => Notice::info("Course deleted"),
            Err(e) => {
                debug!("error deleting {}: {}", id, e);
                Notice::error(format!("Failed to delete: {}", e))
            }
        };

        // nobody listening is fine
        let _ = self.notices.send(notice);
    }
}
