//! State controllers: each owns a small piece of observable state, drives the store calls that
//! change it, and publishes every change through a [`tokio::sync::watch`] channel.
//!
//! Short-lived messages meant for the user ("Course deleted", ...) go out separately as
//! [`Notice`]s on a broadcast channel, since they aren't part of the state.
pub mod entry;
pub mod list;

pub use entry::{CourseEntry, EntryState, SubmitError};
pub use list::{CourseList, ListState};

/// How many notices a slow subscriber can fall behind by before it starts missing them
const NOTICE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}
