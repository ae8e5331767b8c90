use coursebook_client::{
    controller::{CourseEntry, CourseList, EntryState, ListState, Notice, SubmitError},
    Course, CourseDraft, CourseStore,
};
use std::sync::mpsc::Sender;
use tokio::runtime::Handle;

mod bridge;

use crate::{
    event::{Event as CrateEvent, EventBus},
    screens::Action,
    styles,
};

/// Global data store.
/// Owns the controllers, and keeps a copy of their latest state for drawing.
pub struct Store {
    rt: Handle,
    events: Sender<CrateEvent>,

    list: CourseList,
    entry: CourseEntry,

    list_state: ListState,
    entry_state: EntryState,
}

/// Messages received by the app from tasks on the runtime
#[derive(Debug)]
pub enum Event {
    List(ListState),
    Entry(EntryState),
    Notice(Notice),
    Saved(Result<Course, SubmitError>),
}

impl Store {
    pub fn new(bus: &EventBus, rt: Handle, courses: CourseStore) -> Self {
        let list = CourseList::new(courses.clone());
        let entry = CourseEntry::new(courses);

        let events = bus.sender();
        bridge::forward_state(&events, &rt, list.subscribe(), Event::List);
        bridge::forward_state(&events, &rt, entry.subscribe(), Event::Entry);
        bridge::forward_notices(&events, &rt, list.notices());
        bridge::forward_notices(&events, &rt, entry.notices());

        Self {
            events,
            list_state: list.state(),
            entry_state: entry.state(),
            rt,
            list,
            entry,
        }
    }

    pub fn list_state(&self) -> &ListState {
        &self.list_state
    }

    pub fn entry_state(&self) -> &EntryState {
        &self.entry_state
    }

    pub fn course(&self, idx: usize) -> Option<&Course> {
        self.list_state.courses.get(idx)
    }

    pub fn request_reload(&self) {
        self.list.spawn_reload(&self.rt);
    }

    pub fn request_remove(&self, id: String) {
        self.list.spawn_remove(&self.rt, id);
    }

    /// Create a new course from the draft. The result arrives as [`Event::Saved`].
    pub fn request_submit(&self, draft: CourseDraft) {
        let recv = self.entry.spawn_submit(&self.rt, draft);
        bridge::forward_saved(&self.events, &self.rt, recv);
    }

    /// Overwrite the course at `id`. The result arrives as [`Event::Saved`].
    pub fn request_save(&self, id: String, draft: CourseDraft) {
        let recv = self.entry.spawn_save(&self.rt, id, draft);
        bridge::forward_saved(&self.events, &self.rt, recv);
    }

    pub fn event(&mut self, e: Event) -> Action {
        match e {
            Event::List(s) => self.list_state = s,
            Event::Entry(s) => self.entry_state = s,
            Event::Notice(n) => return Action::Flash(styles::notice_text(&n)),
            Event::Saved(Ok(course)) => return Action::Saved(course),
            // the notice has already told the user what went wrong
            Event::Saved(Err(_)) => (),
        };

        Action::None
    }
}
