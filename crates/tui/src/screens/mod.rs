use coursebook_client::Course;
use crossterm::event::KeyEvent;
use ratatui::{prelude::Rect, text::Text, Frame};

use crate::store::Store;

mod courses;
mod entry;

pub use courses::CoursesPage;
pub use entry::EntryPage;

/// An action that a [`Page`] or the [`Store`] can request to be taken
pub enum Action {
    /// Do nothing
    None,

    /// Quit the application
    Exit,

    /// Switch to another page
    Show(ActivePage),

    /// Display the given text at the bottom of the screen
    Flash(Text<'static>),

    /// A course was written to the store
    Saved(Course),
}

/// The page currently taking up the screen
pub enum ActivePage {
    Entry(EntryPage),
    Courses(CoursesPage),
}

impl Default for ActivePage {
    fn default() -> Self {
        Self::Entry(Default::default())
    }
}

trait Page {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect);
    fn handle_key(&mut self, store: &Store, key: KeyEvent) -> Action;
}

impl ActivePage {
    pub fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        match self {
            ActivePage::Entry(p) => p.draw(store, frame, area),
            ActivePage::Courses(p) => p.draw(store, frame, area),
        }
    }

    pub fn handle_key(&mut self, store: &Store, key: KeyEvent) -> Action {
        match self {
            ActivePage::Entry(p) => p.handle_key(store, key),
            ActivePage::Courses(p) => p.handle_key(store, key),
        }
    }

    /// Tell the page a course was saved, since it's usually the one that asked
    pub fn saved(&mut self, course: &Course) -> Action {
        match self {
            ActivePage::Entry(p) => p.saved(course),
            ActivePage::Courses(_) => Action::None,
        }
    }
}
