use coursebook_client::{Course, CourseDraft, MissingField};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use super::{Action, ActivePage, CoursesPage, Page};
use crate::{store::Store, styles, widgets::TextInput};

const LABELS: [&str; 3] = ["Course Name", "Course Duration", "Course Description"];

/// Focus positions after the three fields
const SUBMIT: usize = 3;
const OTHER: usize = 4;

/// Whether we're making a new course, or editing the one with the given id
#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum Mode {
    #[default]
    Create,
    Edit(String),
}

/// The course form, used both for adding courses and editing existing ones
#[derive(Default)]
pub struct EntryPage {
    mode: Mode,
    fields: [TextInput; 3],
    focus: usize,
}

impl EntryPage {
    /// A form pre-filled with an existing course
    pub fn edit(course: &Course) -> Self {
        let draft = course.to_draft();
        Self {
            mode: Mode::Edit(course.id.clone()),
            fields: [
                TextInput::new(draft.name),
                TextInput::new(draft.duration),
                TextInput::new(draft.description),
            ],
            focus: 0,
        }
    }

    fn draft(&self) -> CourseDraft {
        let [name, duration, description] = &self.fields;
        CourseDraft::new(name.value(), duration.value(), description.value())
    }

    fn submit(&mut self, store: &Store) -> Action {
        if store.entry_state().is_loading {
            return Action::None;
        }

        let draft = self.draft();
        if let Err(field) = draft.validate() {
            self.focus = match field {
                MissingField::Name => 0,
                MissingField::Duration => 1,
                MissingField::Description => 2,
            };
            return Action::Flash(styles::error_text(field.to_string()));
        }

        match &self.mode {
            Mode::Create => store.request_submit(draft),
            Mode::Edit(id) => store.request_save(id.clone(), draft),
        };

        Action::None
    }

    /// Fields are only cleared once the store confirms the write, and only if they still hold
    /// what was written.
    pub(super) fn saved(&mut self, course: &Course) -> Action {
        match &self.mode {
            Mode::Create if self.draft() == course.to_draft() => {
                self.fields.iter_mut().for_each(TextInput::clear);
                self.focus = 0;
                Action::None
            }
            Mode::Edit(id) if *id == course.id => {
                Action::Show(ActivePage::Courses(CoursesPage::default()))
            }
            Mode::Create | Mode::Edit(_) => Action::None,
        }
    }

    fn leave(&self) -> Action {
        match self.mode {
            Mode::Create => Action::Exit,
            Mode::Edit(_) => Action::Show(ActivePage::Courses(CoursesPage::default())),
        }
    }

    fn button(label: &str, focused: bool) -> Paragraph<'static> {
        let style = if focused {
            styles::focused().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        Paragraph::new(format!("[ {} ]", label)).style(style)
    }
}

impl Page for EntryPage {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ],
        )
        .split(area);

        for (i, (field, label)) in self.fields.iter().zip(LABELS).enumerate() {
            field.render_to(frame, layout[i], label, self.focus == i);
        }

        let (submit, other) = match self.mode {
            Mode::Create => ("Add Course", "View Courses"),
            Mode::Edit(_) => ("Save Course", "Back"),
        };
        frame.render_widget(Self::button(submit, self.focus == SUBMIT), layout[4]);
        frame.render_widget(Self::button(other, self.focus == OTHER), layout[5]);

        let state = store.entry_state();
        let status = if state.is_loading {
            Paragraph::new("Saving...")
        } else if let Some(e) = &state.error {
            Paragraph::new(styles::error_text(e.clone()))
        } else {
            Paragraph::new("")
        };
        frame.render_widget(status, layout[7]);
    }

    fn handle_key(&mut self, store: &Store, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => return self.leave(),
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % (OTHER + 1),
            KeyCode::BackTab | KeyCode::Up => self.focus = (self.focus + OTHER) % (OTHER + 1),
            KeyCode::Enter => match self.focus {
                SUBMIT => return self.submit(store),
                OTHER => {
                    return match self.mode {
                        Mode::Create => Action::Show(ActivePage::Courses(CoursesPage::default())),
                        Mode::Edit(_) => self.leave(),
                    }
                }
                _ => self.focus += 1,
            },
            _ if self.focus < SUBMIT => {
                self.fields[self.focus].handle_key(key);
            }
            _ => (),
        };

        Action::None
    }
}
