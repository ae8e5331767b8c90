use coursebook_client::CourseStore;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout},
    text::Text,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::runtime::Handle;

use crate::{
    event::{Event, EventBus},
    screens::{Action, ActivePage},
    store::Store,
    styles,
};

/// Holds all application state
pub struct App {
    pub running: bool,
    store: Store,
    page: ActivePage,
    flash: Text<'static>,
}

impl App {
    pub fn new(events: &EventBus, rt: Handle, courses: CourseStore) -> Self {
        Self {
            running: true,
            store: Store::new(events, rt, courses),
            page: ActivePage::default(),
            flash: Text::raw(""),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ],
        )
        .split(frame.size());

        frame.render_widget(
            Paragraph::new("Courses")
                .style(styles::heading())
                .alignment(Alignment::Center),
            layout[0],
        );

        let content = Block::default().borders(Borders::ALL);
        let content_area = content.inner(layout[1]);
        frame.render_widget(content, layout[1]);
        self.page.draw(&self.store, frame, content_area);

        frame.render_widget(Paragraph::new(self.flash.clone()), layout[2]);
    }

    pub fn handle_event(&mut self, event: Event) {
        let action = match event {
            // C-C always exits
            Event::Key(KeyEvent {
                code: KeyCode::Char('c') | KeyCode::Char('C'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) => Action::Exit,
            Event::Key(key) => {
                self.flash = Text::raw("");
                self.page.handle_key(&self.store, key)
            }
            Event::Store(s) => self.store.event(s),
            Event::Mouse(_) | Event::Resize(_, _) => Action::None,
        };

        self.perform(action);
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::None => (),
            Action::Exit => self.quit(),
            Action::Show(page) => {
                if let ActivePage::Courses(_) = page {
                    self.store.request_reload();
                }
                self.page = page;
            }
            Action::Flash(t) => self.flash = t,
            Action::Saved(course) => {
                let next = self.page.saved(&course);
                self.perform(next);
            }
        }
    }
}
