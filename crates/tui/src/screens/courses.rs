use coursebook_client::Course;
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, error};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    text::{Line, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{Action, ActivePage, EntryPage, Page};
use crate::{store::Store, styles, widgets::StatefulList};

/// The list of courses, with delete and edit
#[derive(Default)]
pub struct CoursesPage {
    list: StatefulList,
}

impl CoursesPage {
    fn selected<'a>(&self, store: &'a Store) -> Option<&'a Course> {
        self.list.selected().and_then(|i| store.course(i))
    }

    fn open_image(course: &Course) -> Action {
        let Some(url) = course.image_url() else {
            return Action::Flash(Text::raw("No image for this course"));
        };

        debug!("opening {}", url);
        match open::that(url) {
            Ok(()) => Action::None,
            Err(e) => {
                error!("error opening {}: {}", url, e);
                Action::Flash(styles::error_text(format!("Couldn't open {}: {}", url, e)))
            }
        }
    }
}

fn course_item(course: &Course) -> ListItem<'static> {
    let mut description = vec![course.description.clone().into()];
    if course.image_url().is_some() {
        description.push(" [image]".blue());
    }

    ListItem::new(Text::from(vec![
        Line::styled(course.name.clone(), styles::heading()),
        Line::raw(course.duration.clone()),
        Line::from(description),
        Line::raw(""),
    ]))
}

impl Page for CoursesPage {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(1), Constraint::Min(0)],
        )
        .split(area);

        let state = store.list_state();
        let status = if state.is_loading {
            Text::raw("Loading...")
        } else if let Some(e) = &state.error {
            styles::error_text(e.clone())
        } else {
            Text::from(format!(
                "{} courses. Enter to edit, d to delete, r to reload, b to open image, a to add.",
                state.courses.len()
            ))
        };
        frame.render_widget(Paragraph::new(status), layout[0]);

        let items: Vec<_> = state.courses.iter().map(course_item).collect();
        self.list.render_to(
            frame,
            layout[1],
            List::new(items)
                .block(Block::default().borders(Borders::ALL))
                .highlight_style(styles::focused())
                .highlight_symbol(">>"),
        );
    }

    fn handle_key(&mut self, store: &Store, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                return Action::Show(ActivePage::Entry(EntryPage::default()));
            }
            KeyCode::Char('a') => {
                return Action::Show(ActivePage::Entry(EntryPage::default()));
            }
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Char('r') => store.request_reload(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(course) = self.selected(store) {
                    store.request_remove(course.id.clone());
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(course) = self.selected(store) {
                    return Action::Show(ActivePage::Entry(EntryPage::edit(course)));
                }
            }
            KeyCode::Char('b') => {
                if let Some(course) = self.selected(store) {
                    return Self::open_image(course);
                }
            }
            _ => (),
        };

        Action::None
    }
}
