use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::styles;

/// A single-line text field. Editing only ever happens at the end.
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    value: String,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Apply an editing key. Anything else is ignored.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
            }
            KeyCode::Backspace => {
                self.value.pop();
            }
            _ => (),
        };
    }

    pub fn render_to(&self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let mut block = Block::default().title(label.to_string()).borders(Borders::ALL);
        let text = if focused {
            block = block.border_style(styles::focused());
            format!("{}_", self.value)
        } else {
            self.value.clone()
        };

        frame.render_widget(Paragraph::new(text).block(block), area);
    }
}
