use ratatui::{prelude::*, widgets::*};

/// A list that remembers what's selected between draws, wrapping around at either end.
#[derive(Default)]
pub struct StatefulList {
    state: ListState,
    last_item_count: usize,
}

impl StatefulList {
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn previous(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, by: isize) {
        if self.last_item_count == 0 {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => (i as isize + by).rem_euclid(self.last_item_count as isize) as usize,
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Keep the selection pointing at something that exists, eg. after the last item is deleted
    fn clamp(&mut self, len: usize) {
        self.last_item_count = len;
        let sel = match (self.state.selected(), len) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.state.select(sel);
    }

    pub fn render_to(&mut self, frame: &mut Frame, target: Rect, list: List) {
        self.clamp(list.len());
        frame.render_stateful_widget(list, target, &mut self.state);
    }
}
