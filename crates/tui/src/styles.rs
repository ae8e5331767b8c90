use coursebook_client::controller::{Notice, NoticeKind};
use ratatui::{
    prelude::Text,
    style::{Color, Modifier, Style},
};

pub fn error_text(t: impl Into<Text<'static>>) -> Text<'static> {
    let mut t = t.into();
    t.patch_style(Style::default().fg(Color::Red));
    t
}

pub fn notice_text(n: &Notice) -> Text<'static> {
    match n.kind {
        NoticeKind::Info => {
            let mut t = Text::raw(n.message.clone());
            t.patch_style(Style::default().fg(Color::Green));
            t
        }
        NoticeKind::Error => error_text(n.message.clone()),
    }
}

/// Whatever has keyboard focus
pub fn focused() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn heading() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}
