//! Top header: status indicator, last update time, collector state.

use crate::surface::Surface;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, s: &Surface) {
    let updated = s
        .last_update
        .as_deref()
        .map(|t| format!(" | updated {t}"))
        .unwrap_or_default();
    let collector = match s.ended {
        None => String::new(),
        Some(Some(code)) => format!(" | collector exited ({code})"),
        Some(None) => " | collector exited".into(),
    };
    let title = format!(
        "gpumon — {}{}{}  (press 'q' to quit)",
        s.status, updated, collector
    );
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
