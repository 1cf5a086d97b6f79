//! Disk space gauge.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};

use crate::surface::Surface;

pub fn draw_disk_space(f: &mut ratatui::Frame<'_>, area: Rect, s: &Surface) {
    let (used, total) = s.disk.unwrap_or((0.0, 0.0));
    let ratio = if total > 0.0 {
        (used / total).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let pct = (ratio * 100.0).round() as u16;
    let color = if pct < 70 {
        Color::Green
    } else if pct < 90 {
        Color::Yellow
    } else {
        Color::Red
    };
    let label = s.disk_space().unwrap_or_else(|| "Disk: --".into());

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Disk space"))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(label);
    f.render_widget(g, area);
}
