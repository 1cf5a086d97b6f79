//! Device selector with the alert / no-device banner underneath.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::surface::Surface;
use crate::ui::theme::{ALERT_BG, ALERT_FG, MUTED};
use crate::ui::util::truncate_middle;

pub fn draw_gpu(f: &mut ratatui::Frame<'_>, area: Rect, s: &Surface) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Device (←/→ or 0-9 to switch)");
    f.render_widget(block, area);

    // Guard: need some space inside the block
    if area.height <= 2 || area.width <= 2 {
        return;
    }
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    // Row 1: device list, selected one highlighted
    let per = (inner.width as usize / s.devices.len().max(1)).max(8);
    let spans: Vec<Span> = if s.devices.is_empty() {
        vec![Span::styled("waiting for devices…", Style::default().fg(MUTED))]
    } else {
        s.devices
            .iter()
            .map(|d| {
                let label = format!(" {} ", truncate_middle(&d.label(), per.saturating_sub(2)));
                if d.index as i64 == s.selected {
                    Span::styled(label, Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
                } else {
                    Span::raw(label)
                }
            })
            .collect()
    };
    f.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    if rows[1].height == 0 {
        return;
    }

    // Row 2: no-device notice wins over the alert banner
    if s.no_device {
        f.render_widget(
            Paragraph::new("No GPU detected on this system.").style(Style::default().fg(MUTED)),
            rows[1],
        );
    } else if let Some(alert) = &s.alert {
        f.render_widget(
            Paragraph::new(alert.as_str()).style(Style::default().fg(ALERT_FG).bg(ALERT_BG)),
            rows[1],
        );
    }
}
