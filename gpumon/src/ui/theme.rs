//! Shared UI theme constants.

use ratatui::style::Color;

use crate::surface::Chart;

pub const ALERT_FG: Color = Color::Rgb(255, 179, 179);
pub const ALERT_BG: Color = Color::Rgb(58, 28, 28);
pub const MUTED: Color = Color::Rgb(170, 170, 170);

pub fn chart_color(c: Chart) -> Color {
    match c {
        Chart::Gpu => Color::Green,
        Chart::Vram => Color::LightMagenta,
        Chart::Temp => Color::Red,
        Chart::Power => Color::Yellow,
        Chart::Cpu => Color::Cyan,
        Chart::Ram => Color::Magenta,
        Chart::Disk => Color::Blue,
    }
}
