//! Rolling sparkline per tracked metric.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Sparkline},
};

use crate::history::Series;
use crate::surface::Chart;
use crate::ui::theme::chart_color;
use crate::ui::util::fmt_now;

pub fn draw_chart(f: &mut ratatui::Frame<'_>, area: Rect, chart: Chart, series: &Series) {
    let title = format!("{} (now: {})", chart.title(), fmt_now(series.last()));
    let max_points = area.width.saturating_sub(2) as usize;
    let data = series.tail_u64(max_points);

    let mut spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .style(Style::default().fg(chart_color(chart)));
    if let Some(max) = chart.ceiling() {
        spark = spark.max(max);
    }
    f.render_widget(spark, area);
}
