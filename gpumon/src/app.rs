//! App state and main loop: input handling, draining panel events into the surface, and drawing.

use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;
use tracing::debug;

use crate::host::SurfaceEvent;
use crate::surface::{Chart, Surface};
use crate::types::UiMessage;
use crate::ui::{charts::draw_chart, disks::draw_disk_space, gpu::draw_gpu, header::draw_header};

pub struct App {
    surface: Surface,
    events: UnboundedReceiver<SurfaceEvent>,
    outbound: UnboundedSender<UiMessage>,

    // Quit flag
    should_quit: bool,
    tick: Duration,
}

impl App {
    pub fn new(events: UnboundedReceiver<SurfaceEvent>, outbound: UnboundedSender<UiMessage>) -> Self {
        Self {
            surface: Surface::new(),
            events,
            outbound,
            should_quit: false,
            tick: Duration::from_millis(100),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        self.handle_key(k.code);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            // Drain whatever the panel produced since the last frame, in order
            loop {
                match self.events.try_recv() {
                    Ok(ev) => self.surface.apply_event(ev),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => break,
                }
            }

            terminal.draw(|f| self.draw(f))?;
            sleep(self.tick).await;
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        let msg = match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => self.surface.select_next(),
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => self.surface.select_prev(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.surface.select(c.to_digit(10).map(i64::from).unwrap_or(0))
            }
            _ => None,
        };
        if let Some(m) = msg {
            debug!(?m, "selection changed");
            let _ = self.outbound.send(m);
        }
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let s = &self.surface;

        // Root rows: header, device + alert, 4 chart rows
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ])
            .split(area);

        draw_header(f, rows[0], s);
        draw_gpu(f, rows[1], s);

        // Charts two per row; the last slot holds the disk-space gauge
        let mut charts = Chart::ALL.iter();
        for row in &rows[2..] {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row);
            for col in cols.iter() {
                match charts.next() {
                    Some(&c) => draw_chart(f, *col, c, s.series(c)),
                    None => draw_disk_space(f, *col, s),
                }
            }
        }
    }
}
