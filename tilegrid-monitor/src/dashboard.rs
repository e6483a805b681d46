//! Terminal dashboard for the grid monitor

use crate::metrics::{LogLevel, Metrics, MonitorStatus};
use crate::simulator::{self, MonitorEvent, SimConfig};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parking_lot::RwLock;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::error::Error;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tilegrid_core::{SlotView, MAX_REMOTE_VIDEOS};
use tokio::sync::mpsc;

/// Sinks per row in the slot panel
const SLOT_COLUMNS: usize = 4;

/// Run the dashboard
pub async fn run(metrics: Arc<RwLock<Metrics>>, config: SimConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Raw mode on the alternate screen until quit
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<MonitorEvent>();

    let metrics_for_sim = Arc::clone(&metrics);
    tokio::spawn(async move {
        if let Err(e) = simulator::run_with_dashboard(metrics_for_sim.clone(), event_tx, config).await {
            metrics_for_sim.write().log(LogLevel::Error, format!("Simulation error: {}", e));
        }
    });

    let refresh = Duration::from_millis(100);
    let mut should_quit = false;

    while !should_quit {
        while let Ok(event) = event_rx.try_recv() {
            if let MonitorEvent::Ready { attendees } = event {
                metrics
                    .write()
                    .log(LogLevel::Info, format!("Meeting ready with {} attendees", attendees));
            }
        }

        terminal.draw(|f| draw(f, &metrics))?;

        if event::poll(refresh)? {
            if let Event::Key(key) = event::read()? {
                should_quit = is_quit_key(key);
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// `q`, `Esc` or Ctrl-C stop the monitor
fn is_quit_key(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Columns and rows the conferencing layout would use for `size` visible tiles
pub fn layout_for(size: usize) -> (usize, usize) {
    if size == 0 {
        return (0, 0);
    }
    let mut columns = 1;
    while columns * columns < size {
        columns += 1;
    }
    (columns, size.div_ceil(columns))
}

/// Draw the dashboard
fn draw(f: &mut Frame, metrics: &Arc<RwLock<Metrics>>) {
    let m = metrics.read();

    let rows = MAX_REMOTE_VIDEOS.div_ceil(SLOT_COLUMNS) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(rows * 4 + 2), // Slots
            Constraint::Length(5),            // Stats
            Constraint::Min(6),               // Logs
            Constraint::Length(1),            // Footer
        ])
        .split(f.area());

    draw_header(f, chunks[0], &m);
    draw_slots(f, chunks[1], &m);
    draw_stats(f, chunks[2], &m);
    draw_logs(f, chunks[3], &m);
    draw_footer(f, chunks[4], &m);
}

fn draw_header(f: &mut Frame, area: Rect, m: &Metrics) {
    let (status_text, status_style) = match m.status {
        MonitorStatus::Starting => ("STARTING", Style::default().fg(Color::Yellow)),
        MonitorStatus::Running => ("RUNNING", Style::default().fg(Color::Green)),
        MonitorStatus::Finished => ("FINISHED", Style::default().fg(Color::Cyan)),
    };

    let visible = m.visible_count();
    let (columns, rows) = layout_for(visible);

    let title = vec![Line::from(vec![
        Span::styled("Remote Video Grid", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  │  Status: "),
        Span::styled(status_text, status_style),
        Span::raw("  │  Visible: "),
        Span::styled(
            format!("{}/{}", visible, MAX_REMOTE_VIDEOS),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  │  Layout: "),
        Span::styled(format!("{}x{}", columns, rows), Style::default().fg(Color::Magenta)),
        Span::raw("  │  Uptime: "),
        Span::styled(m.uptime(), Style::default().fg(Color::Cyan)),
    ])];

    let header = Paragraph::new(title).block(Block::default().borders(Borders::ALL).title(" Monitor "));
    f.render_widget(header, area);
}

fn draw_slots(f: &mut Frame, area: Rect, m: &Metrics) {
    let block = Block::default().borders(Borders::ALL).title(" Video Sinks ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(snapshot) = m.snapshot.as_ref() else {
        return;
    };

    let row_count = snapshot.slots.len().div_ceil(SLOT_COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
        .split(inner);

    for (row, chunk) in snapshot.slots.chunks(SLOT_COLUMNS).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, SLOT_COLUMNS as u32); SLOT_COLUMNS])
            .split(row_areas[row]);

        for (view, cell) in chunk.iter().zip(cells.iter()) {
            f.render_widget(slot_cell(view), *cell);
        }
    }
}

fn slot_cell(view: &SlotView) -> Paragraph<'static> {
    let title = format!(" {} ", view.slot);

    let lines = match (&view.attendee_id, view.tile_id) {
        (Some(attendee), Some(tile_id)) => vec![
            Line::from(Span::styled(
                view.attendee_name.clone().unwrap_or_else(|| attendee.clone()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("tile {}", tile_id),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        _ => vec![Line::from(Span::styled("empty", Style::default().fg(Color::DarkGray)))],
    };

    let border_style = if view.is_visible() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    )
}

fn draw_stats(f: &mut Frame, area: Rect, m: &Metrics) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let events_info = vec![
        Line::from(vec![
            Span::raw("Dispatched: "),
            Span::styled(m.events_dispatched.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::raw("Filtered: "),
            Span::styled(m.filtered_updates.to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw("Seed: "),
            Span::styled(m.seed.to_string(), Style::default().fg(Color::Yellow)),
        ]),
    ];
    let events_block = Paragraph::new(events_info).block(Block::default().borders(Borders::ALL).title(" Events "));
    f.render_widget(events_block, chunks[0]);

    let slot_info = vec![
        Line::from(vec![
            Span::raw("Binds / Releases: "),
            Span::styled(
                format!("{} / {}", m.binds, m.releases),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::raw("Rejected (full): "),
            Span::styled(
                m.rejected_tiles.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Peak visible: "),
            Span::styled(m.peak_visible.to_string(), Style::default().fg(Color::Magenta)),
        ]),
    ];
    let slot_block = Paragraph::new(slot_info).block(Block::default().borders(Borders::ALL).title(" Slots "));
    f.render_widget(slot_block, chunks[1]);
}

/// Newest entries first, as many as fit
fn draw_logs(f: &mut Frame, area: Rect, m: &Metrics) {
    let rows = area.height.saturating_sub(2) as usize;

    let log_items: Vec<ListItem> = m
        .logs
        .iter()
        .rev()
        .take(rows)
        .map(|entry| {
            let level_style = match entry.level {
                LogLevel::Info => Style::default().fg(Color::Blue),
                LogLevel::Warning => Style::default().fg(Color::Yellow),
                LogLevel::Error => Style::default().fg(Color::Red),
                LogLevel::Bind => Style::default().fg(Color::Green),
                LogLevel::Release => Style::default().fg(Color::Magenta),
            };

            let time = entry.timestamp.format("%H:%M:%S").to_string();

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("[{}] ", entry.level.as_str()), level_style),
                Span::raw(&entry.message),
            ]))
        })
        .collect();

    let logs = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Tile Events ({}) ", m.logs.len())),
    );

    f.render_widget(logs, area);
}

fn draw_footer(f: &mut Frame, area: Rect, m: &Metrics) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" Q ", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw(" Quit  "),
        Span::styled(format!("seed {}", m.seed), Style::default().fg(Color::DarkGray)),
    ]));

    f.render_widget(footer, area);
}
