//! Transport bar rendering.
//!
//! Displays the timer state, the current tick and song time, the note
//! count, the dirty marker, and transient status messages.

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the transport bar at the top of the screen.
pub fn render_transport(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Guitar Recorder ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Timer state
            Constraint::Length(14), // Tick
            Constraint::Length(10), // Time
            Constraint::Length(16), // Zoom and dirty marker
            Constraint::Min(20),    // Status / hint
        ])
        .split(inner);

    // Timer state
    let state = if app.timer.is_running() {
        Span::styled(
            " [o] REC ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " [.] STOP ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(state)), chunks[0]);

    // Current tick
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Tick ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", app.display_tick),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        chunks[1],
    );

    // Song time (start delay + elapsed ticks)
    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(
            format!("({})", app.clock_string()),
            Style::default().fg(Color::White),
        )])),
        chunks[2],
    );

    // Zoom factor and unsaved-edits marker
    let dirty = if app.document().is_dirty() { " *" } else { "" };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} t/row", app.zoom),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                dirty,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        chunks[3],
    );

    // Status message or key hint
    let status_line = if let Some((msg, _)) = &app.status_message {
        Line::from(Span::styled(
            msg.as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            "1-5 record  0 erase  Space start/stop  ? help",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(status_line), chunks[4]);
}
