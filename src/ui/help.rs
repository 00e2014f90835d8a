//! Help overlay rendering.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

/// One key/description row of the help overlay.
fn key_line<'a>(key: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("  {key:<12}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(description, Style::default().fg(Color::White)),
    ])
}

/// A dim section heading row.
fn section_line(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Renders the help overlay listing all key bindings.
pub fn render_help(frame: &mut Frame) {
    let area = centered_rect(55, 75, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        section_line("Recording"),
        key_line("1-5", "Record note (hold to lengthen)"),
        key_line("0", "Record erase stroke"),
        key_line("Space", "Start/stop the timer"),
        key_line("Enter", "Rewind to the beginning"),
        Line::from(""),
        section_line("When the timer is stopped"),
        key_line("Up/Down", "Scroll one tick"),
        key_line("PgUp/PgDn", "Scroll one screen"),
        key_line("Home/End", "Scroll to start/end"),
        key_line("Left drag", "Draw a note"),
        key_line("Right drag", "Erase a note (shift+left also works)"),
        Line::from(""),
        section_line("Song"),
        key_line("Ctrl+S", "Save song"),
        key_line("Ctrl+O", "Open song"),
        key_line("Ctrl+N", "New song"),
        key_line("i", "Edit song info"),
        Line::from(""),
        section_line("View"),
        key_line("+/-", "Zoom in/out"),
        key_line("?", "Toggle this help"),
        key_line("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
