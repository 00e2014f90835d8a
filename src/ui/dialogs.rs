//! Dialog overlays for song info, save, load, and overwrite confirmation.

use crate::app::App;
use crate::song::FILE_EXT;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;
use std::path::Path;

use super::centered_rect;

/// Truncates a path string to fit within max_width, adding "..." prefix if needed.
#[inline]
fn truncate_path(path_str: &str, max_width: usize) -> String {
    if path_str.len() > max_width {
        format!(
            "...{}",
            &path_str[path_str.len().saturating_sub(max_width - 3)..]
        )
    } else {
        path_str.to_string()
    }
}

/// Extracts the display name from a path, returning "?" if extraction fails.
#[inline]
fn path_display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("?")
        .to_string()
}

/// Renders one labelled input line of the info dialog.
fn info_field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ];
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::RAPID_BLINK),
        ));
    }
    Line::from(spans)
}

/// Renders the song-info dialog overlay.
pub fn render_info_dialog(frame: &mut Frame, app: &App) {
    if !app.info_dialog.open {
        return;
    }

    let area = centered_rect(50, 45, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Song Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Artist
            Constraint::Length(1), // Album
            Constraint::Length(1), // Score
            Constraint::Length(1), // Delay
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Note count
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Instructions
        ])
        .split(inner);

    let dialog = &app.info_dialog;
    let fields = [
        ("Title", dialog.title.as_str()),
        ("Artist", dialog.artist.as_str()),
        ("Album", dialog.album.as_str()),
        ("Score", dialog.score.as_str()),
        ("Delay s", dialog.delay.as_str()),
    ];
    for (idx, (label, value)) in fields.iter().enumerate() {
        frame.render_widget(
            Paragraph::new(info_field_line(label, value, dialog.focus == idx)),
            chunks[idx],
        );
    }

    // Note count is derived, not editable
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Notes   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", dialog.note_count),
                Style::default().fg(Color::White),
            ),
        ])),
        chunks[6],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
            Span::styled(" Next field  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Ctrl+R]", Style::default().fg(Color::Yellow)),
            Span::styled(" Clear score  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::styled(" OK  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" Cancel", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[8],
    );
}

/// Renders the save dialog overlay.
pub fn render_save_dialog(frame: &mut Frame, app: &App) {
    if !app.save_dialog.open {
        return;
    }

    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Save Song ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Label
            Constraint::Length(1), // Filename input
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Instructions
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled("Filename:", Style::default().fg(Color::White))),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                &app.save_dialog.filename,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "_",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::RAPID_BLINK),
            ),
            Span::styled(
                format!(".{FILE_EXT}"),
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::styled(" Save  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" Cancel", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[3],
    );
}

/// Renders the file browser dialog overlay.
pub fn render_file_browser(frame: &mut Frame, app: &App) {
    if !app.file_browser.open {
        return;
    }

    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Open Song ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Current path
            Constraint::Length(1), // Separator
            Constraint::Min(5),    // File list
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

    // Current directory
    let path_str = app.file_browser.current_dir.display().to_string();
    let max_width = chunks[0].width.saturating_sub(2) as usize;
    let display_path = truncate_path(&path_str, max_width);

    frame.render_widget(
        Paragraph::new(Span::styled(display_path, Style::default().fg(Color::Cyan))),
        chunks[0],
    );

    // File list
    let visible_height = chunks[2].height as usize;
    let start_idx = app.file_browser.scroll;
    let end_idx = (start_idx + visible_height).min(app.file_browser.entries.len());

    let items: Vec<ListItem> = app.file_browser.entries[start_idx..end_idx]
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let idx = start_idx + i;
            let is_selected = idx == app.file_browser.selected;

            let (icon, name, style) = if path == &std::path::PathBuf::from("..") {
                (
                    "[..]",
                    "Parent Directory".to_string(),
                    Style::default().fg(Color::Blue),
                )
            } else if path.is_dir() {
                (
                    "[D]",
                    path_display_name(path),
                    Style::default().fg(Color::Blue),
                )
            } else {
                (
                    "[G]",
                    path_display_name(path),
                    Style::default().fg(Color::Green),
                )
            };

            let display_style = if is_selected {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", icon), Style::default().fg(Color::DarkGray)),
                Span::styled(name, display_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), chunks[2]);

    // Instructions
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Up/Down]", Style::default().fg(Color::Yellow)),
            Span::styled(" Navigate  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::styled(" Open  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" Cancel", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[3],
    );
}

/// Renders the overwrite confirmation dialog overlay.
pub fn render_confirm_dialog(frame: &mut Frame, app: &App) {
    if !app.confirm_dialog.open {
        return;
    }

    let area = centered_rect(45, 25, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Replace Song ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Warning message
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Instructions
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Replace existing song?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Unsaved changes will be lost.",
                Style::default().fg(Color::Red),
            )),
        ]),
        chunks[1],
    );

    let yes_style = if app.confirm_dialog.selected == 0 {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let no_style = if app.confirm_dialog.selected == 1 {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("       ", Style::default()),
            Span::styled(" Yes ", yes_style),
            Span::styled("     ", Style::default()),
            Span::styled(" No ", no_style),
        ])),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Left/Right]", Style::default().fg(Color::Yellow)),
            Span::styled(" Select  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::styled(" Confirm  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" Cancel", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[5],
    );
}
