//! Fretboard grid rendering.
//!
//! Displays the five fret lanes with time on the vertical axis: upcoming
//! ticks above the recording line, already-recorded ticks below it, so
//! notes fall toward the line as the timer advances. Each grid row covers
//! `zoom` ticks.

use crate::app::{App, LANE_NOTE_HALF, LANE_SPACING};
use crate::song::{FRET_COUNT, TICK_MAX};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Lane colors in fret order (the usual five-lane game palette).
const LANE_COLORS: [Color; 5] = [
    Color::Green,
    Color::Red,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
];

/// Returns the display color for a fret lane (1-5).
fn lane_color(fret: u8) -> Color {
    LANE_COLORS[(fret as usize - 1).min(LANE_COLORS.len() - 1)]
}

/// Renders the fretboard grid.
pub fn render_fretboard(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Fretboard - {} ", app.song_display_name());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.timer.is_running() {
            Color::Red
        } else {
            Color::Gray
        }));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < (FRET_COUNT as u16 + 1) * LANE_SPACING || inner.height < 5 {
        return; // Too small to render
    }

    let grid = app.layout.grid;
    let recorder_row = app.layout.recorder_row;
    let current = app.display_tick as i64;

    for row in 0..grid.height {
        let y = grid.y + row;
        // Ticks covered by this row; rows above the recording line are in
        // the future, rows below are the recorded past
        let base_tick = current + (recorder_row as i64 - y as i64) * app.zoom as i64;
        let row_ticks = base_tick..base_tick + app.zoom as i64;
        let on_recorder_line = y == recorder_row;

        let mut spans: Vec<Span> = Vec::with_capacity(grid.width as usize);
        for col in 0..grid.width {
            // Which lane's note width does this column fall into?
            let lane = (1..=FRET_COUNT).find(|&fret| {
                let center = (fret as u16 * LANE_SPACING) as i32;
                (col as i32 - center).abs() <= LANE_NOTE_HALF as i32
            });
            let on_lane_center = lane
                .is_some_and(|fret| col == fret as u16 * LANE_SPACING);

            // A lane cell is filled if any tick of this row carries its fret
            let note_fret = lane.filter(|&fret| {
                row_ticks
                    .clone()
                    .any(|t| (0..TICK_MAX as i64).contains(&t) && app.document().fret_at(t as u32) == fret)
            });

            let (ch, style) = if let Some(fret) = note_fret {
                ('█', Style::default().fg(lane_color(fret)))
            } else if on_recorder_line {
                ('─', Style::default().fg(Color::White))
            } else if on_lane_center && row_ticks.clone().any(|t| (0..TICK_MAX as i64).contains(&t))
            {
                // Lane guide, only inside the song timeline
                ('│', Style::default().fg(Color::DarkGray))
            } else {
                (' ', Style::default())
            };

            spans.push(Span::styled(ch.to_string(), style));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(grid.x, y, grid.width, 1),
        );
    }

    // Show the held fret number just above the recording line on its lane
    if let Some(fret) = app.held_fret().filter(|&f| f != 0) {
        let x = grid.x + fret as u16 * LANE_SPACING;
        let y = recorder_row.saturating_sub(2);
        if y > grid.y {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    fret.to_string(),
                    Style::default()
                        .fg(lane_color(fret))
                        .add_modifier(Modifier::BOLD),
                )),
                Rect::new(x, y, 1, 1),
            );
        }
    }
}
