//! Terminal user interface components.
//!
//! This module provides the visual components for the recorder: the
//! transport bar, the fretboard grid, the modal dialogs, and the help
//! overlay. Renderers are pure functions of application state.

mod dialogs;
mod fretboard;
mod help;
mod transport;

use crate::app::{App, LayoutRegions};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

pub use dialogs::{
    render_confirm_dialog, render_file_browser, render_info_dialog, render_save_dialog,
};
pub use fretboard::render_fretboard;
pub use help::render_help;
pub use transport::render_transport;

/// Calculates the layout regions for the given terminal size.
///
/// This is called during rendering to update the regions used for mouse
/// hit testing and scroll-page sizing. The recording line sits at 40% of
/// the grid height, leaving more room for the recorded past below it than
/// for the upcoming ticks above.
fn calculate_layout(size: Rect) -> LayoutRegions {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport/readouts
            Constraint::Min(10),   // Fretboard
        ])
        .split(size);

    let fretboard = main_chunks[1];
    let grid = Rect {
        x: fretboard.x + 1,
        y: fretboard.y + 1,
        width: fretboard.width.saturating_sub(2),
        height: fretboard.height.saturating_sub(2),
    };
    let recorder_row = grid.y + grid.height * 2 / 5;

    LayoutRegions {
        transport: main_chunks[0],
        fretboard,
        grid,
        recorder_row,
    }
}

/// Renders the complete UI layout and updates the layout regions.
///
/// The layout is divided into:
/// - Top: transport bar with timer state, tick/time readouts, and status
/// - Rest: the fretboard grid
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = calculate_layout(frame.area());
    app.update_layout(layout);

    render_transport(frame, layout.transport, app);
    render_fretboard(frame, layout.fretboard, app);
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
