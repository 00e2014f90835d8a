//! frettui - a terminal recorder for guitar-game song charts.
//!
//! Press the fret keys 1-5 in time with music to record note events; the
//! chart is saved as a .gcs song file for the game to play back. Notes
//! can also be drawn and erased with the mouse while the timer is
//! stopped.
//!
//! # Usage
//!
//! ```bash
//! cargo run                  # Start with an empty song
//! cargo run -- "Song 3.gcs"  # Open an existing song file
//! ```
//!
//! Press `?` for help with keyboard shortcuts.

mod app;
mod song;
mod timing;
mod ui;

use app::{App, ScrollCommand};
use song::TICK_INTERVAL_MS;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line options for the application.
struct CliOptions {
    /// Skip opening a song file even if one is given.
    new_song: bool,
    /// Path to a song file to open at startup.
    song_path: Option<PathBuf>,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - a positional path to a .gcs song file to open
    /// - `--new` or `-n`: start with an empty song
    /// - `--help` or `-h`: print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut new_song = false;
        let mut song_path: Option<PathBuf> = None;

        for arg in &args[1..] {
            match arg.as_str() {
                "--new" | "-n" => new_song = true,
                "--help" | "-h" => {
                    eprintln!("frettui - terminal guitar-chart recorder");
                    eprintln!();
                    eprintln!(
                        "Usage: {} [OPTIONS] [SONG.{}]",
                        args.first().map(String::as_str).unwrap_or("frettui"),
                        song::FILE_EXT
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -n, --new   Start with an empty song");
                    eprintln!("  -h, --help  Print this help message");
                    std::process::exit(0);
                }
                other => {
                    if other.ends_with(&format!(".{}", song::FILE_EXT)) {
                        song_path = Some(PathBuf::from(other));
                    } else {
                        eprintln!("Unknown option: {}", other);
                        eprintln!("Use --help for usage information");
                        std::process::exit(1);
                    }
                }
            }
        }

        Ok(Self { new_song, song_path })
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = CliOptions::parse()?;

    // Initialize logging (optional, for debugging)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut app = App::new();
    if !cli.new_song {
        if let Some(path) = &cli.song_path {
            app.open_path(path);
        }
    }

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    // Handle any errors from the main loop
    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main application loop.
///
/// The poll timeout doubles as the redraw tick: the held note is extended
/// and the screen repainted at least once per timing tick, whether or not
/// any events arrive.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();

        terminal.draw(|frame| {
            ui::render(frame, app);

            // Overlays, back to front
            if app.show_help {
                ui::render_help(frame);
            }
            ui::render_info_dialog(frame, app);
            ui::render_save_dialog(frame, app);
            ui::render_file_browser(frame, app);
            ui::render_confirm_dialog(frame, app);
        })?;

        if event::poll(Duration::from_millis(TICK_INTERVAL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key_event(app, key)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Routes a key event to the right handler: help and dialogs take
/// precedence over the main key map.
///
/// # Returns
///
/// `true` if the application should quit
fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.kind == KeyEventKind::Release {
        // Fret key releases end the note being recorded. Not every
        // terminal delivers release events; pressing another fret key or
        // stopping the timer also ends the note.
        if let KeyCode::Char(c @ '0'..='5') = key.code {
            app.handle_fret_key_release(c as u8 - b'0');
        }
        return Ok(false);
    }

    // Ignore auto-repeat except for the tick-scroll keys
    if key.kind == KeyEventKind::Repeat
        && !matches!(key.code, KeyCode::Up | KeyCode::Down)
    {
        return Ok(false);
    }

    // Help overlay swallows input until dismissed
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')
        ) {
            app.show_help = false;
        }
        return Ok(false);
    }

    // Info dialog input
    if app.info_dialog.open {
        match key.code {
            KeyCode::Enter => {
                app.info_dialog_confirm();
            }
            KeyCode::Esc => app.info_dialog_cancel(),
            KeyCode::Tab | KeyCode::Down => app.info_dialog_next_field(),
            KeyCode::BackTab | KeyCode::Up => app.info_dialog_prev_field(),
            KeyCode::Backspace => app.info_dialog_backspace(),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.info_dialog_clear_score();
            }
            KeyCode::Char(c) => app.info_dialog_input(c),
            _ => {}
        }
        return Ok(false);
    }

    // Save dialog input
    if app.save_dialog.open {
        match key.code {
            KeyCode::Enter => {
                app.save_dialog_confirm();
            }
            KeyCode::Esc => app.save_dialog_cancel(),
            KeyCode::Backspace => app.save_dialog_backspace(),
            KeyCode::Char(c) => {
                // Only accept characters that can appear in a file name
                if c.is_alphanumeric() || c == '_' || c == '-' || c == ' ' {
                    app.save_dialog_input(c);
                }
            }
            _ => {}
        }
        return Ok(false);
    }

    // File browser input
    if app.file_browser.open {
        match key.code {
            KeyCode::Enter => {
                app.file_browser_select();
            }
            KeyCode::Esc => app.file_browser_cancel(),
            KeyCode::Up | KeyCode::Char('k') => app.file_browser_up(),
            KeyCode::Down | KeyCode::Char('j') => app.file_browser_down(),
            _ => {}
        }
        return Ok(false);
    }

    // Overwrite confirmation input
    if app.confirm_dialog.open {
        match key.code {
            KeyCode::Enter => app.confirm_dialog_confirm(),
            KeyCode::Esc => app.confirm_dialog_cancel(),
            KeyCode::Left | KeyCode::Char('y') => app.confirm_dialog_left(),
            KeyCode::Right | KeyCode::Char('n') => app.confirm_dialog_right(),
            KeyCode::Tab => {
                if app.confirm_dialog.selected == 0 {
                    app.confirm_dialog_right();
                } else {
                    app.confirm_dialog_left();
                }
            }
            _ => {}
        }
        return Ok(false);
    }

    handle_key(app, key.code, key.modifiers)
}

/// Handles a key press in the main view.
///
/// # Returns
///
/// `true` if the application should quit
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        // Quit
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(true);
        }
        KeyCode::Char('q') => {
            return Ok(true);
        }

        // Recording: fret keys 1-5 and the erase key 0
        KeyCode::Char(c @ '0'..='5') => {
            app.handle_fret_key(c as u8 - b'0');
        }

        // Timer
        KeyCode::Char(' ') => app.toggle_timer(),
        KeyCode::Enter => app.reset_timer(),

        // Scrolling (stopped timer only; enforced by the handler)
        KeyCode::Up => app.handle_scroll(ScrollCommand::LineUp),
        KeyCode::Down => app.handle_scroll(ScrollCommand::LineDown),
        KeyCode::PageUp => app.handle_scroll(ScrollCommand::PageUp),
        KeyCode::PageDown => app.handle_scroll(ScrollCommand::PageDown),
        KeyCode::Home => app.handle_scroll(ScrollCommand::Home),
        KeyCode::End => app.handle_scroll(ScrollCommand::End),

        // Zoom
        KeyCode::Char('=') | KeyCode::Char('+') => app.zoom_in(),
        KeyCode::Char('-') => app.zoom_out(),

        // Song management
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_save();
        }
        KeyCode::Char('o') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_open_song();
        }
        KeyCode::Char('n') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_new_song();
        }
        KeyCode::Char('i') => app.open_info_dialog(),

        // Help
        KeyCode::Char('?') => {
            app.show_help = true;
        }

        _ => {}
    }

    Ok(false)
}

/// Handles mouse events: draw/erase strokes on the fretboard and wheel
/// scrolling.
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let shift_held = mouse.modifiers.contains(KeyModifiers::SHIFT);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            // Shift+left erases, like the right button
            app.handle_mouse_edit(mouse.column, mouse.row, shift_held);
        }
        MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Drag(MouseButton::Right) => {
            app.handle_mouse_edit(mouse.column, mouse.row, true);
        }
        MouseEventKind::ScrollUp => app.handle_scroll(ScrollCommand::WheelUp),
        MouseEventKind::ScrollDown => app.handle_scroll(ScrollCommand::WheelDown),
        _ => {}
    }
}
