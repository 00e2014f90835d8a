//! Application state and event handling.
//!
//! This module defines the main application state that coordinates the
//! song document, the timer, the live recorder, and the TUI dialogs.

use crate::song::{
    self, file_index_of, read_song, song_file_stem, write_song, Recorder, SongDocument,
    FILE_EXT, NAME_MAX_CHARS,
};
use crate::timing::SongTimer;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long a status message stays on screen.
const STATUS_EXPIRY_SECS: u64 = 3;

/// Default zoom level (ticks per fretboard row).
pub const DEFAULT_ZOOM: u32 = 4;

/// Zoom bounds.
const ZOOM_MIN: u32 = 1;
const ZOOM_MAX: u32 = 64;

/// Horizontal spacing between fret lanes in the grid, in columns.
pub const LANE_SPACING: u16 = 6;

/// Half-width of a drawn note on each side of its lane center.
pub const LANE_NOTE_HALF: u16 = 1;

/// State for the song-info dialog.
///
/// Text is edited in string buffers and only committed to the header on
/// confirm; over-long fields are rejected at that point with the form
/// left open.
#[derive(Debug, Clone, Default)]
pub struct InfoDialogState {
    /// Whether the dialog is open.
    pub open: bool,
    /// Index of the focused field (0=title, 1=artist, 2=album, 3=score,
    /// 4=delay).
    pub focus: usize,
    /// Edit buffer for the song title.
    pub title: String,
    /// Edit buffer for the artist.
    pub artist: String,
    /// Edit buffer for the album.
    pub album: String,
    /// Edit buffer for the high score (digits only).
    pub score: String,
    /// Edit buffer for the start delay in seconds (digits only).
    pub delay: String,
    /// Note count at the time the dialog opened (display only).
    pub note_count: usize,
}

/// Number of editable fields in the info dialog.
pub const INFO_FIELD_COUNT: usize = 5;

/// State for the save dialog.
#[derive(Debug, Clone, Default)]
pub struct SaveDialogState {
    /// Whether the dialog is open.
    pub open: bool,
    /// The filename being edited (without extension).
    pub filename: String,
}

/// State for the file browser dialog.
#[derive(Debug, Clone)]
pub struct FileBrowserState {
    /// Whether the browser is open.
    pub open: bool,
    /// Current directory path.
    pub current_dir: PathBuf,
    /// List of entries in current directory.
    pub entries: Vec<PathBuf>,
    /// Currently selected index.
    pub selected: usize,
    /// Scroll offset for long lists.
    pub scroll: usize,
}

impl Default for FileBrowserState {
    fn default() -> Self {
        Self {
            open: false,
            current_dir: std::env::current_dir().unwrap_or_default(),
            entries: Vec::new(),
            selected: 0,
            scroll: 0,
        }
    }
}

/// The action waiting behind the overwrite-confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Start a fresh song.
    NewSong,
    /// Open the file browser.
    OpenSong,
}

/// State for the "replace existing song?" confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmDialogState {
    /// Whether the dialog is open.
    pub open: bool,
    /// Currently selected option (0 = Yes, 1 = No).
    pub selected: usize,
    /// What to do if the user confirms.
    pub pending: PendingAction,
}

impl Default for ConfirmDialogState {
    fn default() -> Self {
        Self {
            open: false,
            selected: 1,
            pending: PendingAction::NewSong,
        }
    }
}

/// Scrolling requests from keys or the mouse wheel.
/// Only honored while the timer is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    /// One tick earlier.
    LineUp,
    /// One tick later.
    LineDown,
    /// One fretboard row earlier (mouse wheel).
    WheelUp,
    /// One fretboard row later (mouse wheel).
    WheelDown,
    /// One screenful earlier.
    PageUp,
    /// One screenful later.
    PageDown,
    /// Jump to the beginning.
    Home,
    /// Jump to the end of the recording.
    End,
}

/// Layout regions for mouse hit testing.
/// Stores the screen coordinates of each UI panel, updated each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutRegions {
    /// The transport/readout bar at the top.
    pub transport: Rect,
    /// The fretboard panel (including borders).
    pub fretboard: Rect,
    /// The fretboard grid area (inside the borders).
    pub grid: Rect,
    /// Absolute screen row of the recording line.
    pub recorder_row: u16,
}

impl LayoutRegions {
    /// Checks if a point is within the fretboard grid area.
    pub fn is_in_grid(&self, x: u16, y: u16) -> bool {
        x >= self.grid.x
            && x < self.grid.x + self.grid.width
            && y >= self.grid.y
            && y < self.grid.y + self.grid.height
    }
}

/// Main application state.
pub struct App {
    /// The song being edited.
    document: SongDocument,
    /// The tick clock.
    pub timer: SongTimer,
    /// The live recording session.
    recorder: Recorder,
    /// Zoom level in ticks per fretboard row.
    pub zoom: u32,
    /// Current tick as of the last update pass, used by the renderers.
    pub display_tick: u32,
    /// Status message to display, with the time it was set.
    pub status_message: Option<(String, Instant)>,
    /// Layout regions for mouse hit testing (updated each frame).
    pub layout: LayoutRegions,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Song info dialog state.
    pub info_dialog: InfoDialogState,
    /// Save dialog state.
    pub save_dialog: SaveDialogState,
    /// File browser state for loading.
    pub file_browser: FileBrowserState,
    /// Overwrite confirmation dialog state.
    pub confirm_dialog: ConfirmDialogState,
    /// True when the info dialog was forced open by a save on an untitled
    /// song; confirming it continues into the save dialog.
    save_after_info: bool,
}

impl App {
    /// Creates the application with a fresh, empty song.
    pub fn new() -> Self {
        Self {
            document: SongDocument::new(),
            timer: SongTimer::new(),
            recorder: Recorder::new(),
            zoom: DEFAULT_ZOOM,
            display_tick: 0,
            status_message: None,
            layout: LayoutRegions::default(),
            show_help: false,
            info_dialog: InfoDialogState::default(),
            save_dialog: SaveDialogState::default(),
            file_browser: FileBrowserState::default(),
            confirm_dialog: ConfirmDialogState::default(),
            save_after_info: false,
        }
    }

    /// Returns a reference to the song document.
    pub fn document(&self) -> &SongDocument {
        &self.document
    }

    /// Returns the fret currently held by the recorder, if any.
    pub fn held_fret(&self) -> Option<u8> {
        self.recorder.held_fret()
    }

    /// Per-loop update: extends any held note and refreshes the display
    /// tick. This is the redraw tick - it must run every pass so a held
    /// note never develops gaps while key events are quiet.
    pub fn tick(&mut self) {
        self.recorder
            .extend_note(&mut self.document, &mut self.timer);
        self.display_tick = self.timer.current_tick(false);
        self.clear_expired_status();
    }

    /// Updates the layout regions. Called by the UI during rendering.
    pub fn update_layout(&mut self, layout: LayoutRegions) {
        self.layout = layout;
    }

    /// Sets a status message to display temporarily.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clears expired status messages.
    fn clear_expired_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() > Duration::from_secs(STATUS_EXPIRY_SECS) {
                self.status_message = None;
            }
        }
    }

    // ==================== Recording ====================

    /// Handles a fret key press: 1-5 record a note, 0 records an erase
    /// stroke. Starts the timer if it was not running yet.
    pub fn handle_fret_key(&mut self, fret: u8) {
        if fret <= song::FRET_COUNT {
            self.recorder
                .start_note(&mut self.document, &mut self.timer, fret);
        }
    }

    /// Handles a fret key release. Releases that don't match the held
    /// fret are ignored, so overlapping presses behave like the last key
    /// down winning.
    pub fn handle_fret_key_release(&mut self, fret: u8) {
        if self.recorder.held_fret() == Some(fret) {
            self.recorder.end_note(&mut self.document, &mut self.timer);
        }
    }

    /// Toggles the timer between running and stopped.
    pub fn toggle_timer(&mut self) {
        if self.timer.is_running() {
            self.timer.stop();
            self.set_status("Timer stopped");
        } else {
            self.timer.start();
            self.set_status("Timer running");
        }
    }

    /// Stops the timer and rewinds to the beginning.
    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.set_status("Rewound to start");
    }

    // ==================== Scrolling and zoom ====================

    /// Handles a scroll request. Scrolling repositions the stopped timer;
    /// it is rejected while the timer runs.
    pub fn handle_scroll(&mut self, command: ScrollCommand) {
        if self.timer.is_running() {
            return;
        }

        let page = self.layout.grid.height.max(1) as i64 * self.zoom as i64;
        let position = self.timer.current_tick(false) as i64;
        let target = match command {
            ScrollCommand::LineUp => position - 1,
            ScrollCommand::LineDown => position + 1,
            ScrollCommand::WheelUp => position - self.zoom as i64,
            ScrollCommand::WheelDown => position + self.zoom as i64,
            ScrollCommand::PageUp => position - page,
            ScrollCommand::PageDown => position + page,
            ScrollCommand::Home => 0,
            ScrollCommand::End => self.timer.max_tick() as i64,
        };

        self.timer.seek(target.max(0) as u32);
        self.display_tick = self.timer.current_tick(false);
    }

    /// Zooms in (fewer ticks per row).
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom / 2).max(ZOOM_MIN);
        self.set_status(format!("Zoom: {} ticks/row", self.zoom));
    }

    /// Zooms out (more ticks per row).
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom * 2).min(ZOOM_MAX);
        self.set_status(format!("Zoom: {} ticks/row", self.zoom));
    }

    // ==================== Mouse editing ====================

    /// Handles a mouse draw/erase stroke at screen coordinates.
    ///
    /// Editing is only allowed while the timer is stopped. The column
    /// must hit one of the five lanes; the row maps to a tick relative to
    /// the recording line. Returns true if a cell changed.
    pub fn handle_mouse_edit(&mut self, x: u16, y: u16, erase: bool) -> bool {
        if self.timer.is_running() || !self.layout.is_in_grid(x, y) {
            return false;
        }

        let Some(fret) = self.lane_at(x) else {
            return false;
        };

        let current = self.timer.current_tick(false) as i64;
        let tick = current + (self.layout.recorder_row as i64 - y as i64) * self.zoom as i64;
        self.document.edit_cell(tick, fret, erase)
    }

    /// Returns the fret lane at column `x`, if the column is within a
    /// note's width of a lane center.
    fn lane_at(&self, x: u16) -> Option<u8> {
        for fret in 1..=song::FRET_COUNT {
            let center = self.layout.grid.x as i32 + (fret as u16 * LANE_SPACING) as i32;
            if (x as i32 - center).abs() <= LANE_NOTE_HALF as i32 {
                return Some(fret);
            }
        }
        None
    }

    // ==================== New / open / save flows ====================

    /// Starts a new song, prompting first if the current one has unsaved
    /// edits.
    pub fn request_new_song(&mut self) {
        if self.document.is_dirty() {
            self.open_confirm_dialog(PendingAction::NewSong);
        } else {
            self.reset_document();
        }
    }

    /// Opens the file browser, prompting first if the current song has
    /// unsaved edits.
    pub fn request_open_song(&mut self) {
        if self.document.is_dirty() {
            self.open_confirm_dialog(PendingAction::OpenSong);
        } else {
            self.open_file_browser();
        }
    }

    /// Replaces the document with a fresh song and rewinds everything.
    fn reset_document(&mut self) {
        self.document = SongDocument::new();
        self.timer = SongTimer::new();
        self.recorder = Recorder::new();
        self.display_tick = 0;
        self.set_status("New song");
    }

    /// Starts the save flow: derive the note list, reject an empty song,
    /// collect song info if the title is still blank, then prompt for a
    /// file name.
    pub fn request_save(&mut self) {
        let outcome = self.document.rebuild_note_list();
        self.timer.set_max_tick(outcome.end_tick);
        if outcome.truncated {
            self.set_status(format!(
                "Note limit exceeded, song truncated at {} notes",
                song::MAX_NOTES
            ));
        }

        if self.document.note_count() == 0 {
            self.set_status("Song is empty - nothing to save");
            return;
        }

        if self.document.header.is_untitled() {
            self.save_after_info = true;
            self.open_info_dialog();
        } else {
            self.open_save_dialog();
        }
    }

    /// Loads the song at `path`, replacing the current document on
    /// success. On failure the editor is left with a fresh empty song,
    /// never a partially loaded one.
    pub fn open_path(&mut self, path: &std::path::Path) -> bool {
        match read_song(path) {
            Ok(doc) => {
                let end_tick = doc.last_note_end();
                self.document = doc;
                self.timer = SongTimer::new();
                self.timer.set_max_tick(end_tick);
                self.recorder = Recorder::new();
                self.display_tick = 0;
                self.set_status(format!("Loaded: {}", path.display()));
                true
            }
            Err(e) => {
                tracing::error!("failed to load {}: {e}", path.display());
                self.reset_document();
                self.set_status(format!("Invalid song file: {e}"));
                false
            }
        }
    }

    // ==================== Confirm dialog ====================

    /// Opens the "replace existing song?" dialog for `pending`.
    fn open_confirm_dialog(&mut self, pending: PendingAction) {
        self.confirm_dialog.open = true;
        self.confirm_dialog.selected = 1; // default to No
        self.confirm_dialog.pending = pending;
    }

    /// Selects "Yes" in the confirm dialog.
    pub fn confirm_dialog_left(&mut self) {
        self.confirm_dialog.selected = 0;
    }

    /// Selects "No" in the confirm dialog.
    pub fn confirm_dialog_right(&mut self) {
        self.confirm_dialog.selected = 1;
    }

    /// Executes or drops the pending action based on the selection.
    pub fn confirm_dialog_confirm(&mut self) {
        self.confirm_dialog.open = false;
        if self.confirm_dialog.selected != 0 {
            return;
        }
        match self.confirm_dialog.pending {
            PendingAction::NewSong => self.reset_document(),
            PendingAction::OpenSong => self.open_file_browser(),
        }
    }

    /// Cancels the confirm dialog.
    pub fn confirm_dialog_cancel(&mut self) {
        self.confirm_dialog.open = false;
    }

    // ==================== Info dialog ====================

    /// Opens the song-info dialog.
    ///
    /// The note list is re-derived first so the displayed note count and
    /// any auto-derived start delay are current.
    pub fn open_info_dialog(&mut self) {
        let outcome = self.document.rebuild_note_list();
        self.timer.set_max_tick(outcome.end_tick);

        let header = &self.document.header;
        self.info_dialog = InfoDialogState {
            open: true,
            focus: 0,
            title: header.title.clone(),
            artist: header.artist.clone(),
            album: header.album.clone(),
            score: header.high_score.to_string(),
            delay: header.start_delay_secs.to_string(),
            note_count: self.document.note_count(),
        };
    }

    /// Moves focus to the next info field.
    pub fn info_dialog_next_field(&mut self) {
        self.info_dialog.focus = (self.info_dialog.focus + 1) % INFO_FIELD_COUNT;
    }

    /// Moves focus to the previous info field.
    pub fn info_dialog_prev_field(&mut self) {
        self.info_dialog.focus =
            (self.info_dialog.focus + INFO_FIELD_COUNT - 1) % INFO_FIELD_COUNT;
    }

    /// Handles character input in the focused info field. Numeric fields
    /// accept digits only.
    pub fn info_dialog_input(&mut self, c: char) {
        let numeric = self.info_dialog.focus >= 3;
        let field = match self.info_dialog.focus {
            0 => &mut self.info_dialog.title,
            1 => &mut self.info_dialog.artist,
            2 => &mut self.info_dialog.album,
            3 => &mut self.info_dialog.score,
            _ => &mut self.info_dialog.delay,
        };
        if numeric {
            if c.is_ascii_digit() && field.len() < 3 {
                field.push(c);
            }
        } else if !c.is_control() {
            field.push(c);
        }
    }

    /// Handles backspace in the focused info field.
    pub fn info_dialog_backspace(&mut self) {
        match self.info_dialog.focus {
            0 => self.info_dialog.title.pop(),
            1 => self.info_dialog.artist.pop(),
            2 => self.info_dialog.album.pop(),
            3 => self.info_dialog.score.pop(),
            _ => self.info_dialog.delay.pop(),
        };
    }

    /// Zeroes the high-score field.
    pub fn info_dialog_clear_score(&mut self) {
        self.info_dialog.score = "0".to_string();
    }

    /// Validates and commits the info dialog.
    ///
    /// Over-long text fields are rejected with the form left open. On
    /// success the header is updated and, if a save was waiting on the
    /// info, the save dialog opens next.
    pub fn info_dialog_confirm(&mut self) -> bool {
        let dialog = &self.info_dialog;
        if dialog.title.chars().count() > NAME_MAX_CHARS
            || dialog.artist.chars().count() > NAME_MAX_CHARS
            || dialog.album.chars().count() > NAME_MAX_CHARS
        {
            self.set_status(format!(
                "Title, artist, and album are limited to {NAME_MAX_CHARS} characters"
            ));
            return false;
        }

        let header = &mut self.document.header;
        header.title = dialog.title.trim().to_string();
        header.artist = dialog.artist.trim().to_string();
        header.album = dialog.album.trim().to_string();
        header.high_score = dialog.score.parse::<u16>().unwrap_or(0).min(100) as u8;
        header.start_delay_secs = dialog.delay.parse::<u16>().unwrap_or(0).min(255) as u8;
        self.document.mark_dirty();
        self.info_dialog.open = false;

        if self.save_after_info {
            self.save_after_info = false;
            if self.document.header.is_untitled() {
                self.set_status("Save cancelled - song needs a title");
            } else {
                self.open_save_dialog();
            }
        }
        true
    }

    /// Cancels the info dialog, aborting any save that was waiting on it.
    pub fn info_dialog_cancel(&mut self) {
        self.info_dialog.open = false;
        if self.save_after_info {
            self.save_after_info = false;
            self.set_status("Save cancelled");
        }
    }

    // ==================== Save dialog ====================

    /// Opens the save dialog with the default "Song NN" name.
    pub fn open_save_dialog(&mut self) {
        if self.document.file_index == 0 {
            self.document.file_index = 1;
        }
        self.save_dialog.filename = song_file_stem(self.document.file_index);
        self.save_dialog.open = true;
    }

    /// Handles character input in the save dialog.
    pub fn save_dialog_input(&mut self, c: char) {
        if self.save_dialog.open && !c.is_control() {
            self.save_dialog.filename.push(c);
        }
    }

    /// Handles backspace in the save dialog.
    pub fn save_dialog_backspace(&mut self) {
        if self.save_dialog.open {
            self.save_dialog.filename.pop();
        }
    }

    /// Confirms and executes the save.
    ///
    /// On failure the document keeps its dirty flag so the edits stay
    /// protected by the overwrite prompts.
    pub fn save_dialog_confirm(&mut self) -> bool {
        if !self.save_dialog.open || self.save_dialog.filename.is_empty() {
            return false;
        }

        let path = PathBuf::from(format!("{}.{}", self.save_dialog.filename, FILE_EXT));
        // Keep whatever index the user typed into the name (0 if none)
        self.document.file_index = file_index_of(&path).unwrap_or(0);
        self.save_dialog.open = false;

        match write_song(&path, &self.document) {
            Ok(()) => {
                self.document.clear_dirty();
                self.set_status(format!("Saved: {}", path.display()));
                true
            }
            Err(e) => {
                tracing::error!("failed to save {}: {e}", path.display());
                self.set_status(format!("Save failed: {e}"));
                false
            }
        }
    }

    /// Cancels the save dialog.
    pub fn save_dialog_cancel(&mut self) {
        self.save_dialog.open = false;
        self.set_status("Save cancelled");
    }

    // ==================== File browser ====================

    /// Opens the file browser for loading a song.
    pub fn open_file_browser(&mut self) {
        self.file_browser.open = true;
        self.file_browser.current_dir = std::env::current_dir().unwrap_or_default();
        self.file_browser.selected = 0;
        self.file_browser.scroll = 0;
        self.refresh_file_browser();
    }

    /// Refreshes the file browser entries.
    fn refresh_file_browser(&mut self) {
        self.file_browser.entries.clear();

        if self.file_browser.current_dir.parent().is_some() {
            self.file_browser.entries.push(PathBuf::from(".."));
        }

        if let Ok(entries) = std::fs::read_dir(&self.file_browser.current_dir) {
            let mut dirs: Vec<PathBuf> = Vec::new();
            let mut files: Vec<PathBuf> = Vec::new();

            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                    if ext.eq_ignore_ascii_case(FILE_EXT) {
                        files.push(path);
                    }
                }
            }

            dirs.sort();
            files.sort();

            self.file_browser.entries.extend(dirs);
            self.file_browser.entries.extend(files);
        }

        if self.file_browser.selected >= self.file_browser.entries.len() {
            self.file_browser.selected = 0;
        }
    }

    /// Moves selection up in the file browser.
    pub fn file_browser_up(&mut self) {
        if self.file_browser.open && self.file_browser.selected > 0 {
            self.file_browser.selected -= 1;
            if self.file_browser.selected < self.file_browser.scroll {
                self.file_browser.scroll = self.file_browser.selected;
            }
        }
    }

    /// Moves selection down in the file browser.
    pub fn file_browser_down(&mut self) {
        if self.file_browser.open
            && self.file_browser.selected + 1 < self.file_browser.entries.len()
        {
            self.file_browser.selected += 1;
            // Scroll if needed (assuming ~10 visible entries)
            if self.file_browser.selected >= self.file_browser.scroll + 10 {
                self.file_browser.scroll = self.file_browser.selected.saturating_sub(9);
            }
        }
    }

    /// Selects the current entry in the file browser: descends into
    /// directories, loads song files.
    pub fn file_browser_select(&mut self) -> bool {
        if !self.file_browser.open || self.file_browser.entries.is_empty() {
            return false;
        }

        let selected_path = &self.file_browser.entries[self.file_browser.selected];

        if selected_path == &PathBuf::from("..") {
            if let Some(parent) = self.file_browser.current_dir.parent() {
                self.file_browser.current_dir = parent.to_path_buf();
                self.file_browser.selected = 0;
                self.file_browser.scroll = 0;
                self.refresh_file_browser();
            }
            false
        } else if selected_path.is_dir() {
            self.file_browser.current_dir = selected_path.clone();
            self.file_browser.selected = 0;
            self.file_browser.scroll = 0;
            self.refresh_file_browser();
            false
        } else {
            let path = selected_path.clone();
            self.file_browser.open = false;
            self.open_path(&path)
        }
    }

    /// Cancels the file browser.
    pub fn file_browser_cancel(&mut self) {
        self.file_browser.open = false;
        self.set_status("Open cancelled");
    }

    // ==================== Readouts ====================

    /// Formats the song-time readout for the current tick: the start
    /// delay plus the elapsed tick time, as "M:SS".
    pub fn clock_string(&self) -> String {
        let secs = self.document.header.start_delay_secs as u32
            + song::ticks_to_seconds(self.display_tick);
        song::format_clock(secs)
    }

    /// Returns the display name of the song for the title bar: the title
    /// if set, otherwise the default file name.
    pub fn song_display_name(&self) -> String {
        if !self.document.header.title.is_empty() {
            self.document.header.title.clone()
        } else if self.document.file_index != 0 {
            song_file_stem(self.document.file_index)
        } else {
            "untitled".to_string()
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fret_key_records_and_release_ends() {
        let mut app = App::new();
        app.handle_fret_key(3);
        assert_eq!(app.held_fret(), Some(3));
        assert!(app.timer.is_running());

        // A release for a different fret is ignored
        app.handle_fret_key_release(2);
        assert_eq!(app.held_fret(), Some(3));

        app.handle_fret_key_release(3);
        assert_eq!(app.held_fret(), None);
    }

    #[test]
    fn test_out_of_range_fret_ignored() {
        let mut app = App::new();
        app.handle_fret_key(6);
        assert_eq!(app.held_fret(), None);
        assert!(!app.timer.is_running());
    }

    #[test]
    fn test_scroll_rejected_while_running() {
        let mut app = App::new();
        app.timer.set_max_tick(100);
        app.timer.start();
        app.handle_scroll(ScrollCommand::End);
        app.timer.stop();
        // The End command must not have moved the stopped position
        assert!(app.timer.current_tick(false) < 100);
    }

    #[test]
    fn test_scroll_commands_move_stopped_timer() {
        let mut app = App::new();
        app.timer.set_max_tick(100);

        app.handle_scroll(ScrollCommand::End);
        assert_eq!(app.timer.current_tick(false), 100);

        app.handle_scroll(ScrollCommand::LineUp);
        assert_eq!(app.timer.current_tick(false), 99);

        app.handle_scroll(ScrollCommand::Home);
        assert_eq!(app.timer.current_tick(false), 0);

        // Scrolling before the start clamps to 0
        app.handle_scroll(ScrollCommand::PageUp);
        assert_eq!(app.timer.current_tick(false), 0);
    }

    #[test]
    fn test_empty_song_save_rejected() {
        let mut app = App::new();
        app.request_save();
        assert!(!app.save_dialog.open);
        assert!(!app.info_dialog.open);
    }

    #[test]
    fn test_untitled_save_forces_info_dialog_first() {
        let mut app = App::new();
        app.handle_fret_key(1);
        app.handle_fret_key_release(1);

        app.request_save();
        assert!(app.info_dialog.open);
        assert!(!app.save_dialog.open);

        app.info_dialog.title = "Smoke Test".into();
        assert!(app.info_dialog_confirm());
        assert!(app.save_dialog.open);
        assert_eq!(app.save_dialog.filename, "Song 1");
    }

    #[test]
    fn test_info_dialog_rejects_long_fields() {
        let mut app = App::new();
        app.open_info_dialog();
        app.info_dialog.title = "a title well beyond fifteen characters".into();
        assert!(!app.info_dialog_confirm());
        assert!(app.info_dialog.open);
    }

    #[test]
    fn test_info_dialog_clamps_numeric_fields() {
        let mut app = App::new();
        app.open_info_dialog();
        app.info_dialog.title = "ok".into();
        app.info_dialog.score = "999".into();
        app.info_dialog.delay = "300".into();
        assert!(app.info_dialog_confirm());
        assert_eq!(app.document().header.high_score, 100);
        assert_eq!(app.document().header.start_delay_secs, 255);
    }

    #[test]
    fn test_new_song_prompts_when_dirty() {
        let mut app = App::new();
        app.handle_fret_key(2);
        app.handle_fret_key_release(2);
        assert!(app.document().is_dirty());

        app.request_new_song();
        assert!(app.confirm_dialog.open);
        assert_eq!(app.confirm_dialog.pending, PendingAction::NewSong);

        // Declining keeps the song
        app.confirm_dialog_confirm();
        assert!(app.document().is_dirty());

        // Accepting resets it
        app.request_new_song();
        app.confirm_dialog_left();
        app.confirm_dialog_confirm();
        assert!(!app.document().is_dirty());
        assert_eq!(app.document().note_count(), 0);
    }
}
