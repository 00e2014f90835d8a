//! Song data structures and chart conversions.
//!
//! This module provides the core types for a recorded song: the dense
//! per-tick fret map used for live editing and drawing, the sparse note
//! list written to disk, and the conversions between them.

mod document;
mod file;
mod header;
mod note;
mod recorder;

pub use document::{FretMap, NoteListOutcome, SongDocument};
pub use file::{file_index_of, read_song, song_file_stem, write_song, SongFileError};
#[allow(unused_imports)]
pub use file::{FILE_BASE_NAME, FILE_EXT, MAX_FILE_INDEX};
pub use header::{SongHeader, NAME_MAX_CHARS};
pub use note::Note;
pub use recorder::Recorder;

/// Duration of one timing tick in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 25;

/// Length of the song timeline in ticks (~800 seconds).
pub const TICK_MAX: u32 = 32_000;

/// Longest run a single note record can encode (fits in a byte).
pub const NOTE_TICKS_MAX: u32 = 255;

/// Maximum number of note records in a song.
pub const MAX_NOTES: usize = 1000;

/// Number of fret lanes. Fret values are 1..=FRET_COUNT; 0 is silence.
pub const FRET_COUNT: u8 = 5;

/// Converts a tick position to whole seconds of song time.
pub fn ticks_to_seconds(tick: u32) -> u32 {
    (tick as u64 * TICK_INTERVAL_MS / 1000) as u32
}

/// Formats a second count as "M:SS" for the transport readout.
pub fn format_clock(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_to_seconds() {
        // 40 ticks at 25 ms each is exactly one second
        assert_eq!(ticks_to_seconds(0), 0);
        assert_eq!(ticks_to_seconds(39), 0);
        assert_eq!(ticks_to_seconds(40), 1);
        assert_eq!(ticks_to_seconds(TICK_MAX), 800);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(800), "13:20");
    }
}
