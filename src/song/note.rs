//! Note representation.
//!
//! A note is one persisted run of a single fret value: a start tick, a
//! length that fits in a byte, and the fret being held. Runs longer than
//! 255 ticks are stored as several consecutive notes with no gap.

use serde::{Deserialize, Serialize};

/// A single note record, exactly as it appears on disk (4 bytes).
///
/// `tick_start` is relative to the first note of the song: the chart
/// builder subtracts the leading silence and folds it into the header's
/// start-delay field instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Start time in ticks from the first note of the song.
    pub tick_start: i16,

    /// Length in ticks (1-255).
    pub ticks_length: u8,

    /// Fret lane being held (1-5).
    pub fret: u8,
}

impl Note {
    /// Creates a new note record.
    pub fn new(tick_start: i16, ticks_length: u8, fret: u8) -> Self {
        Self {
            tick_start,
            ticks_length,
            fret,
        }
    }

    /// Returns the start tick as an unsigned offset.
    ///
    /// Negative starts can only come from a hostile file; they are clamped
    /// to zero rather than wrapping.
    pub fn start_tick(&self) -> u32 {
        self.tick_start.max(0) as u32
    }

    /// Returns the end tick of this note (start + length, exclusive).
    pub fn end_tick(&self) -> u32 {
        self.start_tick() + self.ticks_length as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let note = Note::new(120, 40, 3);
        assert_eq!(note.tick_start, 120);
        assert_eq!(note.ticks_length, 40);
        assert_eq!(note.fret, 3);
        assert_eq!(note.end_tick(), 160);
    }

    #[test]
    fn test_negative_start_clamped() {
        let note = Note::new(-5, 10, 1);
        assert_eq!(note.start_tick(), 0);
        assert_eq!(note.end_tick(), 10);
    }
}
