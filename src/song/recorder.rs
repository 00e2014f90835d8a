//! Live recording session.
//!
//! Tracks the fret currently being held and writes it into the fret map
//! as the timer advances. Holding a fret key starts a note; the note is
//! extended on every redraw tick (not just on key events) so slow event
//! delivery cannot leave gaps in the recorded run.

use super::document::SongDocument;
use crate::timing::SongTimer;

/// State of the note currently being recorded, if any.
///
/// A held value of 0 is an erase stroke: the '0' key records silence over
/// whatever was there, the same way the fret keys record notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recorder {
    /// Fret being held (0-5), or None when no note is in progress.
    held_fret: Option<u8>,

    /// Last tick the held note has been written up to.
    note_end_tick: u32,
}

impl Recorder {
    /// Creates an idle recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fret currently being held, if any.
    pub fn held_fret(&self) -> Option<u8> {
        self.held_fret
    }

    /// Starts recording a note at `fret`, ending any note in progress.
    ///
    /// Takes the current tick with auto-start, so pressing a fret key is
    /// what sets the clock running on a fresh song.
    pub fn start_note(&mut self, doc: &mut SongDocument, timer: &mut SongTimer, fret: u8) {
        self.end_note(doc, timer);

        let tick = timer.current_tick(true);
        doc.write_fret(tick, fret);
        doc.mark_dirty();
        self.held_fret = Some(fret);
        self.note_end_tick = tick;
    }

    /// Extends the held note up to the current tick.
    ///
    /// Fills every tick after the last written one, so a note held across
    /// several redraw intervals comes out as one continuous run.
    pub fn extend_note(&mut self, doc: &mut SongDocument, timer: &mut SongTimer) {
        if let Some(fret) = self.held_fret {
            let current = timer.current_tick(false);
            for tick in self.note_end_tick + 1..=current {
                doc.write_fret(tick, fret);
            }
            self.note_end_tick = current.max(self.note_end_tick);
            doc.mark_dirty();
        }
    }

    /// Ends the note in progress, if any, extending it to the current tick
    /// first.
    pub fn end_note(&mut self, doc: &mut SongDocument, timer: &mut SongTimer) {
        self.extend_note(doc, timer);
        self.held_fret = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_note_writes_at_current_tick() {
        let mut doc = SongDocument::new();
        let mut timer = SongTimer::new();
        let mut recorder = Recorder::new();

        // Stopped timer at tick 0: auto-start returns exactly the resume tick
        recorder.start_note(&mut doc, &mut timer, 3);

        assert!(timer.is_running());
        assert_eq!(doc.fret_at(0), 3);
        assert_eq!(recorder.held_fret(), Some(3));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_erase_stroke_records_silence() {
        let mut doc = SongDocument::new();
        let mut timer = SongTimer::new();
        let mut recorder = Recorder::new();

        doc.write_fret(0, 4);
        recorder.start_note(&mut doc, &mut timer, 0);
        assert_eq!(doc.fret_at(0), 0);
        assert_eq!(recorder.held_fret(), Some(0));
    }

    #[test]
    fn test_extend_fills_gap_since_last_write() {
        let mut doc = SongDocument::new();
        let mut timer = SongTimer::new();
        let mut recorder = Recorder::new();

        recorder.start_note(&mut doc, &mut timer, 2);

        // Freeze the clock, then reposition it forward; the held note must
        // fill everything between its last write and the new position
        timer.stop();
        timer.set_max_tick(20);
        timer.seek(20);
        recorder.extend_note(&mut doc, &mut timer);

        for tick in 0..=20 {
            assert_eq!(doc.fret_at(tick), 2, "gap at tick {tick}");
        }
        assert_eq!(doc.fret_at(21), 0);
    }

    #[test]
    fn test_end_note_clears_held_fret() {
        let mut doc = SongDocument::new();
        let mut timer = SongTimer::new();
        let mut recorder = Recorder::new();

        recorder.start_note(&mut doc, &mut timer, 1);
        recorder.end_note(&mut doc, &mut timer);
        assert_eq!(recorder.held_fret(), None);

        // Ending again is a no-op
        recorder.end_note(&mut doc, &mut timer);
        assert_eq!(recorder.held_fret(), None);
    }

    #[test]
    fn test_new_note_ends_previous() {
        let mut doc = SongDocument::new();
        let mut timer = SongTimer::new();
        let mut recorder = Recorder::new();

        recorder.start_note(&mut doc, &mut timer, 1);
        recorder.start_note(&mut doc, &mut timer, 5);
        assert_eq!(recorder.held_fret(), Some(5));
    }
}
