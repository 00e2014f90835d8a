//! Song document container and chart conversions.
//!
//! A document holds the same song in two forms: a dense per-tick fret map
//! (the live, editable representation) and a sparse run-length note list
//! (the stored representation). Converting map to notes and back must
//! reproduce the map exactly, up to the splitting of over-long runs and
//! the leading silence folded into the header's start delay.

use super::header::SongHeader;
use super::note::Note;
use super::{MAX_NOTES, NOTE_TICKS_MAX, TICK_INTERVAL_MS, TICK_MAX};

/// The per-tick fret map: one cell per tick of the song timeline.
///
/// The map has a fixed length of `TICK_MAX` cells. Writes outside the
/// timeline are ignored and reads outside it return silence, so callers
/// never need to range-check tick values themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FretMap {
    cells: Vec<u8>,
}

impl FretMap {
    /// Creates an all-silent map.
    pub fn new() -> Self {
        Self {
            cells: vec![0; TICK_MAX as usize],
        }
    }

    /// Returns the fret value at `tick`, or 0 outside the timeline.
    pub fn get(&self, tick: u32) -> u8 {
        self.cells.get(tick as usize).copied().unwrap_or(0)
    }

    /// Sets the fret value at `tick`. Out-of-range ticks are ignored.
    pub fn set(&mut self, tick: u32, fret: u8) {
        if let Some(cell) = self.cells.get_mut(tick as usize) {
            *cell = fret;
        }
    }

    /// Resets every cell to silence.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl Default for FretMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of deriving the note list from the fret map.
#[derive(Debug, Clone, Copy)]
pub struct NoteListOutcome {
    /// The song hit the note cap and content past it was dropped.
    /// Non-fatal: the capped song is still consistent and saveable.
    pub truncated: bool,

    /// Furthest end tick across all notes after the map was re-derived.
    /// Feeds the timer's max-tick for the scroll range.
    pub end_tick: u32,
}

/// The single in-memory song: header, note list, and fret map.
///
/// Owned by the application instance and passed by reference to every
/// operation; there is exactly one open song and no concurrent access.
#[derive(Debug, Clone)]
pub struct SongDocument {
    /// Song metadata.
    pub header: SongHeader,

    /// Note records, ordered by start tick. Rebuilt from the map before
    /// saving and before the info dialog opens.
    notes: Vec<Note>,

    /// The live per-tick representation.
    map: FretMap,

    /// Numeric index from the "Song NN" file name, 0 when unassigned.
    pub file_index: u32,

    /// True if the song has unsaved edits.
    dirty: bool,
}

impl SongDocument {
    /// Creates a fresh, empty song.
    pub fn new() -> Self {
        Self {
            header: SongHeader::new(),
            notes: Vec::new(),
            map: FretMap::new(),
            file_index: 0,
            dirty: false,
        }
    }

    /// Assembles a document from loaded parts and derives the fret map.
    /// Used by the file loader; the result starts clean.
    pub fn from_parts(header: SongHeader, notes: Vec<Note>, file_index: u32) -> Self {
        let mut doc = Self {
            header,
            notes,
            map: FretMap::new(),
            file_index,
            dirty: false,
        };
        doc.rebuild_fret_map();
        doc
    }

    /// Returns the note records (ordered by start tick).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the number of note records.
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Returns the fret value at `tick` (0 = silence).
    pub fn fret_at(&self, tick: u32) -> u8 {
        self.map.get(tick)
    }

    /// Returns the end tick of the last note, or 0 for an empty song.
    pub fn last_note_end(&self) -> u32 {
        self.notes.iter().map(|n| n.end_tick()).max().unwrap_or(0)
    }

    /// Writes a fret value into the map without touching the dirty flag.
    /// The recorder and the cell editor own dirty tracking.
    pub(crate) fn write_fret(&mut self, tick: u32, fret: u8) {
        self.map.set(tick, fret);
    }

    /// Returns true if the song has unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the song as having unsaved edits.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the dirty flag after a successful save.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Edits a single map cell from a mouse stroke.
    ///
    /// Writes `fret` at `tick`, or erases the cell when `erase` is set.
    /// Erasing only clears the cell if it currently holds the targeted
    /// fret, so sweeping an erase stroke across the board cannot take out
    /// notes on other lanes. Ticks outside the timeline are ignored.
    ///
    /// Returns true if a cell was changed.
    pub fn edit_cell(&mut self, tick: i64, fret: u8, erase: bool) -> bool {
        if tick < 0 || tick >= TICK_MAX as i64 {
            return false;
        }
        let tick = tick as u32;

        let value = if erase {
            if self.map.get(tick) != fret {
                return false;
            }
            0
        } else {
            fret
        };

        self.map.set(tick, value);
        self.dirty = true;
        true
    }

    /// Derives the note list from the fret map.
    ///
    /// Scans the map left to right, grouping maximal runs of one fret
    /// value. Silent runs are skipped. The first note's start tick is
    /// folded into the header's start-delay field (if unset) and all note
    /// starts are made relative to it, so the stored timeline begins at 0.
    /// Runs longer than 255 ticks are split into consecutive full-length
    /// notes plus a remainder. Emission stops at the note cap.
    ///
    /// Afterwards the map is re-derived from the notes so both
    /// representations agree on any truncation or delay offsetting.
    pub fn rebuild_note_list(&mut self) -> NoteListOutcome {
        let mut notes: Vec<Note> = Vec::new();
        let mut truncated = false;
        let mut first_note_tick: Option<u32> = None;

        let mut tick: u32 = 0;
        while tick < TICK_MAX {
            // Find the next maximal run of one fret value
            let run_start = tick;
            let fret = self.map.get(tick);
            while tick < TICK_MAX && self.map.get(tick) == fret {
                tick += 1;
            }

            if fret != 0 {
                if first_note_tick.is_none() {
                    first_note_tick = Some(run_start);

                    // Fold the leading silence into the start delay, unless
                    // the user already set one in the info dialog
                    if self.header.start_delay_secs == 0 {
                        self.header.start_delay_secs =
                            (run_start as u64 * TICK_INTERVAL_MS / 1000) as u8;
                    }
                }
                let mut start = run_start - first_note_tick.unwrap_or(0);
                let mut remaining = tick - run_start;

                // Split runs too long for a single record
                while remaining > NOTE_TICKS_MAX && notes.len() < MAX_NOTES {
                    notes.push(Note::new(start as i16, NOTE_TICKS_MAX as u8, fret));
                    start += NOTE_TICKS_MAX;
                    remaining -= NOTE_TICKS_MAX;
                }
                if notes.len() < MAX_NOTES {
                    notes.push(Note::new(start as i16, remaining as u8, fret));
                    remaining = 0;
                }

                if notes.len() == MAX_NOTES {
                    // Anything non-silent past this point gets dropped
                    truncated =
                        remaining > 0 || (tick..TICK_MAX).any(|t| self.map.get(t) != 0);
                    if truncated {
                        break;
                    }
                }
            }
        }

        self.notes = notes;
        let end_tick = self.rebuild_fret_map();
        NoteListOutcome { truncated, end_tick }
    }

    /// Derives the fret map from the note list (the inverse conversion).
    ///
    /// Clears the map, then writes each note's fret across its tick span.
    /// Returns the furthest end tick across all notes, which becomes the
    /// timer's max-tick after loading a file or rebuilding the chart.
    pub fn rebuild_fret_map(&mut self) -> u32 {
        self.map.clear();
        let mut end_tick = 0;
        for note in &self.notes {
            for tick in note.start_tick()..note.end_tick() {
                self.map.set(tick, note.fret);
            }
            end_tick = end_tick.max(note.end_tick());
        }
        end_tick
    }
}

impl Default for SongDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes a run of `len` ticks of `fret` starting at `start`.
    fn fill_run(doc: &mut SongDocument, start: u32, len: u32, fret: u8) {
        for tick in start..start + len {
            doc.write_fret(tick, fret);
        }
    }

    #[test]
    fn test_empty_song_yields_no_notes() {
        let mut doc = SongDocument::new();
        let outcome = doc.rebuild_note_list();
        assert_eq!(doc.note_count(), 0);
        assert!(!outcome.truncated);
        assert_eq!(outcome.end_tick, 0);
        assert_eq!(doc.header.start_delay_secs, 0);
    }

    #[test]
    fn test_single_run_round_trips() {
        let mut doc = SongDocument::new();
        fill_run(&mut doc, 0, 10, 3);

        let outcome = doc.rebuild_note_list();
        assert_eq!(doc.notes(), &[Note::new(0, 10, 3)]);
        assert_eq!(outcome.end_tick, 10);

        // The re-derived map must match what was recorded
        for tick in 0..10 {
            assert_eq!(doc.fret_at(tick), 3);
        }
        assert_eq!(doc.fret_at(10), 0);
    }

    #[test]
    fn test_multiple_runs_round_trip() {
        let mut doc = SongDocument::new();
        fill_run(&mut doc, 0, 20, 1);
        fill_run(&mut doc, 30, 5, 4);
        fill_run(&mut doc, 35, 5, 2); // adjacent run, different fret

        doc.rebuild_note_list();
        assert_eq!(
            doc.notes(),
            &[
                Note::new(0, 20, 1),
                Note::new(30, 5, 4),
                Note::new(35, 5, 2),
            ]
        );
        assert_eq!(doc.fret_at(19), 1);
        assert_eq!(doc.fret_at(20), 0);
        assert_eq!(doc.fret_at(34), 4);
        assert_eq!(doc.fret_at(35), 2);
    }

    #[test]
    fn test_leading_silence_becomes_start_delay() {
        let mut doc = SongDocument::new();
        fill_run(&mut doc, 100, 50, 2);

        doc.rebuild_note_list();
        // 100 ticks * 25 ms = 2.5 s, truncated to whole seconds
        assert_eq!(doc.header.start_delay_secs, 2);
        // The note timeline is shifted to begin at 0
        assert_eq!(doc.notes(), &[Note::new(0, 50, 2)]);
        assert_eq!(doc.fret_at(0), 2);
        assert_eq!(doc.fret_at(50), 0);
    }

    #[test]
    fn test_existing_delay_left_untouched() {
        let mut doc = SongDocument::new();
        doc.header.start_delay_secs = 9;
        fill_run(&mut doc, 0, 10, 1);

        doc.rebuild_note_list();
        assert_eq!(doc.header.start_delay_secs, 9);
    }

    #[test]
    fn test_long_run_splits_with_remainder() {
        let mut doc = SongDocument::new();
        fill_run(&mut doc, 0, 500, 3);

        doc.rebuild_note_list();
        assert_eq!(
            doc.notes(),
            &[Note::new(0, 255, 3), Note::new(255, 245, 3)]
        );
        // No gap across the split
        for tick in 0..500 {
            assert_eq!(doc.fret_at(tick), 3);
        }
        assert_eq!(doc.fret_at(500), 0);
    }

    #[test]
    fn test_exact_multiple_splits_without_remainder() {
        let mut doc = SongDocument::new();
        fill_run(&mut doc, 0, 510, 5);

        doc.rebuild_note_list();
        assert_eq!(
            doc.notes(),
            &[Note::new(0, 255, 5), Note::new(255, 255, 5)]
        );
    }

    #[test]
    fn test_truncation_at_note_cap() {
        let mut doc = SongDocument::new();
        // 1001 one-tick runs separated by silence
        for i in 0..=MAX_NOTES as u32 {
            doc.write_fret(i * 2, 1);
        }

        let outcome = doc.rebuild_note_list();
        assert_eq!(doc.note_count(), MAX_NOTES);
        assert!(outcome.truncated);
        // The dropped run must not survive in the re-derived map
        assert_eq!(doc.fret_at(MAX_NOTES as u32 * 2), 0);
    }

    #[test]
    fn test_exactly_at_cap_is_not_truncation() {
        let mut doc = SongDocument::new();
        for i in 0..MAX_NOTES as u32 {
            doc.write_fret(i * 2, 1);
        }

        let outcome = doc.rebuild_note_list();
        assert_eq!(doc.note_count(), MAX_NOTES);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_erase_requires_matching_fret() {
        let mut doc = SongDocument::new();
        doc.write_fret(10, 3);

        // Erasing a different fret is a no-op
        assert!(!doc.edit_cell(10, 2, true));
        assert_eq!(doc.fret_at(10), 3);

        // Erasing an empty cell is a no-op
        assert!(!doc.edit_cell(11, 3, true));

        // Erasing the matching fret clears it
        assert!(doc.edit_cell(10, 3, true));
        assert_eq!(doc.fret_at(10), 0);
    }

    #[test]
    fn test_edit_outside_timeline_ignored() {
        let mut doc = SongDocument::new();
        assert!(!doc.edit_cell(-1, 3, false));
        assert!(!doc.edit_cell(TICK_MAX as i64, 3, false));
        assert!(!doc.is_dirty());

        assert!(doc.edit_cell(0, 3, false));
        assert!(doc.is_dirty());
        assert_eq!(doc.fret_at(0), 3);
    }
}
