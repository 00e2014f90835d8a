//! Song metadata header.

/// Longest visible length of the title/artist/album fields.
/// The on-disk fields are one byte longer to hold the NUL terminator.
pub const NAME_MAX_CHARS: usize = 15;

/// Song metadata, edited through the song-info dialog and persisted at the
/// front of the song file.
///
/// The fixed on-disk byte layout lives in the file module; this struct
/// holds the friendly in-memory form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongHeader {
    /// Song title (up to 15 characters).
    pub title: String,

    /// Song artist (up to 15 characters).
    pub artist: String,

    /// Song album (up to 15 characters).
    pub album: String,

    /// Best score achieved on this song so far (0-100).
    pub high_score: u8,

    /// Approximate delay in seconds before the first note. Derived from
    /// the leading silence when the chart is built, unless already set.
    pub start_delay_secs: u8,
}

impl SongHeader {
    /// Creates an empty header for a fresh song.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no title has been entered yet.
    /// An untitled song forces the info dialog open before saving.
    pub fn is_untitled(&self) -> bool {
        self.title.is_empty()
    }
}
