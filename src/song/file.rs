//! Song file reading and writing.
//!
//! The on-disk format is a fixed-layout header followed by exactly
//! `note_count` four-byte note records, with no delimiters. The layout is
//! realized as serde wire structs encoded with bincode's fixed-width
//! little-endian representation, so the structs below *are* the byte
//! layout; a unit test pins the sizes.
//!
//! Loading decodes into a fresh document and only hands it back on full
//! success, so a bad file can never leave the caller with a partially
//! overwritten song.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::SongDocument;
use super::header::SongHeader;
use super::note::Note;
use super::MAX_NOTES;

/// File extension for song files; doubles as the file signature.
pub const FILE_EXT: &str = "gcs";

/// Magic bytes at the start of every song file (the extension, NUL
/// padded).
const FILE_SIGNATURE: [u8; 4] = *b"gcs\0";

/// Format version written to every file. Old files are accepted as long
/// as the signature matches.
const FILE_VERSION: u8 = 1;

/// Base for default file names ("Song 1.gcs" .. "Song 99.gcs").
pub const FILE_BASE_NAME: &str = "Song ";

/// Highest index the default naming scheme uses.
pub const MAX_FILE_INDEX: u32 = 99;

/// Size of the encoded header in bytes.
const HEADER_LEN: usize = 78;

/// Size of one encoded note record in bytes.
const NOTE_LEN: usize = 4;

/// Capacity of a name field, including the NUL terminator.
const NAME_FIELD_LEN: usize = 16;

/// Errors from loading or saving a song file.
#[derive(Debug, Error)]
pub enum SongFileError {
    #[error("could not access song file: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a song file (bad signature)")]
    BadSignature,

    #[error("song file truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("song file has an impossible note count: {0}")]
    BadNoteCount(i16),

    #[error("malformed song data: {0}")]
    Malformed(#[from] bincode::Error),
}

/// The fixed 78-byte file header, field for field in disk order.
#[derive(Debug, Serialize, Deserialize)]
struct FileHeader {
    signature: [u8; 4],
    version: u8,
    reserved: u8,
    title: [u8; NAME_FIELD_LEN],
    artist: [u8; NAME_FIELD_LEN],
    album: [u8; NAME_FIELD_LEN],
    high_score: u8,
    start_delay_secs: u8,
    reserved_tail: [u8; 20],
    note_count: i16,
}

/// Packs a string into a fixed NUL-terminated name field, truncating to
/// the field's visible capacity.
fn pack_name(name: &str) -> [u8; NAME_FIELD_LEN] {
    let mut field = [0u8; NAME_FIELD_LEN];
    for (dst, src) in field
        .iter_mut()
        .zip(name.bytes().take(NAME_FIELD_LEN - 1))
    {
        *dst = src;
    }
    field
}

/// Unpacks a fixed name field back into a string (up to the first NUL).
fn unpack_name(field: &[u8; NAME_FIELD_LEN]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Loads a song from `path` into a fresh document.
///
/// Validates the signature and the claimed note count before decoding the
/// body; any failure returns an error and the caller's state is untouched.
pub fn read_song(path: &Path) -> Result<SongDocument, SongFileError> {
    let data = std::fs::read(path)?;

    if data.len() < HEADER_LEN {
        return Err(SongFileError::Truncated {
            expected: HEADER_LEN,
            found: data.len(),
        });
    }
    if data[..FILE_SIGNATURE.len()] != FILE_SIGNATURE {
        return Err(SongFileError::BadSignature);
    }

    let raw: FileHeader = bincode::deserialize(&data[..HEADER_LEN])?;
    if raw.note_count < 0 || raw.note_count as usize > MAX_NOTES {
        return Err(SongFileError::BadNoteCount(raw.note_count));
    }

    let count = raw.note_count as usize;
    let expected = HEADER_LEN + count * NOTE_LEN;
    if data.len() < expected {
        return Err(SongFileError::Truncated {
            expected,
            found: data.len(),
        });
    }

    let mut notes = Vec::with_capacity(count);
    for record in data[HEADER_LEN..expected].chunks_exact(NOTE_LEN) {
        notes.push(bincode::deserialize::<Note>(record)?);
    }

    let header = SongHeader {
        title: unpack_name(&raw.title),
        artist: unpack_name(&raw.artist),
        album: unpack_name(&raw.album),
        high_score: raw.high_score,
        start_delay_secs: raw.start_delay_secs,
    };
    let file_index = file_index_of(path).unwrap_or(0);

    Ok(SongDocument::from_parts(header, notes, file_index))
}

/// Writes the whole song to `path`, replacing any existing file.
pub fn write_song(path: &Path, doc: &SongDocument) -> Result<(), SongFileError> {
    let header = FileHeader {
        signature: FILE_SIGNATURE,
        version: FILE_VERSION,
        reserved: 0,
        title: pack_name(&doc.header.title),
        artist: pack_name(&doc.header.artist),
        album: pack_name(&doc.header.album),
        high_score: doc.header.high_score,
        start_delay_secs: doc.header.start_delay_secs,
        reserved_tail: [0; 20],
        note_count: doc.note_count() as i16,
    };

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &header)?;
    for note in doc.notes() {
        bincode::serialize_into(&mut writer, note)?;
    }
    writer.flush()?;
    Ok(())
}

/// Returns the default file stem for a given index, e.g. "Song 7".
pub fn song_file_stem(index: u32) -> String {
    format!("{FILE_BASE_NAME}{index}")
}

/// Extracts the "Song NN" index from a file name or path.
///
/// Takes the run of digits at the end of the file stem; anything without
/// one, or with an index outside 1..=99, yields None (not an error).
pub fn file_index_of(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(pos, _)| pos)?;
    let index: u32 = stem[digits_start..].parse().ok()?;
    (1..=MAX_FILE_INDEX).contains(&index).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_wire_layout_is_fixed() {
        let header = FileHeader {
            signature: FILE_SIGNATURE,
            version: FILE_VERSION,
            reserved: 0,
            title: pack_name("t"),
            artist: pack_name("a"),
            album: pack_name("b"),
            high_score: 0,
            start_delay_secs: 0,
            reserved_tail: [0; 20],
            note_count: 0,
        };
        assert_eq!(bincode::serialize(&header).unwrap().len(), HEADER_LEN);
        assert_eq!(
            bincode::serialize(&Note::new(0, 1, 1)).unwrap().len(),
            NOTE_LEN
        );
    }

    #[test]
    fn test_pack_name_truncates_and_round_trips() {
        let field = pack_name("a name that is far too long");
        assert_eq!(field[NAME_FIELD_LEN - 1], 0);
        assert_eq!(unpack_name(&field), "a name that is ");

        let field = pack_name("Freebird");
        assert_eq!(unpack_name(&field), "Freebird");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Song 7.gcs");

        let mut doc = SongDocument::new();
        doc.header.title = "Iron Man".into();
        doc.header.artist = "Black Sabbath".into();
        doc.header.high_score = 88;
        for tick in 40..60 {
            doc.write_fret(tick, 3);
        }
        for tick in 70..80 {
            doc.write_fret(tick, 5);
        }
        doc.rebuild_note_list();

        write_song(&path, &doc).unwrap();
        let loaded = read_song(&path).unwrap();

        assert_eq!(loaded.header, doc.header);
        assert_eq!(loaded.notes(), doc.notes());
        assert_eq!(loaded.file_index, 7);
        assert!(!loaded.is_dirty());

        // The fret map is re-derived on load
        for tick in 0..20 {
            assert_eq!(loaded.fret_at(tick), 3);
        }
        assert_eq!(loaded.fret_at(30), 5);
    }

    #[test]
    fn test_bad_signature_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.gcs");
        std::fs::write(&path, vec![0u8; 200]).unwrap();

        assert!(matches!(
            read_song(&path),
            Err(SongFileError::BadSignature)
        ));
    }

    #[test]
    fn test_short_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub.gcs");
        std::fs::write(&path, b"gcs\0trailing").unwrap();

        assert!(matches!(
            read_song(&path),
            Err(SongFileError::Truncated { .. })
        ));
    }

    #[test]
    fn test_missing_note_records_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.gcs");

        // A valid header claiming five notes, but no body
        let header = FileHeader {
            signature: FILE_SIGNATURE,
            version: FILE_VERSION,
            reserved: 0,
            title: pack_name(""),
            artist: pack_name(""),
            album: pack_name(""),
            high_score: 0,
            start_delay_secs: 0,
            reserved_tail: [0; 20],
            note_count: 5,
        };
        std::fs::write(&path, bincode::serialize(&header).unwrap()).unwrap();

        assert!(matches!(
            read_song(&path),
            Err(SongFileError::Truncated { .. })
        ));
    }

    #[test]
    fn test_bad_note_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.gcs");

        let header = FileHeader {
            signature: FILE_SIGNATURE,
            version: FILE_VERSION,
            reserved: 0,
            title: pack_name(""),
            artist: pack_name(""),
            album: pack_name(""),
            high_score: 0,
            start_delay_secs: 0,
            reserved_tail: [0; 20],
            note_count: -1,
        };
        std::fs::write(&path, bincode::serialize(&header).unwrap()).unwrap();

        assert!(matches!(
            read_song(&path),
            Err(SongFileError::BadNoteCount(-1))
        ));
    }

    #[test]
    fn test_file_index_parsing() {
        assert_eq!(file_index_of(Path::new("Song 7.gcs")), Some(7));
        assert_eq!(file_index_of(Path::new("/tmp/charts/Song 42.gcs")), Some(42));
        assert_eq!(file_index_of(Path::new("Song 99.gcs")), Some(99));

        // Out of range, missing, or non-trailing digits are "no index"
        assert_eq!(file_index_of(Path::new("Song 0.gcs")), None);
        assert_eq!(file_index_of(Path::new("Song 123.gcs")), None);
        assert_eq!(file_index_of(Path::new("ballad.gcs")), None);
        assert_eq!(file_index_of(Path::new("7 dwarves remix.gcs")), None);
    }

    #[test]
    fn test_file_stem_round_trips_through_parser() {
        let name = PathBuf::from(format!("{}.{}", song_file_stem(13), FILE_EXT));
        assert_eq!(file_index_of(&name), Some(13));
    }
}
