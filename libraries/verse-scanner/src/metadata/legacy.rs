//! ID3v1 trailers
//!
//! Tools have long appended a 128-byte ID3v1 block to files of any format,
//! including WAV and AIFF whose native parsers never look for one. This
//! strategy reads the trailer directly so those tags are still found.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;
use verse_core::TrackMetadata;

use super::container::read_duration;
use super::heuristic::PathHeuristic;
use super::{Extraction, MetadataStrategy};

const TRAILER_LEN: u64 = 128;

/// Standard ID3v1 genre list (indices 0-79)
pub const ID3V1_GENRES: [&str; 80] = [
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop", "Jazz",
    "Metal", "New Age", "Oldies", "Other", "Pop", "R&B", "Rap", "Reggae", "Rock", "Techno",
    "Industrial", "Alternative", "Ska", "Death Metal", "Pranks", "Soundtrack", "Euro-Techno",
    "Ambient", "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical", "Instrumental",
    "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise", "AlternRock", "Bass", "Soul",
    "Punk", "Space", "Meditative", "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic",
    "Darkwave", "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream",
    "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40", "Christian Rap", "Pop/Funk",
    "Jungle", "Native American", "Cabaret", "New Wave", "Psychadelic", "Rave", "Showtunes",
    "Trailer", "Lo-Fi", "Tribal", "Acid Punk", "Acid Jazz", "Polka", "Retro", "Musical",
    "Rock & Roll", "Hard Rock",
];

/// ID3v1/ID3v1.1 trailer reader
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyTags;

impl MetadataStrategy for LegacyTags {
    fn name(&self) -> &'static str {
        "id3v1"
    }

    fn extract(&self, path: &Path) -> Extraction {
        let trailer = match read_trailer(path) {
            Ok(Some(trailer)) => trailer,
            Ok(None) => return Extraction::Empty,
            Err(e) => {
                debug!("Failed to read trailer of {}: {}", path.display(), e);
                return Extraction::Empty;
            }
        };

        let Some(mut metadata) = parse_id3v1(&trailer).map(TrackMetadata::normalized) else {
            return Extraction::Empty;
        };
        if !metadata.is_identified() {
            return Extraction::Empty;
        }

        metadata.fill_missing(&PathHeuristic::from_path(path));
        if metadata.duration_seconds.is_none() {
            metadata.duration_seconds = read_duration(path);
        }

        Extraction::Found(metadata)
    }
}

fn read_trailer(path: &Path) -> std::io::Result<Option<[u8; 128]>> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() < TRAILER_LEN {
        return Ok(None);
    }

    file.seek(SeekFrom::End(-(TRAILER_LEN as i64)))?;
    let mut trailer = [0u8; 128];
    file.read_exact(&mut trailer)?;

    Ok(Some(trailer))
}

/// Decode a 128-byte trailer, or `None` without the `TAG` marker
pub fn parse_id3v1(block: &[u8; 128]) -> Option<TrackMetadata> {
    if &block[..3] != b"TAG" {
        return None;
    }

    let comment = &block[97..127];
    // ID3v1.1 steals the last two comment bytes for a zero and a track number
    let track_number = (comment[28] == 0 && comment[29] != 0).then(|| u32::from(comment[29]));

    let year = latin1(&block[93..97])
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse().ok());

    let genre = ID3V1_GENRES
        .get(usize::from(block[127]))
        .map(|g| (*g).to_string());

    Some(TrackMetadata {
        title: latin1(&block[3..33]),
        artist: latin1(&block[33..63]),
        album: latin1(&block[63..93]),
        album_artist: None,
        genre,
        year,
        track_number,
        duration_seconds: None,
    })
}

/// Fixed-width ISO-8859-1 field, cut at the first NUL and trimmed
fn latin1(field: &[u8]) -> Option<String> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    let text: String = field[..end].iter().map(|&b| char::from(b)).collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
