//! Directory and filename heuristic
//!
//! Recognises the common `Album (Year)/NN - Title.ext` layout, including a
//! disc subfolder between album and file.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use verse_core::TrackMetadata;

static DISC_DIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(digital\s*media|disc|disk|cd)\s*[-_.]?\s*\d+$")
        .expect("disc directory pattern is valid")
});

static ALBUM_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*\((\d{4})\)\s*$").expect("album/year pattern is valid")
});

static TRACK_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})\s*[-._ ]\s*(.+)$").expect("track prefix pattern is valid")
});

/// Whether a directory name is a disc subfolder ("Disc 2", "CD3", ...)
pub fn is_disc_dir(name: &str) -> bool {
    DISC_DIR.is_match(name.trim())
}

/// Split `Album (2001)` into album and year
///
/// Names without a trailing year are returned whole.
pub fn album_from_dir_name(name: &str) -> (Option<String>, Option<i32>) {
    let name = name.trim();
    if let Some(caps) = ALBUM_YEAR.captures(name) {
        let album = caps[1].trim();
        let year = caps[2].parse().ok();
        let album = (!album.is_empty()).then(|| album.to_string());
        return (album, year);
    }
    ((!name.is_empty()).then(|| name.to_string()), None)
}

/// Split `03 - Title` into track number and title
pub fn split_track_title(stem: &str) -> (Option<u32>, String) {
    let stem = stem.trim();
    if let Some(caps) = TRACK_PREFIX.captures(stem) {
        let title = caps[2].trim();
        if !title.is_empty() {
            return (caps[1].parse().ok(), title.to_string());
        }
    }
    (None, stem.to_string())
}

/// Metadata inferred from where a file sits
pub struct PathHeuristic;

impl PathHeuristic {
    /// Album, year, track number and title from the path alone
    pub fn from_path(path: &Path) -> TrackMetadata {
        let mut metadata = TrackMetadata::new();

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let (track_number, title) = split_track_title(&stem);
        metadata.track_number = track_number;
        metadata.title = (!title.is_empty()).then_some(title);

        if let Some(album_dir) = album_dir_name(path) {
            let (album, year) = album_from_dir_name(&album_dir);
            metadata.album = album;
            metadata.year = year;
        }

        metadata
    }

    /// Only the album and year parts
    pub fn album_and_year(path: &Path) -> (Option<String>, Option<i32>) {
        album_dir_name(path)
            .map(|name| album_from_dir_name(&name))
            .unwrap_or((None, None))
    }
}

/// Name of the directory that carries the album, skipping a disc folder
fn album_dir_name(path: &Path) -> Option<String> {
    let parent = path.parent()?;
    let name = parent.file_name()?.to_string_lossy().to_string();

    if is_disc_dir(&name) {
        let grandparent = parent.parent()?.file_name()?;
        return Some(grandparent.to_string_lossy().to_string());
    }

    Some(name)
}
