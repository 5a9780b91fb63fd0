//! Catalog track types
//!
//! One row per in-scope audio file, unique by file path.

use serde::{Deserialize, Serialize};

/// Track identifier (SQLite rowid)
pub type TrackId = i64;

/// Persisted catalog track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    /// Absolute path on disk (unique)
    pub file_path: String,
    pub filename: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub file_size: i64,
    /// Stat-derived change signal, see `verse_scanner::fingerprint`
    pub fingerprint: String,
    pub has_lyrics: bool,
    pub lyrics_source: Option<String>,
    pub artwork_path: Option<String>,
    /// Unix seconds
    pub last_scanned_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data for inserting a new track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrack {
    pub file_path: String,
    pub filename: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub file_size: i64,
    pub fingerprint: String,
    pub has_lyrics: bool,
    pub lyrics_source: Option<String>,
    pub artwork_path: Option<String>,
    pub last_scanned_at: i64,
}

/// Full rewrite of a track's scanned fields (path and id are immutable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackUpdate {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub file_size: i64,
    pub fingerprint: String,
    pub has_lyrics: bool,
    pub lyrics_source: Option<String>,
    pub artwork_path: Option<String>,
    pub last_scanned_at: i64,
}

impl From<NewTrack> for TrackUpdate {
    fn from(track: NewTrack) -> Self {
        Self {
            title: track.title,
            artist: track.artist,
            album: track.album,
            album_artist: track.album_artist,
            genre: track.genre,
            year: track.year,
            track_number: track.track_number,
            duration_seconds: track.duration_seconds,
            file_size: track.file_size,
            fingerprint: track.fingerprint,
            has_lyrics: track.has_lyrics,
            lyrics_source: track.lyrics_source,
            artwork_path: track.artwork_path,
            last_scanned_at: track.last_scanned_at,
        }
    }
}

/// Minimal projection used by the deletion sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPath {
    pub id: TrackId,
    pub file_path: String,
}

/// Where a track's lyrics were found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsSource {
    /// `.lrc` file next to the audio file
    Sidecar,
    /// Lyrics frame inside the audio container
    Embedded,
}

impl LyricsSource {
    /// Convert to string representation for database storage
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sidecar => "sidecar",
            Self::Embedded => "embedded",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sidecar" => Some(Self::Sidecar),
            "embedded" => Some(Self::Embedded),
            _ => None,
        }
    }
}

impl std::fmt::Display for LyricsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
