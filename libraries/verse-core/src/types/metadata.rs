/// Track metadata produced by the extraction cascade
use serde::{Deserialize, Serialize};

/// Best-effort metadata for one audio file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Album artist
    pub album_artist: Option<String>,

    /// Genre
    pub genre: Option<String>,

    /// Release year
    pub year: Option<i32>,

    /// Track number
    pub track_number: Option<u32>,

    /// Duration in seconds
    pub duration_seconds: Option<f64>,
}

impl TrackMetadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the record carries a usable title or artist
    pub fn is_identified(&self) -> bool {
        has_text(self.title.as_deref()) || has_text(self.artist.as_deref())
    }

    /// Check if metadata has any useful information
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.album_artist.is_none()
            && self.genre.is_none()
            && self.year.is_none()
            && self.track_number.is_none()
            && self.duration_seconds.is_none()
    }

    /// Fill every `None` field from `other`, leaving present fields untouched
    pub fn fill_missing(&mut self, other: &TrackMetadata) {
        fill(&mut self.title, &other.title);
        fill(&mut self.artist, &other.artist);
        fill(&mut self.album, &other.album);
        fill(&mut self.album_artist, &other.album_artist);
        fill(&mut self.genre, &other.genre);
        fill(&mut self.year, &other.year);
        fill(&mut self.track_number, &other.track_number);
        fill(&mut self.duration_seconds, &other.duration_seconds);
    }

    /// Replace blank strings with `None`
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.title,
            &mut self.artist,
            &mut self.album,
            &mut self.album_artist,
            &mut self.genre,
        ] {
            *field = field
                .take()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }
        self
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

fn fill<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if target.is_none() {
        target.clone_from(source);
    }
}
