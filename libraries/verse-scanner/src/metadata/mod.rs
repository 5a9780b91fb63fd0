//! Metadata extraction cascade
//!
//! Extraction runs an ordered list of strategies and stops at the first one
//! that identifies the track (a usable title or artist). When none does, the
//! directory/filename heuristic supplies whatever it can. Extraction never
//! fails; the worst case is a record holding only a filename-derived title.

use std::path::Path;
use tracing::debug;
use verse_core::TrackMetadata;

mod container;
mod heuristic;
mod legacy;
mod sidecar;

pub use container::{read_duration, ContainerTags};
pub use heuristic::{album_from_dir_name, is_disc_dir, split_track_title, PathHeuristic};
pub use legacy::{parse_id3v1, LegacyTags, ID3V1_GENRES};
pub use sidecar::{parse_descriptor, SidecarDescriptor};

/// Outcome of one strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found(TrackMetadata),
    Empty,
}

impl From<Option<TrackMetadata>> for Extraction {
    fn from(metadata: Option<TrackMetadata>) -> Self {
        metadata.map_or(Extraction::Empty, Extraction::Found)
    }
}

/// One source of track metadata
pub trait MetadataStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Try to read metadata for `path`
    ///
    /// Implementations must not panic on unreadable or malformed input;
    /// anything unusable is `Extraction::Empty`.
    fn extract(&self, path: &Path) -> Extraction;
}

/// Ordered strategy cascade
pub struct MetadataExtractor {
    strategies: Vec<Box<dyn MetadataStrategy>>,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(ContainerTags),
            Box::new(SidecarDescriptor::default()),
            Box::new(LegacyTags),
        ])
    }
}

impl std::fmt::Debug for MetadataExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

impl MetadataExtractor {
    /// Container tags, then sidecar descriptors, then ID3v1 trailers
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategies(strategies: Vec<Box<dyn MetadataStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extract metadata for one file
    pub fn extract(&self, path: &Path) -> TrackMetadata {
        for strategy in &self.strategies {
            if let Extraction::Found(metadata) = strategy.extract(path) {
                let metadata = metadata.normalized();
                if metadata.is_identified() {
                    debug!(strategy = strategy.name(), "Metadata for {}", path.display());
                    return with_title_fallback(path, metadata);
                }
            }
        }

        debug!("No strategy identified {}, using path heuristic", path.display());

        let mut metadata = PathHeuristic::from_path(path);
        if metadata.duration_seconds.is_none() {
            metadata.duration_seconds = read_duration(path);
        }
        metadata
    }
}

/// Fill a missing title from the filename
fn with_title_fallback(path: &Path, mut metadata: TrackMetadata) -> TrackMetadata {
    if metadata.title.is_none() {
        metadata.title = PathHeuristic::from_path(path).title;
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        result: Extraction,
        calls: Arc<AtomicUsize>,
    }

    impl MetadataStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extract(&self, _path: &Path) -> Extraction {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn fixed(name: &'static str, result: Extraction) -> (Box<dyn MetadataStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Fixed {
                name,
                result,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    fn titled(title: &str) -> TrackMetadata {
        TrackMetadata {
            title: Some(title.to_string()),
            ..TrackMetadata::default()
        }
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            MetadataExtractor::new().strategy_names(),
            vec!["container", "sidecar", "id3v1"]
        );
    }

    #[test]
    fn test_first_identified_result_wins() {
        let (first, first_calls) = fixed("first", Extraction::Found(titled("Tag Title")));
        let (second, second_calls) = fixed("second", Extraction::Found(titled("Sidecar Title")));

        let extractor = MetadataExtractor::with_strategies(vec![first, second]);
        let metadata = extractor.extract(Path::new("/music/a.mp3"));

        assert_eq!(metadata.title.as_deref(), Some("Tag Title"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unidentified_results_fall_through() {
        let genre_only = TrackMetadata {
            genre: Some("Ambient".to_string()),
            ..TrackMetadata::default()
        };
        let (blank, _) = fixed("blank", Extraction::Found(titled("   ")));
        let (sparse, _) = fixed("sparse", Extraction::Found(genre_only));
        let (empty, _) = fixed("empty", Extraction::Empty);
        let (good, good_calls) = fixed("good", Extraction::Found(titled("Found")));

        let extractor = MetadataExtractor::with_strategies(vec![blank, sparse, empty, good]);
        let metadata = extractor.extract(Path::new("/music/a.mp3"));

        assert_eq!(metadata.title.as_deref(), Some("Found"));
        assert_eq!(good_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_artist_only_gets_filename_title() {
        let artist_only = TrackMetadata {
            artist: Some("Nina Simone".to_string()),
            ..TrackMetadata::default()
        };
        let (strategy, _) = fixed("artist", Extraction::Found(artist_only));

        let metadata = MetadataExtractor::with_strategies(vec![strategy])
            .extract(Path::new("/music/Pastel Blues/05 - Sinnerman.mp3"));

        assert_eq!(metadata.artist.as_deref(), Some("Nina Simone"));
        assert_eq!(metadata.title.as_deref(), Some("Sinnerman"));
        // The heuristic only back-fills the title here
        assert_eq!(metadata.album, None);
        assert_eq!(metadata.track_number, None);
    }

    #[test]
    fn test_no_strategies_uses_heuristic() {
        let metadata = MetadataExtractor::with_strategies(Vec::new())
            .extract(Path::new("/nonexistent/Album (2001)/Disc 2/03 - Song.flac"));

        assert_eq!(metadata.album.as_deref(), Some("Album"));
        assert_eq!(metadata.year, Some(2001));
        assert_eq!(metadata.track_number, Some(3));
        assert_eq!(metadata.title.as_deref(), Some("Song"));
        assert_eq!(metadata.artist, None);
        assert_eq!(metadata.duration_seconds, None);
    }
}
