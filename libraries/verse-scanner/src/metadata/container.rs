//! Native container tags via lofty

use lofty::{Accessor, AudioFile, ItemKey, Probe, TaggedFileExt};
use std::path::Path;
use tracing::debug;
use verse_core::TrackMetadata;

use super::{Extraction, MetadataStrategy};

/// Tags read by the container's own parser (ID3v2, Vorbis comments, MP4
/// atoms, APE, RIFF INFO, ...)
///
/// When this identifies a track its fields are authoritative; later
/// strategies are never consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerTags;

impl MetadataStrategy for ContainerTags {
    fn name(&self) -> &'static str {
        "container"
    }

    fn extract(&self, path: &Path) -> Extraction {
        let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
            Ok(file) => file,
            Err(e) => {
                debug!("No container tags in {}: {}", path.display(), e);
                return Extraction::Empty;
            }
        };

        let Some(tag) = tagged_file.primary_tag().or(tagged_file.first_tag()) else {
            return Extraction::Empty;
        };

        let metadata = TrackMetadata {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            album_artist: tag.get_string(&ItemKey::AlbumArtist).map(|s| s.to_string()),
            genre: tag.genre().map(|s| s.to_string()),
            year: tag.year().and_then(|y| i32::try_from(y).ok()),
            track_number: tag.track(),
            duration_seconds: duration_of(&tagged_file.properties().duration()),
        }
        .normalized();

        if metadata.is_identified() {
            Extraction::Found(metadata)
        } else {
            Extraction::Empty
        }
    }
}

fn duration_of(duration: &std::time::Duration) -> Option<f64> {
    let secs = duration.as_secs_f64();
    (secs > 0.0).then_some(secs)
}

/// Duration from container properties, if the file can be parsed
pub fn read_duration(path: &Path) -> Option<f64> {
    let tagged_file = Probe::open(path).and_then(|probe| probe.read()).ok()?;
    duration_of(&tagged_file.properties().duration())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unparseable_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.mp3");
        fs::write(&path, b"not really audio").unwrap();

        assert_eq!(ContainerTags.extract(&path), Extraction::Empty);
        assert_eq!(read_duration(&path), None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        assert_eq!(
            ContainerTags.extract(Path::new("/definitely/missing.flac")),
            Extraction::Empty
        );
    }
}
