//! Lyrics presence check
//!
//! A track has lyrics if an `.lrc` file sits next to it, or, for MPEG files,
//! if its ID3v2 tag carries an unsynchronised lyrics frame. Other containers
//! are only checked for the sidecar.

use lofty::{FileType, ItemKey, Probe, TaggedFileExt};
use std::path::Path;
use tracing::debug;
use verse_core::LyricsSource;

const SIDECAR_EXTENSIONS: [&str; 2] = ["lrc", "LRC"];

/// Where a track's lyrics come from, if anywhere
pub fn detect_lyrics(path: &Path) -> Option<LyricsSource> {
    if has_sidecar_lyrics(path) {
        return Some(LyricsSource::Sidecar);
    }
    if has_embedded_lyrics(path) {
        return Some(LyricsSource::Embedded);
    }
    None
}

pub fn has_lyrics(path: &Path) -> bool {
    detect_lyrics(path).is_some()
}

fn has_sidecar_lyrics(path: &Path) -> bool {
    SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| path.with_extension(ext))
        .any(|candidate| candidate != path && candidate.is_file())
}

fn is_mpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "mp3" | "mp2" | "mp1" | "mpga"))
}

fn has_embedded_lyrics(path: &Path) -> bool {
    if !is_mpeg(path) {
        return false;
    }

    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(file) => file,
        Err(e) => {
            debug!("Skipping embedded lyrics check for {}: {}", path.display(), e);
            return false;
        }
    };

    if tagged_file.file_type() != FileType::Mpeg {
        return false;
    }

    tagged_file.tags().iter().any(|tag| {
        tag.get_string(&ItemKey::Lyrics)
            .is_some_and(|lyrics| !lyrics.trim().is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_lrc() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("01 - Song.flac");
        fs::write(&track, b"audio").unwrap();

        assert_eq!(detect_lyrics(&track), None);
        assert!(!has_lyrics(&track));

        fs::write(temp.path().join("01 - Song.lrc"), "[00:01.00]Hello").unwrap();

        assert_eq!(detect_lyrics(&track), Some(LyricsSource::Sidecar));
        assert!(has_lyrics(&track));
    }

    #[test]
    fn test_uppercase_sidecar() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("song.mp3");
        fs::write(&track, b"audio").unwrap();
        fs::write(temp.path().join("song.LRC"), "[00:01.00]Hello").unwrap();

        assert_eq!(detect_lyrics(&track), Some(LyricsSource::Sidecar));
    }

    #[test]
    fn test_other_stem_does_not_count() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("a.mp3");
        fs::write(&track, b"audio").unwrap();
        fs::write(temp.path().join("b.lrc"), "[00:01.00]Hello").unwrap();

        assert!(!has_lyrics(&track));
    }

    #[test]
    fn test_unreadable_mpeg_reports_none() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("broken.mp3");
        fs::write(&track, b"garbage").unwrap();

        assert_eq!(detect_lyrics(&track), None);
        assert_eq!(detect_lyrics(Path::new("/missing/file.mp3")), None);
    }

    #[test]
    fn test_is_mpeg() {
        assert!(is_mpeg(Path::new("a.MP3")));
        assert!(!is_mpeg(Path::new("a.flac")));
        assert!(!is_mpeg(Path::new("mp3")));
    }
}
