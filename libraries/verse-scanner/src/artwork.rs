//! Embedded cover art

use lofty::{PictureType, Probe, TaggedFileExt};
use std::path::Path;
use tracing::debug;

/// Pictures above this size are ignored
pub const MAX_ARTWORK_BYTES: usize = 5 * 1024 * 1024;

/// Front cover (or the first picture) from the file's tags
pub fn extract_embedded_artwork(path: &Path) -> Option<Vec<u8>> {
    let tagged_file = Probe::open(path).and_then(|probe| probe.read()).ok()?;
    let tag = tagged_file.primary_tag().or(tagged_file.first_tag())?;

    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())?;

    let data = picture.data();
    if data.is_empty() {
        return None;
    }
    if data.len() > MAX_ARTWORK_BYTES {
        debug!(
            "Ignoring {} byte artwork in {}",
            data.len(),
            path.display()
        );
        return None;
    }

    Some(data.to_vec())
}
