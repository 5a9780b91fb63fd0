//! Verse Extraction Cache
//!
//! On-disk cache that absorbs redundant work across repeated library scans.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   metadata/   per-file metadata snapshots keyed by path + size + mtime
//!   artwork/    content-addressed JPEG thumbnails
//!   config/     small JSON documents (last scan summary, ...)
//!   temp/       TTL'd whole-scan results
//! ```
//!
//! The cache is never a correctness dependency: every read failure is a miss
//! and every write failure is logged and ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! use verse_cache::ExtractionCache;
//! use verse_core::{FileStat, TrackMetadata};
//! use std::path::Path;
//!
//! let cache = ExtractionCache::new("/tmp/verse-cache");
//! let path = Path::new("/music/song.flac");
//! let stat = FileStat::new(1024, 1_700_000_000_000_000_000);
//!
//! if cache.get_metadata(path, &stat).is_none() {
//!     let mut metadata = TrackMetadata::new();
//!     metadata.title = Some("Song".to_string());
//!     cache.put_metadata(path, &stat, &metadata);
//! }
//! ```

mod artwork;
mod error;
mod store;
mod types;

pub use artwork::{make_thumbnail, THUMBNAIL_MAX_DIMENSION};
pub use error::CacheError;
pub use store::{ExtractionCache, DEFAULT_SCAN_RESULTS_TTL};
pub use types::{CacheCategory, CacheStats, CategoryStats, ClearScope};

/// Hex SHA-256 of arbitrary bytes
pub fn content_hash(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    hex::encode(Sha256::digest(data))
}
