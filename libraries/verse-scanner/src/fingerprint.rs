//! Stat-based change detection
//!
//! A fingerprint is a digest of the path, size and modification time. No
//! file content is read, which keeps rescans of large libraries cheap but
//! means a rewrite that preserves both size and mtime goes unnoticed.

use sha2::{Digest, Sha256};
use std::path::Path;
use verse_core::FileStat;

/// Hex digest identifying a file version
pub fn fingerprint(path: &Path, stat: &FileStat) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update([0u8]);
    hasher.update(stat.size.to_le_bytes());
    hasher.update(stat.mtime_nanos.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// Stat a file (follows symlinks)
pub fn stat_file(path: &Path) -> std::io::Result<FileStat> {
    std::fs::metadata(path).map(|metadata| FileStat::from_metadata(&metadata))
}
