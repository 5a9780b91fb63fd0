//! Filesystem stat snapshot used for change detection

use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::time::UNIX_EPOCH;

/// Size and modification time of a file
///
/// Two files with the same path, size and mtime are indistinguishable to the
/// scanner; no content is ever hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileStat {
    pub size: u64,
    /// Modification time in nanoseconds since the Unix epoch
    pub mtime_nanos: u128,
}

impl FileStat {
    pub fn new(size: u64, mtime_nanos: u128) -> Self {
        Self { size, mtime_nanos }
    }

    /// Build from filesystem metadata
    ///
    /// Platforms without modification times (or times before the epoch)
    /// report an mtime of zero.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let mtime_nanos = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        Self {
            size: metadata.len(),
            mtime_nanos,
        }
    }

    /// Modification time in whole seconds
    pub fn mtime_secs(&self) -> i64 {
        (self.mtime_nanos / 1_000_000_000) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_metadata_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 42]).unwrap();
        drop(file);

        let stat = FileStat::from_metadata(&std::fs::metadata(&path).unwrap());
        assert_eq!(stat.size, 42);
        assert!(stat.mtime_nanos > 0);
    }

    #[test]
    fn test_mtime_secs() {
        let stat = FileStat::new(1, 1_700_000_000_123_456_789);
        assert_eq!(stat.mtime_secs(), 1_700_000_000);
    }
}
