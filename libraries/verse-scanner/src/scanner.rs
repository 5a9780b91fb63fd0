//! Directory walk for audio files

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use verse_core::{AudioFormats, ScanSettings};
use walkdir::WalkDir;

use crate::path_filter::{relative_dir, PathFilter};

/// Counters from one walk
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories entered
    pub directories: u64,
    /// Directories pruned by the include/exclude rules
    pub filtered: u64,
    /// Entries that could not be read
    pub unreadable: u64,
    /// Audio files found
    pub files: u64,
}

/// Walker for audio files under a library root
#[derive(Debug, Clone, Default)]
pub struct DirectoryWalker {
    formats: AudioFormats,
    follow_links: bool,
}

impl DirectoryWalker {
    /// Create a walker with the default audio formats
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(mut self, formats: AudioFormats) -> Self {
        self.formats = formats;
        self
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Collect audio files under `root`
    ///
    /// The root is depth 0 and every directory level adds one. With a
    /// non-zero `max_depth`, directories at that depth are listed but not
    /// descended into. Directories failing the folder rules are pruned along
    /// with their subtrees; unreadable entries are skipped with a warning.
    pub fn walk(&self, root: &Path, settings: &ScanSettings) -> (HashSet<PathBuf>, WalkStats) {
        let filter = PathFilter::from_settings(settings);
        let mut stats = WalkStats::default();
        let mut files = HashSet::new();

        let mut walker = WalkDir::new(root).follow_links(self.follow_links);
        if settings.max_depth > 0 {
            // walkdir counts files as one level below their directory
            walker = walker.max_depth(settings.max_depth as usize + 1);
        }

        let mut filtered = 0u64;
        let entries = walker.into_iter().filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let keep = filter.should_scan_dir(root, entry.path());
            if !keep {
                filtered += 1;
            }
            keep
        });

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    stats.unreadable += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                stats.directories += 1;
                continue;
            }

            if file_type.is_file() && self.formats.matches(entry.path()) {
                stats.files += 1;
                files.insert(entry.into_path());
            }
        }

        stats.filtered = filtered;

        debug!(
            root = %root.display(),
            directories = stats.directories,
            filtered = stats.filtered,
            unreadable = stats.unreadable,
            files = stats.files,
            "Walk finished"
        );

        (files, stats)
    }
}

/// Walk with default formats and no symlink following
pub fn walk(root: &Path, settings: &ScanSettings) -> HashSet<PathBuf> {
    DirectoryWalker::new().walk(root, settings).0
}

/// Whether a file's folder is in scope under `filter`
pub(crate) fn in_scope(filter: &PathFilter, root: &Path, file: &Path) -> bool {
    file.parent()
        .and_then(|parent| relative_dir(root, parent))
        .map(|relative| filter.should_scan(&relative))
        .unwrap_or(false)
}
