//! Scanner configuration

use std::path::PathBuf;
use verse_core::AudioFormats;

/// Ids per delete statement during the deletion sweep
pub const DEFAULT_DELETE_BATCH_SIZE: usize = 100;

/// Process-level scanner options
///
/// User-facing options (depth, folders) live in [`verse_core::ScanSettings`]
/// and are reloaded on every scan; these are fixed for the scanner's lifetime.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Root used when `scan` is called without one
    pub default_root: Option<PathBuf>,

    /// Files analysed concurrently
    pub workers: usize,

    /// Extensions treated as audio
    pub formats: AudioFormats,

    /// Whether the walk follows symbolic links
    pub follow_links: bool,

    pub delete_batch_size: usize,

    /// Reuse a recent scan result for the same root and settings
    pub cache_results: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            default_root: None,
            workers: num_cpus::get().max(1),
            formats: AudioFormats::default(),
            follow_links: false,
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
            cache_results: false,
        }
    }
}

impl ScannerConfig {
    pub fn with_default_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.default_root = Some(root.into());
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_formats(mut self, formats: AudioFormats) -> Self {
        self.formats = formats;
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn with_delete_batch_size(mut self, size: usize) -> Self {
        self.delete_batch_size = size.max(1);
        self
    }

    pub fn cache_results(mut self, enabled: bool) -> Self {
        self.cache_results = enabled;
        self
    }
}
