//! Error types for the scanner

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No library root given and no default root configured")]
    NoRoot,

    #[error("Library root {} is not accessible: {source}", path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] verse_core::VerseError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ScanError {
    /// Whether the scan was refused before touching the catalog
    pub fn is_root_error(&self) -> bool {
        matches!(self, ScanError::NoRoot | ScanError::RootInaccessible { .. })
    }
}
