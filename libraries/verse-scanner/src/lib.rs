//! Verse Library Scanner
//!
//! Indexes a local music collection into the track catalog.
//!
//! # Features
//!
//! - Include/exclude folder rules with depth limits
//! - Metadata extraction through an ordered strategy cascade (container
//!   tags, sidecar descriptors, legacy ID3v1 trailers, path heuristics)
//! - Stat-based change detection (path + size + mtime)
//! - Lyrics presence and embedded artwork detection
//! - Reconciliation of the walk against persisted catalog rows
//!
//! # Architecture
//!
//! - `path_filter`: Include/exclude decisions for relative directories
//! - `scanner`: Depth-bounded directory walk
//! - `fingerprint`: Stat-derived change signal
//! - `metadata`: Extraction cascade
//! - `lyrics` / `artwork`: Per-file extras
//! - `reconcile`: Deletion sweep and per-file upsert
//! - `library_scanner`: Orchestration of a full scan
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use verse_core::ScanSettings;
//! use verse_scanner::LibraryScanner;
//!
//! # async fn example(catalog: Arc<dyn verse_core::CatalogStore>) -> verse_scanner::Result<()> {
//! let scanner = LibraryScanner::new(catalog, Arc::new(ScanSettings::default()));
//! let result = scanner.scan(Some(std::path::Path::new("/music"))).await?;
//! println!("{} new, {} deleted", result.new, result.deleted);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;

pub mod artwork;
pub mod fingerprint;
pub mod library_scanner;
pub mod lyrics;
pub mod metadata;
pub mod path_filter;
pub mod reconcile;
pub mod scanner;

pub use config::{ScannerConfig, DEFAULT_DELETE_BATCH_SIZE};
pub use error::ScanError;
pub use fingerprint::fingerprint;
pub use library_scanner::LibraryScanner;
pub use metadata::{Extraction, MetadataExtractor, MetadataStrategy};
pub use path_filter::{should_scan, PathFilter};
pub use scanner::{DirectoryWalker, WalkStats};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ScanError>;
