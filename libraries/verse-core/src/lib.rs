//! Verse Core
//!
//! Platform-agnostic domain types, traits, and error handling shared by the
//! Verse library scanner crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackMetadata`, `ScanSettings`, `ScanResult`
//! - **Core Traits**: `CatalogStore`, `SettingsSource`
//! - **Error Handling**: Unified `VerseError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use verse_core::types::{AudioFormats, ScanSettings};
//! use std::path::Path;
//!
//! let settings = ScanSettings::default();
//! assert_eq!(settings.max_depth, 10);
//!
//! let formats = AudioFormats::default();
//! assert!(formats.matches(Path::new("/music/song.FLAC")));
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{CatalogStore, SettingsSource};
pub use error::{Result, VerseError};

pub use types::{
    AudioFormats, FileStat, LyricsSource, NewTrack, ScanFileError, ScanResult, ScanSettings,
    Track, TrackId, TrackMetadata, TrackPath, TrackUpdate,
};
