//! Catalog and settings boundaries consumed by the scanner

use crate::error::Result;
use crate::types::{NewTrack, ScanSettings, Track, TrackId, TrackPath, TrackUpdate};
use async_trait::async_trait;

/// Persistent track catalog
///
/// This trait abstracts the relational store so the reconciliation engine can
/// run against `SQLite` in production and an in-memory map in tests.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Point lookup by exact file path
    async fn find_by_path(&self, file_path: &str) -> Result<Option<Track>>;

    /// Every row's id and path, for the deletion sweep
    async fn list_paths(&self) -> Result<Vec<TrackPath>>;

    /// Delete a batch of rows, returning how many were removed
    async fn delete_many(&self, ids: &[TrackId]) -> Result<u64>;

    /// Insert a new row
    async fn insert(&self, track: NewTrack) -> Result<Track>;

    /// Rewrite the scanned fields of an existing row
    async fn update(&self, id: TrackId, update: TrackUpdate) -> Result<()>;

    /// Update only the last-scanned timestamp (unix seconds)
    async fn touch_scanned(&self, id: TrackId, scanned_at: i64) -> Result<()>;

    /// Number of rows
    async fn count(&self) -> Result<i64>;
}

/// Source of per-scan settings
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Load the current scan settings
    async fn scan_settings(&self) -> Result<ScanSettings>;
}

/// Fixed settings, useful for one-off scans and tests
#[async_trait]
impl SettingsSource for ScanSettings {
    async fn scan_settings(&self) -> Result<ScanSettings> {
        Ok(self.clone())
    }
}
