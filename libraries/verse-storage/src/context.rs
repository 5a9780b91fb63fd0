use crate::{settings, tracks};
use async_trait::async_trait;
use sqlx::SqlitePool;
use verse_core::{
    error::Result, CatalogStore, NewTrack, ScanSettings, SettingsSource, Track, TrackId,
    TrackPath, TrackUpdate,
};

/// `SQLite`-backed catalog
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_by_path(&self, file_path: &str) -> Result<Option<Track>> {
        tracks::find_by_path(&self.pool, file_path).await
    }

    async fn list_paths(&self) -> Result<Vec<TrackPath>> {
        tracks::list_paths(&self.pool).await
    }

    async fn delete_many(&self, ids: &[TrackId]) -> Result<u64> {
        tracks::delete_many(&self.pool, ids).await
    }

    async fn insert(&self, track: NewTrack) -> Result<Track> {
        tracks::create(&self.pool, track).await
    }

    async fn update(&self, id: TrackId, update: TrackUpdate) -> Result<()> {
        tracks::update(&self.pool, id, update).await
    }

    async fn touch_scanned(&self, id: TrackId, scanned_at: i64) -> Result<()> {
        tracks::touch_scanned(&self.pool, id, scanned_at).await
    }

    async fn count(&self) -> Result<i64> {
        tracks::count(&self.pool).await
    }
}

#[async_trait]
impl SettingsSource for SqliteCatalog {
    async fn scan_settings(&self) -> Result<ScanSettings> {
        settings::get_scan_settings(&self.pool)
            .await
            .map_err(Into::into)
    }
}
