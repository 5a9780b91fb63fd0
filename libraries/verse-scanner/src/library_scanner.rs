//! Library scanner
//!
//! Walks a library root and synchronizes the catalog with it. Uses
//! path + size + mtime fingerprints for change detection.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use verse_cache::ExtractionCache;
use verse_core::{CatalogStore, ScanResult, ScanSettings, SettingsSource};

use crate::config::ScannerConfig;
use crate::metadata::MetadataExtractor;
use crate::path_filter::PathFilter;
use crate::reconcile::Reconciler;
use crate::scanner::DirectoryWalker;
use crate::{Result, ScanError};

/// Cache config document holding the most recent scan summary
pub const LAST_SCAN_CONFIG: &str = "last_scan";

/// Scanner for one catalog
///
/// Scans are serialized: a second `scan` call waits for the first to finish.
pub struct LibraryScanner {
    catalog: Arc<dyn CatalogStore>,
    settings: Arc<dyn SettingsSource>,
    extractor: Arc<MetadataExtractor>,
    cache: Option<ExtractionCache>,
    config: ScannerConfig,
    scan_lock: Mutex<()>,
}

impl LibraryScanner {
    /// Create a scanner with default configuration and no cache
    pub fn new(catalog: Arc<dyn CatalogStore>, settings: Arc<dyn SettingsSource>) -> Self {
        Self {
            catalog,
            settings,
            extractor: Arc::new(MetadataExtractor::new()),
            cache: None,
            config: ScannerConfig::default(),
            scan_lock: Mutex::new(()),
        }
    }

    /// Use an extraction cache for metadata, artwork and scan results
    pub fn with_cache(mut self, cache: ExtractionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the metadata strategy cascade
    pub fn with_extractor(mut self, extractor: MetadataExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&ExtractionCache> {
        self.cache.as_ref()
    }

    /// Scan `root` (or the configured default root) into the catalog
    ///
    /// Fails only if there is no usable root or the catalog cannot be listed
    /// or swept; per-file problems are reported in [`ScanResult::errors`].
    pub async fn scan(&self, root: Option<&Path>) -> Result<ScanResult> {
        let _guard = self.scan_lock.lock().await;
        let start_time = Instant::now();

        let root = self.resolve_root(root).await?;
        let settings = self.load_settings().await;

        let result_key = result_cache_key(&root, &settings);
        if self.config.cache_results {
            if let Some(cached) = self.cached_result(&result_key).await {
                info!("Using cached scan result for {}", root.display());
                return Ok(cached);
            }
        }

        info!(
            root = %root.display(),
            max_depth = settings.max_depth,
            includes = settings.include_folders.len(),
            excludes = settings.exclude_folders.len(),
            "Starting library scan"
        );

        let walker = DirectoryWalker::new()
            .with_formats(self.config.formats.clone())
            .follow_links(self.config.follow_links);
        let walk_root = root.clone();
        let walk_settings = settings.clone();
        let (candidates, walk_stats) =
            tokio::task::spawn_blocking(move || walker.walk(&walk_root, &walk_settings)).await?;

        debug!("Found {} candidate files", walk_stats.files);

        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.extractor),
            self.cache.clone(),
        ));

        let mut result = ScanResult::default();

        let filter = PathFilter::from_settings(&settings);
        result.deleted = reconciler
            .sweep_deleted(&root, &filter, &candidates, self.config.delete_batch_size)
            .await?;

        reconciler
            .upsert_all(candidates, self.config.workers, &mut result)
            .await;

        result.total_in_db = self.catalog.count().await?;

        self.record_summary(&root, &result_key, &result).await;

        info!(
            "Scan completed for {} in {:?}: {}",
            root.display(),
            start_time.elapsed(),
            result.summary_text()
        );

        Ok(result)
    }

    async fn resolve_root(&self, root: Option<&Path>) -> Result<PathBuf> {
        let root = root
            .map(Path::to_path_buf)
            .or_else(|| self.config.default_root.clone())
            .ok_or(ScanError::NoRoot)?;

        tokio::task::spawn_blocking(move || {
            let canonical = std::fs::canonicalize(&root).map_err(|source| {
                ScanError::RootInaccessible {
                    path: root.clone(),
                    source,
                }
            })?;

            std::fs::read_dir(&canonical).map_err(|source| ScanError::RootInaccessible {
                path: canonical.clone(),
                source,
            })?;

            Ok::<_, ScanError>(canonical)
        })
        .await?
    }

    async fn load_settings(&self) -> ScanSettings {
        match self.settings.scan_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load scan settings, using defaults: {}", e);
                ScanSettings::default()
            }
        }
    }

    async fn cached_result(&self, key: &str) -> Option<ScanResult> {
        let cache = self.cache.clone()?;
        let key = key.to_string();
        tokio::task::spawn_blocking(move || cache.get_scan_results::<ScanResult>(&key))
            .await
            .ok()
            .flatten()
    }

    async fn record_summary(&self, root: &Path, key: &str, result: &ScanResult) {
        let Some(cache) = self.cache.clone() else {
            return;
        };

        let summary = serde_json::json!({
            "root": root.to_string_lossy(),
            "scanned_at": chrono::Utc::now().timestamp(),
            "result": result,
        });
        let store_result = self.config.cache_results;
        let key = key.to_string();
        let result = result.clone();

        let written = tokio::task::spawn_blocking(move || {
            cache.put_config(LAST_SCAN_CONFIG, &summary);
            if store_result {
                cache.put_scan_results(&key, &result);
            }
        })
        .await;

        if let Err(e) = written {
            debug!("Failed to record scan summary: {}", e);
        }
    }
}

fn result_cache_key(root: &Path, settings: &ScanSettings) -> String {
    format!("{}|{}", root.display(), settings.cache_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_cache_key_tracks_settings() {
        let root = Path::new("/music");
        let a = result_cache_key(root, &ScanSettings::default());
        let b = result_cache_key(
            root,
            &ScanSettings {
                max_depth: 2,
                ..ScanSettings::default()
            },
        );

        assert_ne!(a, b);
        assert!(a.starts_with("/music|"));
    }
}
