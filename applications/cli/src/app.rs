//! Opened catalog and cache, shared by every subcommand

use anyhow::{bail, Context};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use verse_cache::{CacheCategory, CacheStats, ClearScope, ExtractionCache};
use verse_core::{ScanResult, ScanSettings};
use verse_scanner::LibraryScanner;
use verse_storage::SqliteCatalog;

use crate::config::AppConfig;

/// Changes requested by `verse settings set`
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub max_depth: Option<u32>,
    /// Replaces the include list when set
    pub include_folders: Option<Vec<String>>,
    /// Replaces the exclude list when set
    pub exclude_folders: Option<Vec<String>>,
}

impl SettingsUpdate {
    pub fn apply(self, mut settings: ScanSettings) -> ScanSettings {
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }
        if let Some(includes) = self.include_folders {
            settings.include_folders = includes;
        }
        if let Some(excludes) = self.exclude_folders {
            settings.exclude_folders = excludes;
        }
        settings
    }
}

/// Files removed by `verse cache cleanup`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub temp_removed: usize,
    pub metadata_removed: usize,
}

pub struct App {
    config: AppConfig,
    catalog: SqliteCatalog,
    cache: ExtractionCache,
}

impl App {
    /// Open (and migrate) the catalog database
    pub async fn open(config: AppConfig) -> anyhow::Result<Self> {
        let db_dir = database_file(&config.database_url)
            .and_then(|path| path.parent().map(Path::to_path_buf));
        if let Some(parent) = db_dir {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(&parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let pool = verse_storage::create_pool(&config.database_url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database_url))?;
        verse_storage::run_migrations(&pool).await?;

        tracing::debug!("Catalog opened at {}", config.database_url);

        Ok(Self {
            cache: config.cache(),
            catalog: SqliteCatalog::new(pool),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SqliteCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &ExtractionCache {
        &self.cache
    }

    /// Scanner over this catalog, reading settings from its settings table
    pub fn scanner(&self, use_cached_results: bool) -> LibraryScanner {
        let config = self.config.scanner_config();
        let config = if use_cached_results {
            config.cache_results(true)
        } else {
            config
        };

        LibraryScanner::new(Arc::new(self.catalog.clone()), Arc::new(self.catalog.clone()))
            .with_config(config)
            .with_cache(self.cache.clone())
    }

    pub async fn scan(
        &self,
        root: Option<&Path>,
        use_cached_results: bool,
    ) -> anyhow::Result<ScanResult> {
        let result = self.scanner(use_cached_results).scan(root).await?;
        Ok(result)
    }

    pub async fn scan_settings(&self) -> anyhow::Result<ScanSettings> {
        Ok(verse_storage::settings::get_scan_settings(self.catalog.pool()).await?)
    }

    /// Apply `update` to the stored settings and return the result
    pub async fn update_scan_settings(
        &self,
        update: SettingsUpdate,
    ) -> anyhow::Result<ScanSettings> {
        let settings = update.apply(self.scan_settings().await?);
        verse_storage::settings::set_scan_settings(self.catalog.pool(), &settings).await?;
        Ok(settings)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Clear one category by name, or everything when `category` is `None`
    pub fn clear_cache(&self, category: Option<&str>) -> anyhow::Result<bool> {
        let scope = match category {
            None => ClearScope::All,
            Some(name) => match CacheCategory::from_str(name) {
                Some(category) => ClearScope::Only(category),
                None => bail!(
                    "Unknown cache category '{}' (expected one of: {})",
                    name,
                    CacheCategory::ALL
                        .iter()
                        .map(|c| c.dir_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            },
        };

        Ok(self.cache.clear(scope))
    }

    /// Remove temp files and metadata entries older than `max_age`
    pub fn cleanup_cache(&self, max_age: Duration) -> CleanupReport {
        CleanupReport {
            temp_removed: self.cache.cleanup_temp(max_age),
            metadata_removed: self.cache.prune_orphans(max_age),
        }
    }
}

/// Filesystem path of a `sqlite:` URL, if it names a file
fn database_file(url: &str) -> Option<PathBuf> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path == ":memory:" {
        return None;
    }

    Some(PathBuf::from(path))
}
