//! Filesystem-backed extraction cache

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};
use verse_core::{FileStat, TrackMetadata};

use crate::artwork::make_thumbnail;
use crate::error::{CacheError, Result};
use crate::types::{CacheCategory, CacheStats, ClearScope};
use crate::content_hash;

/// How long a cached scan result stays valid unless configured otherwise
pub const DEFAULT_SCAN_RESULTS_TTL: Duration = Duration::from_secs(60 * 60);

const KEY_PREFIX_LEN: usize = 16;

static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize)]
struct MetadataEntry {
    metadata: TrackMetadata,
    size: u64,
    mtime_nanos: u128,
    cached_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScanResultsEntry<T> {
    key: String,
    cached_at: i64,
    results: T,
}

/// Extraction cache rooted at a directory
///
/// Cheap to clone; every method is synchronous and blocking, so async callers
/// should invoke it from blocking tasks.
#[derive(Debug, Clone)]
pub struct ExtractionCache {
    root: PathBuf,
    scan_results_ttl: Duration,
}

impl ExtractionCache {
    /// Create a cache at `root`; directories are created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scan_results_ttl: DEFAULT_SCAN_RESULTS_TTL,
        }
    }

    #[must_use]
    pub fn with_scan_results_ttl(mut self, ttl: Duration) -> Self {
        self.scan_results_ttl = ttl;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn category_dir(&self, category: CacheCategory) -> PathBuf {
        self.root.join(category.dir_name())
    }

    // ---- metadata ----------------------------------------------------------

    fn metadata_file(&self, path: &Path, stat: &FileStat) -> PathBuf {
        let path_hash = content_hash(path.to_string_lossy().as_bytes());
        let stat_hash = content_hash(format!("{}:{}", stat.size, stat.mtime_nanos).as_bytes());

        self.category_dir(CacheCategory::Metadata).join(format!(
            "{}_{}.json",
            &path_hash[..KEY_PREFIX_LEN],
            &stat_hash[..KEY_PREFIX_LEN]
        ))
    }

    /// Cached metadata for a file, if it was stored with the same size and mtime
    pub fn get_metadata(&self, path: &Path, stat: &FileStat) -> Option<TrackMetadata> {
        let file = self.metadata_file(path, stat);

        let entry: Result<MetadataEntry> = read_json(&file).and_then(|entry: MetadataEntry| {
            // Keys are truncated hashes, so confirm the stat really matches
            if entry.size == stat.size && entry.mtime_nanos == stat.mtime_nanos {
                Ok(entry)
            } else {
                Err(CacheError::Stale)
            }
        });

        match entry {
            Ok(entry) => Some(entry.metadata),
            Err(e) => {
                log_miss(&file, &e);
                None
            }
        }
    }

    pub fn put_metadata(&self, path: &Path, stat: &FileStat, metadata: &TrackMetadata) {
        let entry = MetadataEntry {
            metadata: metadata.clone(),
            size: stat.size,
            mtime_nanos: stat.mtime_nanos,
            cached_at: chrono::Utc::now().timestamp(),
        };

        let file = self.metadata_file(path, stat);
        if let Err(e) = write_json(&file, &entry) {
            warn!("Failed to cache metadata for {}: {}", path.display(), e);
        }
    }

    // ---- artwork -----------------------------------------------------------

    /// On-disk location of a stored artwork image
    pub fn artwork_path(&self, hash: &str) -> PathBuf {
        self.category_dir(CacheCategory::Artwork)
            .join(format!("{hash}.jpg"))
    }

    /// Stored thumbnail bytes for a content hash
    pub fn get_artwork(&self, hash: &str) -> Option<Vec<u8>> {
        let file = self.artwork_path(hash);
        match fs::read(&file) {
            Ok(data) => Some(data),
            Err(e) => {
                log_miss(&file, &CacheError::Io(e));
                None
            }
        }
    }

    /// Store artwork and return its content hash
    ///
    /// The hash is taken over the original bytes, so identical covers shared
    /// by a whole album are stored once. Images that fail to decode are
    /// stored as-is.
    pub fn put_artwork(&self, data: &[u8]) -> Option<String> {
        let hash = content_hash(data);
        let file = self.artwork_path(&hash);

        if file.is_file() {
            return Some(hash);
        }

        let bytes = match make_thumbnail(data) {
            Ok(thumbnail) => thumbnail,
            Err(e) => {
                debug!("Storing artwork {} unresized: {}", &hash[..KEY_PREFIX_LEN], e);
                data.to_vec()
            }
        };

        match write_bytes(&file, &bytes) {
            Ok(()) => Some(hash),
            Err(e) => {
                warn!("Failed to cache artwork: {}", e);
                None
            }
        }
    }

    // ---- whole-scan results ------------------------------------------------

    fn scan_results_file(&self, key: &str) -> PathBuf {
        let hash = content_hash(key.as_bytes());
        self.category_dir(CacheCategory::Temp)
            .join(format!("scan_{}.json", &hash[..KEY_PREFIX_LEN]))
    }

    /// Cached scan results for `key`, if written within the TTL
    pub fn get_scan_results<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let file = self.scan_results_file(key);
        let ttl = i64::try_from(self.scan_results_ttl.as_secs()).unwrap_or(i64::MAX);

        let entry = read_json::<ScanResultsEntry<T>>(&file).and_then(|entry| {
            let age = chrono::Utc::now().timestamp() - entry.cached_at;
            if entry.key == key && age < ttl {
                Ok(entry)
            } else {
                Err(CacheError::Stale)
            }
        });

        match entry {
            Ok(entry) => Some(entry.results),
            Err(e) => {
                log_miss(&file, &e);
                None
            }
        }
    }

    pub fn put_scan_results<T: Serialize>(&self, key: &str, results: &T) {
        let entry = ScanResultsEntry {
            key: key.to_string(),
            cached_at: chrono::Utc::now().timestamp(),
            results,
        };

        let file = self.scan_results_file(key);
        if let Err(e) = write_json(&file, &entry) {
            warn!("Failed to cache scan results: {}", e);
        }
    }

    // ---- config ------------------------------------------------------------

    fn config_file(&self, name: &str) -> PathBuf {
        let safe: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.category_dir(CacheCategory::Config)
            .join(format!("{safe}.json"))
    }

    pub fn get_config(&self, name: &str) -> Option<serde_json::Value> {
        let file = self.config_file(name);
        match read_json(&file) {
            Ok(value) => Some(value),
            Err(e) => {
                log_miss(&file, &e);
                None
            }
        }
    }

    pub fn put_config(&self, name: &str, value: &serde_json::Value) {
        if let Err(e) = write_json(&self.config_file(name), value) {
            warn!("Failed to write cache config '{}': {}", name, e);
        }
    }

    // ---- maintenance -------------------------------------------------------

    /// Entry counts and sizes per category
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();

        for category in CacheCategory::ALL {
            let Ok(entries) = fs::read_dir(self.category_dir(category)) else {
                continue;
            };

            let slot = stats.category_mut(category);
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_file() {
                        slot.count += 1;
                        slot.total_bytes += metadata.len();
                    }
                }
            }
        }

        stats
    }

    /// Remove a category (or everything); returns `false` if anything failed
    pub fn clear(&self, scope: impl Into<ClearScope>) -> bool {
        let categories: Vec<CacheCategory> = match scope.into() {
            ClearScope::All => CacheCategory::ALL.to_vec(),
            ClearScope::Only(category) => vec![category],
        };

        let mut ok = true;
        for category in categories {
            let dir = self.category_dir(category);
            match fs::remove_dir_all(&dir) {
                Ok(()) => debug!("Cleared cache category {}", category),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Failed to clear {}: {}", dir.display(), e);
                    ok = false;
                }
            }
        }

        ok
    }

    /// Delete temp entries at least `max_age` old; returns how many were removed
    pub fn cleanup_temp(&self, max_age: Duration) -> usize {
        remove_older_than(&self.category_dir(CacheCategory::Temp), max_age)
    }

    /// Delete metadata entries not rewritten within `max_age`
    ///
    /// Entries become orphans whenever a file's size or mtime changes, since
    /// the new snapshot is written under a new key.
    pub fn prune_orphans(&self, max_age: Duration) -> usize {
        remove_older_than(&self.category_dir(CacheCategory::Metadata), max_age)
    }
}

fn log_miss(file: &Path, e: &CacheError) {
    match e {
        CacheError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {}
        _ => debug!("Cache miss for {}: {}", file.display(), e),
    }
}

fn read_json<T: DeserializeOwned>(file: &Path) -> Result<T> {
    let data = fs::read(file)?;
    Ok(serde_json::from_slice(&data)?)
}

fn write_json<T: Serialize + ?Sized>(file: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec(value)?;
    write_bytes(file, &data)
}

/// Write through a temp file so readers never see a partial entry
fn write_bytes(file: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }

    let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = file.with_extension(format!("{}.{seq}.partial", std::process::id()));
    fs::write(&tmp, data)?;
    fs::rename(&tmp, file)?;
    Ok(())
}

fn remove_older_than(dir: &Path, max_age: Duration) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or(Duration::ZERO);

        if age >= max_age {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => debug!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }

    removed
}
