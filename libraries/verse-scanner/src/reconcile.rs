//! Reconciliation of a walk against the catalog
//!
//! Runs in two passes. The deletion sweep removes rows for files that are
//! gone or out of scope, then every candidate is upserted: new files are
//! inserted, changed files are re-extracted, and unchanged files only get
//! their last-scanned time bumped.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::{debug, warn};
use verse_cache::ExtractionCache;
use verse_core::{
    CatalogStore, FileStat, LyricsSource, NewTrack, ScanResult, TrackId, TrackMetadata,
    TrackUpdate,
};

use crate::artwork::extract_embedded_artwork;
use crate::fingerprint::{fingerprint, stat_file};
use crate::lyrics::detect_lyrics;
use crate::metadata::MetadataExtractor;
use crate::path_filter::PathFilter;
use crate::scanner::in_scope;
use crate::{Result, ScanError};

/// What happened to one candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    New,
    Updated,
    Cached,
}

/// Shared state for per-file work
pub struct Reconciler {
    catalog: Arc<dyn CatalogStore>,
    extractor: Arc<MetadataExtractor>,
    cache: Option<ExtractionCache>,
    scanned_at: i64,
}

impl Reconciler {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        extractor: Arc<MetadataExtractor>,
        cache: Option<ExtractionCache>,
    ) -> Self {
        Self {
            catalog,
            extractor,
            cache,
            scanned_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Delete rows whose file is gone, out of scope, or not among `candidates`
    ///
    /// Deletes are issued `batch_size` ids at a time. Any catalog failure
    /// aborts the sweep, since a partial listing could delete live rows.
    pub async fn sweep_deleted(
        &self,
        root: &Path,
        filter: &PathFilter,
        candidates: &HashSet<PathBuf>,
        batch_size: usize,
    ) -> Result<u64> {
        let rows = self.catalog.list_paths().await?;

        // Rows are keyed by the exact string `reconcile_file` stores
        let candidates: HashSet<String> = candidates
            .iter()
            .filter_map(|path| path.to_str().map(str::to_string))
            .collect();

        let root = root.to_path_buf();
        let filter = filter.clone();
        let doomed: Vec<TrackId> = tokio::task::spawn_blocking(move || {
            rows.into_iter()
                .filter(|row| {
                    let path = Path::new(&row.file_path);
                    !candidates.contains(&row.file_path)
                        || !path.exists()
                        || !in_scope(&filter, &root, path)
                })
                .map(|row| row.id)
                .collect()
        })
        .await?;

        if doomed.is_empty() {
            return Ok(0);
        }

        debug!("Deleting {} stale tracks", doomed.len());

        let mut deleted = 0;
        for batch in doomed.chunks(batch_size.max(1)) {
            deleted += self.catalog.delete_many(batch).await?;
        }

        Ok(deleted)
    }

    /// Upsert every candidate with at most `workers` files in flight
    ///
    /// Per-file failures are recorded in `result.errors`; the batch always
    /// runs to completion.
    pub async fn upsert_all(
        self: &Arc<Self>,
        candidates: HashSet<PathBuf>,
        workers: usize,
        result: &mut ScanResult,
    ) {
        let semaphore = Arc::new(Semaphore::new(workers.max(1)));
        let mut tasks = JoinSet::new();
        let mut task_paths: HashMap<task::Id, PathBuf> = HashMap::new();

        for path in candidates {
            let reconciler = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            let task_path = path.clone();

            let handle = tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => reconciler.reconcile_file(&path).await,
                    Err(e) => Err(ScanError::Io(std::io::Error::other(e))),
                };
                (path, outcome)
            });
            task_paths.insert(handle.id(), task_path);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (_, Ok(outcome)))) => {
                    result.processed += 1;
                    match outcome {
                        FileOutcome::New => result.new += 1,
                        FileOutcome::Updated => result.updated += 1,
                        FileOutcome::Cached => result.cached += 1,
                    }
                }
                Ok((_, (path, Err(e)))) => {
                    warn!("Failed to process file {}: {}", path.display(), e);
                    result.record_error(path.to_string_lossy(), &e);
                }
                Err(e) => {
                    let file = task_paths
                        .get(&e.id())
                        .map(|path| path.to_string_lossy().to_string())
                        .unwrap_or_default();
                    warn!("File task failed for {}: {}", file, e);
                    result.record_error(file, &e);
                }
            }
        }
    }

    /// Bring one file's row up to date
    ///
    /// Paths that are not valid UTF-8 are refused, since the catalog keys
    /// rows by path string.
    pub async fn reconcile_file(&self, path: &Path) -> Result<FileOutcome> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ScanError::NonUtf8Path(path.to_path_buf()))?
            .to_string();
        let existing = self.catalog.find_by_path(&path_str).await?;

        let stat_path = path.to_path_buf();
        let stat = tokio::task::spawn_blocking(move || stat_file(&stat_path)).await??;
        let current = fingerprint(path, &stat);

        if let Some(track) = &existing {
            if track.fingerprint == current {
                self.catalog.touch_scanned(track.id, self.scanned_at).await?;
                return Ok(FileOutcome::Cached);
            }
        }

        let analysis = self.analyze(path, stat).await?;
        let new_track = build_track(path_str, path, &stat, current, analysis, self.scanned_at);

        match existing {
            Some(track) => {
                self.catalog
                    .update(track.id, TrackUpdate::from(new_track))
                    .await?;
                Ok(FileOutcome::Updated)
            }
            None => {
                self.catalog.insert(new_track).await?;
                Ok(FileOutcome::New)
            }
        }
    }

    async fn analyze(&self, path: &Path, stat: FileStat) -> Result<Analysis> {
        let path = path.to_path_buf();
        let extractor = Arc::clone(&self.extractor);
        let cache = self.cache.clone();

        let analysis =
            tokio::task::spawn_blocking(move || analyze_file(&path, &stat, &extractor, cache.as_ref()))
                .await?;

        Ok(analysis)
    }
}

/// Everything learned from reading one file
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub metadata: TrackMetadata,
    pub lyrics: Option<LyricsSource>,
    pub artwork_path: Option<String>,
}

/// Metadata (through the cache), lyrics, and artwork for one file
pub fn analyze_file(
    path: &Path,
    stat: &FileStat,
    extractor: &MetadataExtractor,
    cache: Option<&ExtractionCache>,
) -> Analysis {
    let metadata = match cache.and_then(|c| c.get_metadata(path, stat)) {
        Some(metadata) => metadata,
        None => {
            let metadata = extractor.extract(path);
            if let Some(cache) = cache {
                cache.put_metadata(path, stat, &metadata);
            }
            metadata
        }
    };

    let artwork_path = cache.and_then(|cache| {
        let data = extract_embedded_artwork(path)?;
        let hash = cache.put_artwork(&data)?;
        Some(cache.artwork_path(&hash).to_string_lossy().to_string())
    });

    Analysis {
        metadata,
        lyrics: detect_lyrics(path),
        artwork_path,
    }
}

fn build_track(
    file_path: String,
    path: &Path,
    stat: &FileStat,
    fingerprint: String,
    analysis: Analysis,
    scanned_at: i64,
) -> NewTrack {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let Analysis {
        metadata,
        lyrics,
        artwork_path,
    } = analysis;

    let title = metadata.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.clone())
    });

    NewTrack {
        file_path,
        filename,
        title,
        artist: metadata.artist,
        album: metadata.album,
        album_artist: metadata.album_artist,
        genre: metadata.genre,
        year: metadata.year,
        track_number: metadata.track_number.and_then(|n| i32::try_from(n).ok()),
        duration_seconds: metadata.duration_seconds,
        file_size: i64::try_from(stat.size).unwrap_or(i64::MAX),
        fingerprint,
        has_lyrics: lyrics.is_some(),
        lyrics_source: lyrics.map(|source| source.as_str().to_string()),
        artwork_path,
        last_scanned_at: scanned_at,
    }
}
