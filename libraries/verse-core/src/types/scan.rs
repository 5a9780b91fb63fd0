//! Scan settings and scan result types

use serde::{Deserialize, Serialize};

/// Default directory depth limit
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// User-facing scan settings, loaded once per scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Maximum directory depth below the root (0 = unlimited)
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Relative folders to scan (empty = everything)
    #[serde(default)]
    pub include_folders: Vec<String>,

    /// Relative folders to skip
    #[serde(default)]
    pub exclude_folders: Vec<String>,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_folders: Vec::new(),
            exclude_folders: Vec::new(),
        }
    }
}

impl ScanSettings {
    /// Build settings from a loosely-typed JSON document.
    ///
    /// Each field falls back to its default on its own, so a malformed
    /// `max_depth` does not discard valid folder lists. Non-string entries in
    /// the folder lists are dropped.
    pub fn from_json_lenient(value: &serde_json::Value) -> Self {
        let defaults = Self::default();

        let max_depth = value
            .get("max_depth")
            .and_then(|v| {
                v.as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            })
            .and_then(|d| u32::try_from(d).ok())
            .unwrap_or(defaults.max_depth);

        Self {
            max_depth,
            include_folders: string_list(value.get("include_folders")),
            exclude_folders: string_list(value.get("exclude_folders")),
        }
    }

    /// Stable key describing these settings, used for result caching
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.max_depth,
            self.include_folders.join(","),
            self.exclude_folders.join(",")
        )
    }
}

fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Error recorded for a single file during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFileError {
    pub file: String,
    pub error: String,
}

/// Aggregate outcome of one scan run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Files handled without error
    pub processed: u64,
    /// Rows inserted
    pub new: u64,
    /// Rows re-extracted because the fingerprint changed
    pub updated: u64,
    /// Rows whose fingerprint was unchanged
    pub cached: u64,
    /// Rows removed by the deletion sweep
    pub deleted: u64,
    pub errors: Vec<ScanFileError>,
    /// Catalog size after the scan
    pub total_in_db: i64,
}

impl ScanResult {
    pub fn record_error(&mut self, file: impl Into<String>, error: impl std::fmt::Display) {
        self.errors.push(ScanFileError {
            file: file.into(),
            error: error.to_string(),
        });
    }

    pub fn summary_text(&self) -> String {
        format!(
            "Scan complete: {} processed ({} new, {} updated, {} cached), {} deleted, {} errors, {} in catalog",
            self.processed,
            self.new,
            self.updated,
            self.cached,
            self.deleted,
            self.errors.len(),
            self.total_in_db
        )
    }
}
