//! Settings storage
//!
//! Settings are stored as key-value pairs with JSON-serialized values. The scan
//! settings document is read leniently: a missing or malformed document never
//! fails a scan.
//!
//! # Example
//!
//! ```rust,no_run
//! use verse_storage::settings;
//! use verse_core::ScanSettings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! let mut scan = ScanSettings::default();
//! scan.exclude_folders.push("Podcasts".to_string());
//! settings::set_scan_settings(pool, &scan).await?;
//!
//! let loaded = settings::get_scan_settings(pool).await?;
//! assert_eq!(loaded, scan);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use verse_core::ScanSettings;

use crate::error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Scan settings document (max depth, include/exclude folders)
pub const SETTING_SCAN: &str = "scan.settings";

/// Setting entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    /// Setting key
    pub key: String,
    /// Setting value (JSON)
    pub value: serde_json::Value,
}

/// Get a single setting value
///
/// Returns `Ok(None)` if the key is not set.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.try_get("value")?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Set a setting value (upsert)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let value_str = serde_json::to_string(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value_str)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get all settings
pub async fn get_all_settings(pool: &SqlitePool) -> Result<Vec<Setting>> {
    let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| {
            let raw: String = row.try_get("value")?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            Ok(Setting {
                key: row.try_get("key")?,
                value,
            })
        })
        .collect()
}

/// Delete a setting
///
/// Returns `Ok(true)` if a setting was deleted.
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load scan settings, falling back to defaults
///
/// A stored value that is not valid JSON (written by hand or by an older
/// client) yields the defaults with a warning; a valid document with bad
/// fields is repaired field by field. Only database failures are errors.
pub async fn get_scan_settings(pool: &SqlitePool) -> Result<ScanSettings> {
    match get_setting(pool, SETTING_SCAN).await {
        Ok(Some(value)) => Ok(ScanSettings::from_json_lenient(&value)),
        Ok(None) => Ok(ScanSettings::default()),
        Err(StorageError::SerializationError(e)) => {
            tracing::warn!("Malformed scan settings, using defaults: {}", e);
            Ok(ScanSettings::default())
        }
        Err(e) => Err(e),
    }
}

/// Store scan settings
pub async fn set_scan_settings(pool: &SqlitePool, settings: &ScanSettings) -> Result<()> {
    let value = serde_json::to_value(settings)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    set_setting(pool, SETTING_SCAN, &value).await
}
