//! Error types for the cache
//!
//! These never cross the public API: [`crate::ExtractionCache`] logs them and
//! degrades to a miss.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cache entry is stale")]
    Stale,
}

pub type Result<T> = std::result::Result<T, CacheError>;
