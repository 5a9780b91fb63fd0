//! Supported audio extensions
//!
//! The allow-list is a value, not a global, so callers can inject synthetic
//! formats (tests, embedded targets with fewer decoders).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Extensions recognised as audio by default (lower-case, no dot)
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "mp2", "mp1", "mpga", "flac", "wav", "wave", "aiff", "aif", "aifc", "aac", "m4a",
    "m4b", "m4p", "mp4", "alac", "ogg", "oga", "opus", "spx", "wma", "ape", "wv", "mpc", "tta",
    "tak", "dsf", "dff", "caf", "mka", "webm", "amr", "ac3", "au", "snd",
];

/// Audio extension allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioFormats {
    extensions: BTreeSet<String>,
}

impl Default for AudioFormats {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIO_EXTENSIONS.iter().copied())
    }
}

impl AudioFormats {
    /// Build an allow-list; entries are lower-cased and a leading dot is ignored
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Check if an extension (without dot, any case) is allowed
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(&extension.to_lowercase())
    }

    /// Check if a path has an allowed extension
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.contains(ext))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}
