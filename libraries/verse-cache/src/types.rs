//! Cache categories and statistics

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four cache subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheCategory {
    Metadata,
    Artwork,
    Config,
    Temp,
}

impl CacheCategory {
    pub const ALL: [CacheCategory; 4] = [
        CacheCategory::Metadata,
        CacheCategory::Artwork,
        CacheCategory::Config,
        CacheCategory::Temp,
    ];

    /// Directory name under the cache root
    pub fn dir_name(self) -> &'static str {
        match self {
            CacheCategory::Metadata => "metadata",
            CacheCategory::Artwork => "artwork",
            CacheCategory::Config => "config",
            CacheCategory::Temp => "temp",
        }
    }

    /// Parse from a directory name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.dir_name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// What [`crate::ExtractionCache::clear`] removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    All,
    Only(CacheCategory),
}

impl From<CacheCategory> for ClearScope {
    fn from(category: CacheCategory) -> Self {
        ClearScope::Only(category)
    }
}

/// Entry count and size of one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub count: u64,
    pub total_bytes: u64,
}

/// Statistics for the whole cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub metadata: CategoryStats,
    pub artwork: CategoryStats,
    pub config: CategoryStats,
    pub temp: CategoryStats,
}

impl CacheStats {
    pub fn category(&self, category: CacheCategory) -> CategoryStats {
        match category {
            CacheCategory::Metadata => self.metadata,
            CacheCategory::Artwork => self.artwork,
            CacheCategory::Config => self.config,
            CacheCategory::Temp => self.temp,
        }
    }

    pub(crate) fn category_mut(&mut self, category: CacheCategory) -> &mut CategoryStats {
        match category {
            CacheCategory::Metadata => &mut self.metadata,
            CacheCategory::Artwork => &mut self.artwork,
            CacheCategory::Config => &mut self.config,
            CacheCategory::Temp => &mut self.temp,
        }
    }

    /// Totals across every category
    pub fn total(&self) -> CategoryStats {
        CacheCategory::ALL
            .into_iter()
            .map(|c| self.category(c))
            .fold(CategoryStats::default(), |acc, s| CategoryStats {
                count: acc.count + s.count,
                total_bytes: acc.total_bytes + s.total_bytes,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(CacheCategory::from_str("artwork"), Some(CacheCategory::Artwork));
        assert_eq!(CacheCategory::from_str("TEMP"), Some(CacheCategory::Temp));
        assert_eq!(CacheCategory::from_str("thumbnails"), None);
    }

    #[test]
    fn test_total_sums_categories() {
        let stats = CacheStats {
            metadata: CategoryStats { count: 2, total_bytes: 100 },
            artwork: CategoryStats { count: 1, total_bytes: 5000 },
            config: CategoryStats::default(),
            temp: CategoryStats { count: 3, total_bytes: 30 },
        };

        assert_eq!(stats.total(), CategoryStats { count: 6, total_bytes: 5130 });
    }
}
