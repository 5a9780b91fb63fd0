/// Command-line configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verse_cache::ExtractionCache;
use verse_core::AudioFormats;
use verse_scanner::ScannerConfig;

/// Default config file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "verse.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Root scanned when `verse scan` is given no path
    #[serde(default)]
    pub library_root: Option<PathBuf>,

    /// Concurrent files per scan (defaults to the CPU count)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Audio extensions to scan instead of the built-in list
    #[serde(default)]
    pub formats: Option<Vec<String>>,

    #[serde(default)]
    pub follow_links: bool,

    #[serde(default)]
    pub cache_results: bool,

    #[serde(default = "default_results_ttl_secs")]
    pub results_ttl_secs: u64,
}

impl AppConfig {
    /// Load configuration from `verse.toml` (if it exists) and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file and environment
    ///
    /// An explicit file must exist; without one, `verse.toml` in the working
    /// directory is used when present. `VERSE_`-prefixed variables override
    /// both, e.g. `VERSE_DATABASE_URL`.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("VERSE")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("formats"),
        );

        settings.build()?.try_deserialize()
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        let mut scanner = ScannerConfig::default()
            .follow_links(self.follow_links)
            .cache_results(self.cache_results);

        if let Some(root) = &self.library_root {
            scanner = scanner.with_default_root(root);
        }
        if let Some(workers) = self.workers {
            scanner = scanner.with_workers(workers);
        }
        if let Some(formats) = &self.formats {
            scanner = scanner.with_formats(AudioFormats::new(formats));
        }

        scanner
    }

    pub fn cache(&self) -> ExtractionCache {
        ExtractionCache::new(&self.cache_dir)
            .with_scan_results_ttl(Duration::from_secs(self.results_ttl_secs))
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./data/verse.db".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./data/cache")
}

fn default_results_ttl_secs() -> u64 {
    verse_cache::DEFAULT_SCAN_RESULTS_TTL.as_secs()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            cache_dir: default_cache_dir(),
            library_root: None,
            workers: None,
            formats: None,
            follow_links: false,
            cache_results: false,
            results_ttl_secs: default_results_ttl_secs(),
        }
    }
}
