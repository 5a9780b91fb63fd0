//! Integration tests for the command-line driver
//!
//! Each test gets its own database, cache and library folders.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use verse_cli::{App, AppConfig, SettingsUpdate};

struct Fixture {
    config: AppConfig,
    library: PathBuf,
    _dir: TempDir,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("music");
    fs::create_dir_all(&library).unwrap();

    let config = AppConfig {
        database_url: format!("sqlite://{}", dir.path().join("db/verse.db").display()),
        cache_dir: dir.path().join("cache"),
        library_root: Some(library.clone()),
        workers: Some(2),
        ..AppConfig::default()
    };

    Fixture {
        config,
        library,
        _dir: dir,
    }
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("verse.toml");
    fs::write(
        &path,
        r#"
database_url = "sqlite:///srv/verse/catalog.db"
cache_dir = "/srv/verse/cache"
library_root = "/srv/music"
workers = 8
formats = ["mp3", "flac"]
cache_results = true
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(Some(&path)).unwrap();

    assert_eq!(config.database_url, "sqlite:///srv/verse/catalog.db");
    assert_eq!(config.cache_dir, PathBuf::from("/srv/verse/cache"));
    assert_eq!(config.library_root, Some(PathBuf::from("/srv/music")));
    assert_eq!(config.workers, Some(8));
    assert!(config.cache_results);
    assert!(!config.follow_links);
    assert_eq!(config.results_ttl_secs, 3600);

    let scanner = config.scanner_config();
    assert_eq!(scanner.workers, 8);
    assert_eq!(scanner.formats.len(), 2);
    assert_eq!(scanner.default_root, Some(PathBuf::from("/srv/music")));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AppConfig::load_from(Some(&dir.path().join("nope.toml"))).is_err());
}

#[tokio::test]
async fn test_open_creates_database_directory() {
    let fixture = fixture();
    let app = App::open(fixture.config.clone()).await.unwrap();

    let db_dir = fixture.config.cache_dir.parent().unwrap().join("db");
    assert!(db_dir.join("verse.db").is_file());
    assert_eq!(app.config(), &fixture.config);
}

#[tokio::test]
async fn test_scan_uses_configured_root() {
    let fixture = fixture();
    fs::write(fixture.library.join("01 - Intro.mp3"), b"junk").unwrap();
    fs::write(fixture.library.join("cover.jpg"), b"junk").unwrap();

    let app = App::open(fixture.config.clone()).await.unwrap();

    let first = app.scan(None, false).await.unwrap();
    assert_eq!(first.new, 1);
    assert_eq!(first.total_in_db, 1);

    let second = app.scan(None, false).await.unwrap();
    assert_eq!(second.cached, 1);

    let stats = app.cache_stats();
    assert_eq!(stats.config.count, 1);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let fixture = fixture();
    let app = App::open(fixture.config.clone()).await.unwrap();

    let defaults = app.scan_settings().await.unwrap();
    assert_eq!(defaults.max_depth, 10);

    let updated = app
        .update_scan_settings(SettingsUpdate {
            max_depth: Some(2),
            exclude_folders: Some(vec!["Podcasts".to_string()]),
            ..SettingsUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(app.scan_settings().await.unwrap(), updated);
    assert_eq!(updated.max_depth, 2);
    assert_eq!(updated.exclude_folders, vec!["Podcasts".to_string()]);
}

#[tokio::test]
async fn test_settings_apply_to_next_scan() {
    let fixture = fixture();
    fs::create_dir_all(fixture.library.join("Podcasts")).unwrap();
    fs::write(fixture.library.join("Podcasts/ep1.mp3"), b"junk").unwrap();
    fs::write(fixture.library.join("song.mp3"), b"junk").unwrap();

    let app = App::open(fixture.config.clone()).await.unwrap();
    assert_eq!(app.scan(None, false).await.unwrap().total_in_db, 2);

    app.update_scan_settings(SettingsUpdate {
        exclude_folders: Some(vec!["Podcasts".to_string()]),
        ..SettingsUpdate::default()
    })
    .await
    .unwrap();

    let result = app.scan(None, false).await.unwrap();
    assert_eq!(result.deleted, 1);
    assert_eq!(result.total_in_db, 1);
}

#[tokio::test]
async fn test_cache_clear_and_cleanup() {
    let fixture = fixture();
    fs::write(fixture.library.join("a.mp3"), b"junk").unwrap();

    let app = App::open(fixture.config.clone()).await.unwrap();
    app.scan(None, true).await.unwrap();

    let stats = app.cache_stats();
    assert_eq!(stats.metadata.count, 1);
    assert_eq!(stats.temp.count, 1);

    let report = app.cleanup_cache(Duration::ZERO);
    assert_eq!(report.temp_removed, 1);
    assert_eq!(report.metadata_removed, 1);

    assert!(app.clear_cache(Some("CONFIG")).unwrap());
    assert_eq!(app.cache_stats().config.count, 0);

    assert!(app.clear_cache(Some("thumbnails")).is_err());
    assert!(app.clear_cache(None).unwrap());
    assert_eq!(app.cache_stats().total().count, 0);
}
