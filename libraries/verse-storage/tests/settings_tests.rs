//! Integration tests for settings storage


use serde_json::json;
use test_helpers::TestDb;
use verse_core::{ScanSettings, SettingsSource};
use verse_storage::{settings, SqliteCatalog};

#[tokio::test]
async fn test_setting_round_trip_and_delete() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    assert!(settings::get_setting(pool, "ui.theme").await.unwrap().is_none());

    settings::set_setting(pool, "ui.theme", &json!("dark")).await.unwrap();
    settings::set_setting(pool, "ui.theme", &json!("light")).await.unwrap();

    assert_eq!(
        settings::get_setting(pool, "ui.theme").await.unwrap(),
        Some(json!("light"))
    );
    assert_eq!(settings::get_all_settings(pool).await.unwrap().len(), 1);

    assert!(settings::delete_setting(pool, "ui.theme").await.unwrap());
    assert!(!settings::delete_setting(pool, "ui.theme").await.unwrap());
}

#[tokio::test]
async fn test_scan_settings_default_when_missing() {
    let test_db = TestDb::new().await;

    let loaded = settings::get_scan_settings(test_db.pool()).await.unwrap();
    assert_eq!(loaded, ScanSettings::default());
}

#[tokio::test]
async fn test_scan_settings_round_trip() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let scan = ScanSettings {
        max_depth: 0,
        include_folders: vec!["Rock".to_string()],
        exclude_folders: vec!["Rock/Demos".to_string()],
    };
    settings::set_scan_settings(pool, &scan).await.unwrap();

    assert_eq!(settings::get_scan_settings(pool).await.unwrap(), scan);

    let catalog = SqliteCatalog::new(pool.clone());
    assert_eq!(catalog.scan_settings().await.unwrap(), scan);
}

#[tokio::test]
async fn test_malformed_scan_settings_fall_back_to_defaults() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    // Not JSON at all
    sqlx::query("INSERT INTO settings (key, value, updated_at) VALUES (?, ?, 0)")
        .bind(settings::SETTING_SCAN)
        .bind("{max_depth: oops")
        .execute(pool)
        .await
        .unwrap();

    assert_eq!(
        settings::get_scan_settings(pool).await.unwrap(),
        ScanSettings::default()
    );

    // Valid JSON, wrong field types
    settings::set_setting(
        pool,
        settings::SETTING_SCAN,
        &json!({ "max_depth": true, "exclude_folders": ["Podcasts"] }),
    )
    .await
    .unwrap();

    let loaded = settings::get_scan_settings(pool).await.unwrap();
    assert_eq!(loaded.max_depth, 10);
    assert_eq!(loaded.exclude_folders, vec!["Podcasts"]);
}
