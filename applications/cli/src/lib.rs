//! Verse command-line driver
//!
//! Loads configuration, opens the catalog and cache, and runs scans and
//! cache maintenance. This library exposes the pieces for testing.

pub mod app;
pub mod config;

pub use app::{App, CleanupReport, SettingsUpdate};
pub use config::AppConfig;
