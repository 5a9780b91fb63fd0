/// Verse - music library scanner
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verse_cli::{App, AppConfig, SettingsUpdate};

#[derive(Parser)]
#[command(name = "verse")]
#[command(about = "Scan music folders into a searchable catalog", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./verse.toml if present)
    #[arg(short, long, global = true, env = "VERSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a library folder into the catalog
    Scan {
        /// Library root (defaults to the configured library_root)
        path: Option<PathBuf>,
        /// Reuse a recent result for the same root and settings
        #[arg(long)]
        cached: bool,
    },
    /// Show or change scan settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Inspect or maintain the extraction cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the stored scan settings
    Show,
    /// Update scan settings
    Set {
        /// Maximum folder depth below the root (0 = unlimited)
        #[arg(long)]
        max_depth: Option<u32>,
        /// Folder to scan (repeatable; replaces the current list)
        #[arg(long = "include")]
        include: Vec<String>,
        /// Folder to skip (repeatable; replaces the current list)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        /// Remove all include and exclude rules
        #[arg(long, conflicts_with_all = ["include", "exclude"])]
        clear_folders: bool,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Entry counts and sizes per category
    Stats,
    /// Delete cached entries
    Clear {
        /// metadata, artwork, config or temp (everything when omitted)
        category: Option<String>,
    },
    /// Remove temp files and metadata entries older than the given age
    Cleanup {
        #[arg(long, default_value_t = 3600)]
        max_age_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verse=info,verse_scanner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_from(cli.config.as_deref())?;
    let app = App::open(config).await?;

    match cli.command {
        Commands::Scan { path, cached } => {
            let result = app.scan(path.as_deref(), cached).await?;
            print_json(&result)?;
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                print_json(&app.scan_settings().await?)?;
            }
            SettingsAction::Set {
                max_depth,
                include,
                exclude,
                clear_folders,
            } => {
                let update = settings_update(max_depth, include, exclude, clear_folders);
                let settings = app.update_scan_settings(update).await?;
                tracing::info!("Scan settings updated");
                print_json(&settings)?;
            }
        },
        Commands::Cache { action } => match action {
            CacheAction::Stats => {
                print_json(&app.cache_stats())?;
            }
            CacheAction::Clear { category } => {
                let cleared = app.clear_cache(category.as_deref())?;
                print_json(&serde_json::json!({ "cleared": cleared }))?;
            }
            CacheAction::Cleanup { max_age_secs } => {
                let report = app.cleanup_cache(Duration::from_secs(max_age_secs));
                print_json(&report)?;
            }
        },
    }

    Ok(())
}

fn settings_update(
    max_depth: Option<u32>,
    include: Vec<String>,
    exclude: Vec<String>,
    clear_folders: bool,
) -> SettingsUpdate {
    if clear_folders {
        return SettingsUpdate {
            max_depth,
            include_folders: Some(Vec::new()),
            exclude_folders: Some(Vec::new()),
        };
    }

    SettingsUpdate {
        max_depth,
        include_folders: (!include.is_empty()).then_some(include),
        exclude_folders: (!exclude.is_empty()).then_some(exclude),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
