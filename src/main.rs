use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use listing_scout::config::Config;
use listing_scout::notify::{Notifier, TelegramChannel};
use listing_scout::scrapers::{MobileBgSource, SourceParams};
use listing_scout::storage::{SeenStore, SqliteStore};
use listing_scout::IngestionPipeline;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "listing-scout")]
#[command(about = "Polls a mobile.bg search page and announces new listings on Telegram")]
struct Cli {
    /// SQLite file holding seen listings (overrides LISTINGS_DB_PATH)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scrape pass (default)
    Run,
    /// Send a test message to check the Telegram credentials
    TestNotify,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚗 Listing Scout");

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(cli.db_path).await,
        Commands::TestNotify => test_notify().await,
    };

    if let Err(e) = result {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config() -> anyhow::Result<Config> {
    Config::from_env().context("Cannot start without Telegram credentials")
}

fn build_notifier(config: &Config) -> anyhow::Result<Notifier> {
    let channel = TelegramChannel::new(&config.telegram, config.http_timeout)?;
    Ok(Notifier::new(Box::new(channel), config.notify_label.clone()))
}

async fn run(db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(path) = db_path {
        config.db_path = path;
    }

    let notifier = build_notifier(&config)?;
    let source = MobileBgSource::with_params(SourceParams::from_config(&config))?;
    let store = SqliteStore::new(&config.db_path);

    store
        .initialize()
        .await
        .context("Failed to set up database")?;
    info!(
        "Database ready at {} ({} bytes)",
        store.path().display(),
        store.file_size().await?
    );

    info!("Starting scrape of {}", source.url());
    let pipeline = IngestionPipeline::new(&source, &store, &notifier)?;
    let report = pipeline.run().await.context("Error scraping listings")?;

    if report.new_listings.is_empty() {
        info!("No new listings");
    } else {
        info!(
            "✅ {} new listings, notification chunks sent {}/{}",
            report.new_listings.len(),
            report.dispatch.sent,
            report.dispatch.chunks
        );
    }
    if report.dispatch.failed > 0 {
        warn!("{} notification chunks could not be delivered", report.dispatch.failed);
    }

    info!(
        "Final database state: {} listings, {} bytes",
        store.count().await?,
        store.file_size().await?
    );

    Ok(())
}

async fn test_notify() -> anyhow::Result<()> {
    let config = load_config()?;
    let notifier = build_notifier(&config)?;

    notifier
        .send_test_message()
        .await
        .context("Error sending test message")?;
    info!("✅ Test message sent successfully");

    Ok(())
}
