//! Tenderscrape: scrape procurement tenders into CSV or SQLite.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use tenderscrape::config::ScraperConfig;
use tenderscrape::crawl::TenderScraper;
use tenderscrape::observability::{init_tracing, LogFormat};
use tenderscrape::sink::OutputTarget;

#[derive(Parser)]
#[command(name = "tenderscrape")]
#[command(about = "Scrape procurement tenders from rostender.info")]
#[command(version)]
struct Cli {
    /// Maximum number of tenders to scrape
    #[arg(long, default_value_t = 100)]
    max: usize,

    /// Output file; .csv writes CSV, .db or .sqlite writes SQLite
    #[arg(short, long, default_value = "tenders.csv")]
    output: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the site root
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose);

    let target = OutputTarget::from_path(&cli.output).context("Invalid --output")?;

    let mut config = match &cli.config {
        Some(path) => ScraperConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ScraperConfig::new(),
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(timeout) = cli.timeout {
        config.fetch = config.fetch.with_timeout(timeout);
    }
    if let Some(user_agent) = cli.user_agent {
        config.fetch = config.fetch.with_user_agent(user_agent);
    }
    config.validate().context("Invalid configuration")?;

    let scraper = TenderScraper::with_http(&config).context("Failed to set up scraper")?;
    info!(max = cli.max, output = %target.path().display(), "Starting scrape");

    let report = scraper.scrape(cli.max).await;

    let sink = target.open().await.context("Failed to open output")?;
    let written = sink
        .write(&report.records)
        .await
        .with_context(|| format!("Failed to write {}", target.path().display()))?;

    println!(
        "Scraped {} tenders from {} pages ({} skipped), wrote {} to {}",
        report.records.len(),
        report.pages_fetched,
        report.skipped.len(),
        written,
        target.path().display()
    );
    Ok(())
}
