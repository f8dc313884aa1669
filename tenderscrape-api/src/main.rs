//! Tenderscrape API server.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use tenderscrape::observability::{init_tracing, LogFormat};
use tenderscrape_api::{serve, AppState};

#[derive(Parser)]
#[command(name = "tenderscrape-api")]
#[command(about = "Serve scraped tenders over HTTP")]
#[command(version)]
struct Cli {
    /// SQLite database written by the scraper
    #[arg(long, default_value = "tenders.db")]
    db: PathBuf,

    /// Listen address
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    listen: SocketAddr,

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

    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("Failed to bind {}", cli.listen))?;

    serve(listener, AppState::new(cli.db), async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
        }
    })
    .await
}
