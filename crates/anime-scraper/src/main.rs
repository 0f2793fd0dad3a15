//! AnimeFire scraping proxy CLI application.

use anime_scraper::{server, AnimeScraper, ListingReport};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::{Config, Envelope, LogConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        /// Override the configured listen address
        #[arg(long)]
        listen: Option<String>,
    },
    /// Print one listing category as JSON
    Listing {
        /// Category slug, e.g. lancamentos or atualizados
        #[arg(default_value = "lancamentos")]
        category: String,

        /// Number of pages to fetch
        #[arg(short, long)]
        pages: Option<u32>,
    },
    /// Print search results as JSON
    Search {
        query: Vec<String>,
    },
    /// Print the episodes of a detail page as JSON
    Episodes {
        /// Absolute detail page URL
        url: String,

        /// Number of leading episodes to enrich with video sources
        #[arg(short, long)]
        limit: Option<usize>,

        /// Enrich every episode
        #[arg(long, conflicts_with = "limit")]
        all: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_listing(report: ListingReport) -> Result<()> {
    let failures = report.failures();
    for failure in &report.failed_pages {
        tracing::warn!(page = failure.page, error = %failure.error, "Page skipped");
    }
    print_json(&Envelope::success(report.summaries, failures))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let mut log_config = LogConfig::from_config(&config, "anime-scraper");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    let scraper = AnimeScraper::new(&config).context("Failed to create scraper")?;

    match args.command {
        Command::Serve { listen } => {
            let listen_addr = listen.unwrap_or_else(|| config.server.listen_addr.clone());
            server::serve(Arc::new(scraper), &listen_addr)
                .await
                .context("Server failed")?;
        }
        Command::Listing { category, pages } => {
            let pages = scraper.page_count(pages);
            print_listing(scraper.fetch_listing(&category, pages).await)?;
        }
        Command::Search { query } => {
            print_listing(scraper.search(&query.join(" ")).await)?;
        }
        Command::Episodes { url, limit, all } => {
            let limit = if all { None } else { limit.or(scraper.settings().enrich_limit) };
            let report = scraper
                .enrich_episodes(&url, limit)
                .await
                .with_context(|| format!("Failed to fetch episodes from {}", url))?;
            print_json(&Envelope::success(report.episodes, report.failed_sources))?;
        }
    }

    Ok(())
}
