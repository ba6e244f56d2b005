//! Site-Scrapers main entry point
//!
//! This is the command-line interface for the site scrapers.

use anyhow::Context;
use clap::{Parser, Subcommand};
use site_scrapers::config::load_settings_or_default;
use site_scrapers::{run_scraper, Fetcher, ScraperFactory, ScraperName};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Scrapers: fetch poems and report archives into a local directory
#[derive(Parser, Debug)]
#[command(name = "site-scrapers")]
#[command(version)]
#[command(about = "Site-specific scrapers for poems and report archives", long_about = None)]
struct Cli {
    /// Path to a TOML settings file overriding the scraper defaults
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scraper and save what it finds
    Scrape {
        /// Name of the scraper (see `list`)
        #[arg(value_name = "SCRAPER_NAME")]
        scraper_name: String,

        /// Existing directory to save into (defaults to the scraper's root directory)
        #[arg(long, value_name = "DIR")]
        save_path: Option<PathBuf>,
    },

    /// List the registered scrapers
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::List => {
            for name in ScraperName::ALL {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Scrape {
            scraper_name,
            save_path,
        } => handle_scrape(cli.config, &scraper_name, save_path).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_scrapers=info,warn"),
            1 => EnvFilter::new("site_scrapers=debug,info"),
            2 => EnvFilter::new("site_scrapers=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the `scrape` command
async fn handle_scrape(
    config: Option<PathBuf>,
    scraper_name: &str,
    save_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(path) = &config {
        tracing::info!("Loading settings from: {}", path.display());
    }
    let settings = load_settings_or_default(config.as_deref()).context("failed to load settings")?;

    let fetcher = Fetcher::new().context("failed to build HTTP client")?;
    let factory = ScraperFactory::new(settings, fetcher);
    let scraper = factory.create_by_name(scraper_name)?;

    match run_scraper(scraper.as_ref(), save_path.as_deref()).await {
        Ok(_) => {
            tracing::info!("Scraping {} completed successfully", scraper.name());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scraping {} failed: {}", scraper.name(), e);
            Err(e.into())
        }
    }
}
