//! Site scrapers and the registry that builds them
//!
//! Each scraper walks one site with a fixed shape:
//! - `aldiwan`: letter index → poet → poem text
//! - `sustain`: report listing → company → yearly PDF reports
//! - `sustain_accounting`: one listing → every linked PDF
//!
//! To register a new scraper add a `ScraperName` variant, a configuration
//! type in `config`, and a branch in `ScraperFactory::create`.

mod aldiwan;
mod sustainability_accounting;
mod sustainability_reports;

pub use aldiwan::AldiwanScraper;
pub use sustainability_accounting::SustainabilityAccountingScraper;
pub use sustainability_reports::SustainabilityReportsScraper;

use crate::config::Settings;
use crate::crawler::Fetcher;
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The closed set of registered scrapers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScraperName {
    Sustain,
    Aldiwan,
    SustainAccounting,
}

impl ScraperName {
    /// Every registered scraper, in listing order
    pub const ALL: [ScraperName; 3] = [
        ScraperName::Sustain,
        ScraperName::Aldiwan,
        ScraperName::SustainAccounting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScraperName::Sustain => "sustain",
            ScraperName::Aldiwan => "aldiwan",
            ScraperName::SustainAccounting => "sustain_accounting",
        }
    }
}

impl fmt::Display for ScraperName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScraperName {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        ScraperName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ScrapeError::InvalidScraperName(s.to_string()))
    }
}

/// What a scraper run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Files written to disk
    pub saved: usize,

    /// Items that yielded nothing to write (failed downloads, empty poems)
    pub skipped: usize,
}

impl ScrapeSummary {
    fn record(&mut self, saved: bool) {
        if saved {
            self.saved += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// The contract every site scraper implements
#[async_trait]
pub trait Scraper: Send + Sync {
    /// The registry name of this scraper
    fn name(&self) -> ScraperName;

    /// Base link of the site being scraped
    fn link(&self) -> &str;

    /// Where output goes when no save path is given
    fn root_directory(&self) -> &Path;

    /// Runs the full scrape, writing everything under `save_dir`
    ///
    /// Page fetch failures abort the run; individual download failures are
    /// logged and skipped.
    async fn scrape(&self, save_dir: &Path) -> Result<ScrapeSummary>;
}

/// Builds scrapers wired to their configuration
pub struct ScraperFactory {
    settings: Settings,
    fetcher: Fetcher,
}

impl ScraperFactory {
    pub fn new(settings: Settings, fetcher: Fetcher) -> Self {
        Self { settings, fetcher }
    }

    /// Creates the scraper registered under `name`
    pub fn create(&self, name: ScraperName) -> Box<dyn Scraper> {
        let fetcher = self.fetcher.clone();

        match name {
            ScraperName::Sustain => Box::new(SustainabilityReportsScraper::new(
                self.settings.sustain.clone(),
                fetcher,
            )),
            ScraperName::Aldiwan => {
                Box::new(AldiwanScraper::new(self.settings.aldiwan.clone(), fetcher))
            }
            ScraperName::SustainAccounting => Box::new(SustainabilityAccountingScraper::new(
                self.settings.sustain_accounting.clone(),
                fetcher,
            )),
        }
    }

    /// Creates a scraper from its textual name
    ///
    /// # Returns
    ///
    /// * `Ok(Box<dyn Scraper>)` - The scraper
    /// * `Err(ScrapeError::InvalidScraperName)` - No scraper has that name
    pub fn create_by_name(&self, name: &str) -> Result<Box<dyn Scraper>> {
        Ok(self.create(name.parse()?))
    }
}

/// Resolves the save directory and runs `scraper` into it
///
/// The directory defaults to the scraper's root directory. It is made
/// absolute and must already exist; this is checked before any request is
/// made.
pub async fn run_scraper(scraper: &dyn Scraper, save_path: Option<&Path>) -> Result<ScrapeSummary> {
    let save_dir = resolve_save_dir(save_path.unwrap_or_else(|| scraper.root_directory()))?;

    tracing::info!("Saving {} output to {}", scraper.name(), save_dir.display());

    let summary = scraper.scrape(&save_dir).await?;

    tracing::info!(
        "{} finished: {} saved, {} skipped",
        scraper.name(),
        summary.saved,
        summary.skipped
    );

    Ok(summary)
}

fn resolve_save_dir(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if !absolute.is_dir() {
        return Err(ScrapeError::InvalidSaveDirectory(absolute));
    }

    Ok(absolute)
}
