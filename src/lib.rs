//! Site-Scrapers: site-specific scrapers for poems and report archives
//!
//! This crate implements a handful of fixed-shape scrapers that walk a
//! listing page, follow the links they recognise, and persist the leaf
//! content (poem text, PDF reports) into a local directory tree.

pub mod config;
pub mod crawler;
pub mod scrapers;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scraping operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid scraper name: {0}")]
    InvalidScraperName(String),

    #[error("Invalid save directory: {}", .0.display())]
    InvalidSaveDirectory(PathBuf),

    #[error("Failed to fetch page {url}: {source}")]
    PageFetch { url: String, source: reqwest::Error },

    #[error("Page {url} has no element matching `{selector}`")]
    MissingElement { url: String, selector: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scraping operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Settings;
pub use crawler::{Fetcher, Link, ParsedPage};
pub use scrapers::{run_scraper, ScrapeSummary, Scraper, ScraperFactory, ScraperName};
