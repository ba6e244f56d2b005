//! Configuration module for the scrapers
//!
//! Every scraper ships with a default configuration (its site's base link and
//! an output root). An optional TOML settings file overrides any of them.
//!
//! # Example
//!
//! ```no_run
//! use site_scrapers::config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("scrapers.toml")).unwrap();
//! println!("Poetry archive base link: {}", settings.aldiwan.link);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AldiwanConfig, SasbConfig, Settings, SiteConfig, SustainabilityReportsConfig,
    DEFAULT_DOWNLOAD_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{load_settings, load_settings_or_default, parse_settings};
