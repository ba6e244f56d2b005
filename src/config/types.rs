use crate::crawler::Link;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout applied to each binary download
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 10;

/// Number of letter index pages on the poetry archive
const ALDIWAN_LETTER_COUNT: u32 = 27;

/// Settings for every registered scraper
///
/// Each table is optional in the TOML file; missing tables and missing keys
/// fall back to the site defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub aldiwan: AldiwanConfig,
    pub sustain: SustainabilityReportsConfig,
    pub sustain_accounting: SasbConfig,
}

/// The part of a configuration every scraper shares
pub trait SiteConfig {
    /// Base link of the site
    fn link(&self) -> &str;

    /// Directory the scraper saves into when no save path is given
    fn root_directory(&self) -> &Path;
}

/// Poetry archive configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AldiwanConfig {
    /// Base link; poet and poem hrefs are appended to it
    pub link: String,

    pub root_directory: PathBuf,

    /// How many `letterN` index pages to walk
    pub letter_count: u32,
}

impl AldiwanConfig {
    /// One index page per letter of the alphabet: `<link>letter1` .. `<link>letterN`
    pub fn links(&self) -> Vec<Link> {
        (1..=self.letter_count)
            .map(|i| Link::from(format!("{}letter{}", self.link, i)))
            .collect()
    }
}

impl Default for AldiwanConfig {
    fn default() -> Self {
        Self {
            link: "https://www.aldiwan.net/".to_string(),
            root_directory: PathBuf::from("."),
            letter_count: ALDIWAN_LETTER_COUNT,
        }
    }
}

impl SiteConfig for AldiwanConfig {
    fn link(&self) -> &str {
        &self.link
    }

    fn root_directory(&self) -> &Path {
        &self.root_directory
    }
}

/// Annual sustainability reports configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SustainabilityReportsConfig {
    /// Listing page of all companies
    pub link: String,

    pub root_directory: PathBuf,

    /// Per-report download timeout (seconds)
    pub download_timeout_secs: u64,
}

impl SustainabilityReportsConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for SustainabilityReportsConfig {
    fn default() -> Self {
        Self {
            link: "https://www.sustainability-reports.com/annual-reports/".to_string(),
            root_directory: PathBuf::from("."),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl SiteConfig for SustainabilityReportsConfig {
    fn link(&self) -> &str {
        &self.link
    }

    fn root_directory(&self) -> &Path {
        &self.root_directory
    }
}

/// ESG accounting reports configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SasbConfig {
    /// Listing page with every reporter's PDF
    pub link: String,

    pub root_directory: PathBuf,

    /// Per-report download timeout (seconds)
    pub download_timeout_secs: u64,

    /// The listing page rejects clients without a browser-like agent
    pub user_agent: String,
}

impl SasbConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for SasbConfig {
    fn default() -> Self {
        Self {
            link: "https://www.sasb.org/company-use/sasb-reporters/".to_string(),
            root_directory: PathBuf::from("."),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl SiteConfig for SasbConfig {
    fn link(&self) -> &str {
        &self.link
    }

    fn root_directory(&self) -> &Path {
        &self.root_directory
    }
}
