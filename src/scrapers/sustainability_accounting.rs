//! ESG accounting reports scraper (sasb.org reporters list)
//!
//! One listing page links every reporter's PDF directly. The site rejects
//! clients that do not look like a browser, so the listing is fetched with
//! the configured User-Agent. The PDFs themselves are public.
//!
//! Output: `<save>/<last-url-segment>`.

use super::{ScrapeSummary, Scraper, ScraperName};
use crate::config::{SasbConfig, SiteConfig};
use crate::crawler::{extract_link_set, resolve_link, Fetcher, Link, MatchRule};
use crate::{storage, Result};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;

pub struct SustainabilityAccountingScraper {
    config: SasbConfig,
    fetcher: Fetcher,
}

impl SustainabilityAccountingScraper {
    pub fn new(config: SasbConfig, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    /// Every distinct PDF link on the listing page
    pub async fn report_links(&self) -> Result<BTreeSet<Link>> {
        let page = self
            .fetcher
            .fetch_page_with_user_agent(&self.config.link, &self.config.user_agent)
            .await?;
        Ok(extract_link_set(&page, &MatchRule::PDF))
    }
}

#[async_trait]
impl Scraper for SustainabilityAccountingScraper {
    fn name(&self) -> ScraperName {
        ScraperName::SustainAccounting
    }

    fn link(&self) -> &str {
        self.config.link()
    }

    fn root_directory(&self) -> &Path {
        self.config.root_directory()
    }

    async fn scrape(&self, save_dir: &Path) -> Result<ScrapeSummary> {
        let reports = self.report_links().await?;
        tracing::info!("Found {} reports", reports.len());

        storage::ensure_dir(save_dir)?;

        let mut summary = ScrapeSummary::default();
        let timeout = self.config.download_timeout();

        for report in &reports {
            let url = resolve_link(&self.config.link, report.as_str());
            let path = save_dir.join(storage::file_name(report.last_segment()));
            let saved = self.fetcher.download(&url, &path, timeout).await?;
            summary.record(saved);
        }

        Ok(summary)
    }
}
