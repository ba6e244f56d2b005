//! Annual sustainability reports scraper (sustainability-reports.com)
//!
//! The listing page links every company with an "all annual reports"
//! anchor. A company page names the company in `h1.entry-title` and lists
//! its reports inside `article[id^=post2]` elements; only anchors whose text
//! carries a year are kept. The year in the text and in the link do not
//! always agree, so files are numbered by position instead.
//!
//! Output: `<save>/environment_data/<company>/<index>.pdf`.

use super::{ScrapeSummary, Scraper, ScraperName};
use crate::config::{SiteConfig, SustainabilityReportsConfig};
use crate::crawler::{extract_links, first_text, resolve_link, Fetcher, Link, MatchRule};
use crate::{storage, Result, ScrapeError};
use async_trait::async_trait;
use std::path::Path;

/// Directory created under the save path
const DATA_DIR: &str = "environment_data";

const COMPANY_NAME_SELECTOR: &str = "h1.entry-title";

/// A company page reduced to what the scraper needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyReports {
    pub name: String,
    pub reports: Vec<Link>,
}

pub struct SustainabilityReportsScraper {
    config: SustainabilityReportsConfig,
    fetcher: Fetcher,
}

impl SustainabilityReportsScraper {
    pub fn new(config: SustainabilityReportsConfig, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    /// Company pages linked from the main listing, in page order
    pub async fn company_links(&self) -> Result<Vec<Link>> {
        let page = self.fetcher.fetch_page(&self.config.link).await?;
        Ok(extract_links(&page, &MatchRule::COMPANIES))
    }

    /// Fetches a company page and reads its name and report links
    ///
    /// A page without a company heading is treated as a broken page and
    /// aborts the run.
    pub async fn company_reports(&self, company_url: &str) -> Result<CompanyReports> {
        let page = self.fetcher.fetch_page(company_url).await?;

        let name = first_text(&page, COMPANY_NAME_SELECTOR).ok_or_else(|| {
            ScrapeError::MissingElement {
                url: company_url.to_string(),
                selector: COMPANY_NAME_SELECTOR.to_string(),
            }
        })?;
        let reports = extract_links(&page, &MatchRule::YEARLY_REPORTS);

        Ok(CompanyReports { name, reports })
    }
}

#[async_trait]
impl Scraper for SustainabilityReportsScraper {
    fn name(&self) -> ScraperName {
        ScraperName::Sustain
    }

    fn link(&self) -> &str {
        self.config.link()
    }

    fn root_directory(&self) -> &Path {
        self.config.root_directory()
    }

    async fn scrape(&self, save_dir: &Path) -> Result<ScrapeSummary> {
        let companies = self.company_links().await?;
        tracing::info!("Found {} companies", companies.len());

        let data_dir = save_dir.join(DATA_DIR);
        storage::ensure_dir(&data_dir)?;

        let mut summary = ScrapeSummary::default();
        let timeout = self.config.download_timeout();

        for (position, company) in companies.iter().enumerate() {
            let company_url = resolve_link(&self.config.link, company.as_str());
            let CompanyReports { name, reports } = self.company_reports(&company_url).await?;

            tracing::info!(
                "Company {}/{}: {} ({} reports)",
                position + 1,
                companies.len(),
                name,
                reports.len()
            );

            let company_dir = data_dir.join(storage::file_name(&name));
            storage::ensure_dir(&company_dir)?;

            for (index, report) in reports.iter().enumerate() {
                let url = resolve_link(&company_url, report.as_str());
                let path = company_dir.join(format!("{}.pdf", index));
                let saved = self.fetcher.download(&url, &path, timeout).await?;
                summary.record(saved);
            }
        }

        Ok(summary)
    }
}
