//! Poetry archive scraper (aldiwan.net)
//!
//! The archive has one index page per letter. Each index links to poets
//! (`cat-*` hrefs), each poet page links to poems (`poem*` hrefs on
//! `float-right` anchors), and each poem page carries its verses as `h3`
//! headings inside `#poem_content`.
//!
//! Output: `<save>/aldiwan_data/<poet-link>/<poem-link>.txt`, one verse per
//! line.

use super::{ScrapeSummary, Scraper, ScraperName};
use crate::config::{AldiwanConfig, SiteConfig};
use crate::crawler::{extract_link_set, extract_verses, resolve_link, Fetcher, Link, MatchRule};
use crate::{storage, Result};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;

/// Directory created under the save path
const DATA_DIR: &str = "aldiwan_data";

pub struct AldiwanScraper {
    config: AldiwanConfig,
    fetcher: Fetcher,
}

impl AldiwanScraper {
    pub fn new(config: AldiwanConfig, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    /// Poet links listed on one letter index page
    pub async fn poet_links(&self, letter_link: &Link) -> Result<BTreeSet<Link>> {
        let page = self.fetcher.fetch_page(letter_link.as_str()).await?;
        Ok(extract_link_set(&page, &MatchRule::POETS))
    }

    /// Poem links listed on a poet's page
    pub async fn poem_links(&self, poet: &Link) -> Result<BTreeSet<Link>> {
        let url = resolve_link(&self.config.link, poet.as_str());
        let page = self.fetcher.fetch_page(&url).await?;
        Ok(extract_link_set(&page, &MatchRule::POEMS))
    }

    /// Verses of one poem, in page order
    pub async fn poem_verses(&self, poem: &Link) -> Result<Vec<String>> {
        let url = resolve_link(&self.config.link, poem.as_str());
        let page = self.fetcher.fetch_page(&url).await?;
        Ok(extract_verses(&page))
    }

    /// Scrapes every poem of one poet into `poet_dir`
    async fn scrape_poet(
        &self,
        poet: &Link,
        poet_dir: &Path,
        summary: &mut ScrapeSummary,
    ) -> Result<()> {
        let poems = self.poem_links(poet).await?;
        tracing::debug!("Poet {} has {} poems", poet, poems.len());

        for poem in poems {
            let verses = self.poem_verses(&poem).await?;

            if verses.is_empty() {
                tracing::debug!("Poem {} has no verses, skipping", poem);
                summary.record(false);
                continue;
            }

            let path = poet_dir.join(format!("{}.txt", storage::file_name(poem.as_str())));
            storage::write_text(&path, &verses.join("\n"))?;
            summary.record(true);
        }

        Ok(())
    }
}

#[async_trait]
impl Scraper for AldiwanScraper {
    fn name(&self) -> ScraperName {
        ScraperName::Aldiwan
    }

    fn link(&self) -> &str {
        self.config.link()
    }

    fn root_directory(&self) -> &Path {
        self.config.root_directory()
    }

    async fn scrape(&self, save_dir: &Path) -> Result<ScrapeSummary> {
        let data_dir = save_dir.join(DATA_DIR);
        storage::ensure_dir(&data_dir)?;

        let mut summary = ScrapeSummary::default();
        let letters = self.config.links();
        let letter_count = letters.len();

        for (index, letter) in letters.iter().enumerate() {
            let poets = self.poet_links(letter).await?;
            tracing::info!(
                "Letter {}/{}: {} poets",
                index + 1,
                letter_count,
                poets.len()
            );

            for poet in poets {
                let poet_dir = data_dir.join(storage::file_name(poet.as_str()));
                storage::ensure_dir(&poet_dir)?;
                self.scrape_poet(&poet, &poet_dir, &mut summary).await?;
            }
        }

        Ok(summary)
    }
}
