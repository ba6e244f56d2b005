//! Crawler module for page fetching and link extraction
//!
//! This module contains the building blocks every scraper shares:
//! - HTTP fetching of pages and binary documents
//! - HTML parsing and rule-based link extraction

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, DownloadError, Fetcher};
pub use parser::{
    extract_link_set, extract_links, extract_verses, first_text, has_year, resolve_link, Link,
    MatchRule, ParsedPage,
};
