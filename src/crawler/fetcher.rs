//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scrapers:
//! - Building the shared HTTP client
//! - GET requests for listing pages, parsed as HTML whatever the status
//! - Timed GET requests for binary documents
//! - Download error classification

use crate::crawler::parser::ParsedPage;
use crate::{storage, ScrapeError};
use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Why a binary download was skipped
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("stream from {url} broke off: {message}")]
    Stream { url: String, message: String },

    #[error("{url} failed: {message}")]
    Transport { url: String, message: String },
}

impl DownloadError {
    /// Maps a reqwest error onto the download taxonomy
    fn classify(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();

        if error.is_timeout() {
            DownloadError::Timeout { url }
        } else if error.is_connect() {
            DownloadError::Connection {
                url,
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            DownloadError::HttpStatus {
                url,
                status: status.as_u16(),
            }
        } else if error.is_body() || error.is_decode() {
            DownloadError::Stream {
                url,
                message: error.to_string(),
            }
        } else {
            DownloadError::Transport {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Builds the HTTP client shared by every scraper
///
/// The client has no overall timeout: listing pages may take as long as they
/// need, and downloads set their own timeout per request.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests on behalf of the scrapers
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher around a freshly built client
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self::with_client(build_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a page and parses it as HTML
    ///
    /// The status code is not checked: an error page is parsed like any
    /// other. Transport failures are returned as `ScrapeError::PageFetch`.
    pub async fn fetch_page(&self, url: &str) -> Result<ParsedPage, ScrapeError> {
        self.send_for_page(url, self.client.get(url)).await
    }

    /// Same as [`Fetcher::fetch_page`] with a custom `User-Agent` header
    pub async fn fetch_page_with_user_agent(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<ParsedPage, ScrapeError> {
        self.send_for_page(url, self.client.get(url).header(USER_AGENT, user_agent))
            .await
    }

    async fn send_for_page(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<ParsedPage, ScrapeError> {
        tracing::debug!("Fetching page {}", url);

        let page_error = |source| ScrapeError::PageFetch {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(page_error)?;
        let status = response.status();
        let body = response.text().await.map_err(page_error)?;

        if !status.is_success() {
            tracing::debug!("Page {} returned HTTP {}, parsing body anyway", url, status);
        }

        Ok(ParsedPage::parse(&body))
    }

    /// Downloads a binary document within `timeout`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The full response body of a 2xx response
    /// * `Err(DownloadError)` - Timeout, connection, status or stream failure
    pub async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| DownloadError::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::classify(url, e))?;

        Ok(bytes.to_vec())
    }

    /// Downloads `url` into `path`, skipping the item on any download failure
    ///
    /// Download failures are logged and reported as `Ok(false)`; nothing is
    /// written for them. Only a failure to write the file is returned as an
    /// error.
    pub async fn download(
        &self,
        url: &str,
        path: &Path,
        timeout: Duration,
    ) -> Result<bool, ScrapeError> {
        match self.fetch_bytes(url, timeout).await {
            Ok(bytes) => {
                storage::write_bytes(path, &bytes)?;
                tracing::info!("Downloaded {}", url);
                Ok(true)
            }
            Err(DownloadError::Timeout { .. }) => {
                tracing::error!("{} was skipped because of timeout", url);
                Ok(false)
            }
            Err(e) => {
                tracing::error!("Skipped download: {}", e);
                Ok(false)
            }
        }
    }
}
