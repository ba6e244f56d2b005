//! Integration tests for the scrapers
//!
//! These tests use wiremock to stand in for the scraped sites and check
//! the fetch → extract → persist cycle end-to-end.

use site_scrapers::config::Settings;
use site_scrapers::crawler::{extract_link_set, DownloadError, Fetcher, Link, MatchRule};
use site_scrapers::scrapers::{
    AldiwanScraper, SustainabilityAccountingScraper, SustainabilityReportsScraper,
};
use site_scrapers::{run_scraper, ScrapeError, ScrapeSummary, Scraper, ScraperFactory, ScraperName};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An address nothing listens on
const UNREACHABLE: &str = "http://127.0.0.1:1/";

fn fetcher() -> Fetcher {
    Fetcher::new().expect("Failed to build fetcher")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn pdf(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(content.as_bytes().to_vec())
        .insert_header("content-type", "application/pdf")
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Serves one chunked response that stops in the middle of a chunk
async fn serve_truncated_chunked() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = [0u8; 2048];
        let _ = socket.read(&mut request).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  content-type: application/pdf\r\n\
                  transfer-encoding: chunked\r\n\r\n\
                  7\r\nab",
            )
            .await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}/truncated.pdf", addr)
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ===== Fetcher =====

#[tokio::test]
async fn test_fetch_page_parses_error_pages() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/letter1",
        ResponseTemplate::new(404).set_body_string(r#"<html><body><a href="cat-poet">x</a></body></html>"#),
    )
    .await;

    let page = fetcher()
        .fetch_page(&format!("{}/letter1", mock_server.uri()))
        .await
        .expect("Non-2xx pages should still parse");

    let poets = extract_link_set(&page, &MatchRule::POETS);
    assert_eq!(poets, BTreeSet::from([Link::from("cat-poet")]));
}

#[tokio::test]
async fn test_fetch_page_transport_failure_propagates() {
    let result = fetcher().fetch_page(UNREACHABLE).await;
    assert!(matches!(result, Err(ScrapeError::PageFetch { url, .. }) if url == UNREACHABLE));
}

#[tokio::test]
async fn test_fetch_bytes_classifies_http_status() {
    let mock_server = MockServer::start().await;
    mount_get(&mock_server, "/broken.pdf", ResponseTemplate::new(500)).await;

    let result = fetcher()
        .fetch_bytes(
            &format!("{}/broken.pdf", mock_server.uri()),
            Duration::from_secs(5),
        )
        .await;

    assert!(matches!(result, Err(DownloadError::HttpStatus { status: 500, .. })));
}

#[tokio::test]
async fn test_fetch_bytes_classifies_timeout() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/slow.pdf",
        pdf("late").set_delay(Duration::from_secs(3)),
    )
    .await;

    let result = fetcher()
        .fetch_bytes(
            &format!("{}/slow.pdf", mock_server.uri()),
            Duration::from_secs(1),
        )
        .await;

    assert!(matches!(result, Err(DownloadError::Timeout { .. })));
}

#[tokio::test]
async fn test_fetch_bytes_classifies_connection_failure() {
    let result = fetcher()
        .fetch_bytes(&format!("{}r.pdf", UNREACHABLE), Duration::from_secs(5))
        .await;

    assert!(matches!(result, Err(DownloadError::Connection { .. })));
}

#[tokio::test]
async fn test_download_failure_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_get(&mock_server, "/gone.pdf", ResponseTemplate::new(404)).await;

    let temp = TempDir::new().unwrap();
    let target = temp.path().join("gone.pdf");

    let saved = fetcher()
        .download(
            &format!("{}/gone.pdf", mock_server.uri()),
            &target,
            Duration::from_secs(5),
        )
        .await
        .expect("Download failures are not errors");

    assert!(!saved);
    assert!(dir_entries(temp.path()).is_empty());
}

#[tokio::test]
async fn test_fetch_bytes_classifies_broken_stream() {
    let url = serve_truncated_chunked().await;

    let result = fetcher().fetch_bytes(&url, Duration::from_secs(5)).await;

    assert!(matches!(result, Err(DownloadError::Stream { .. })));
}

#[tokio::test]
async fn test_download_broken_stream_writes_nothing() {
    let url = serve_truncated_chunked().await;

    let temp = TempDir::new().unwrap();
    let target = temp.path().join("truncated.pdf");

    let saved = fetcher()
        .download(&url, &target, Duration::from_secs(5))
        .await
        .expect("Download failures are not errors");

    assert!(!saved);
    assert!(dir_entries(temp.path()).is_empty());
}

#[tokio::test]
async fn test_fetch_bytes_classifies_malformed_url() {
    let result = fetcher()
        .fetch_bytes("not a url", Duration::from_secs(5))
        .await;

    assert!(matches!(result, Err(DownloadError::Transport { url, .. }) if url == "not a url"));
}

// ===== ESG accounting reports =====

#[tokio::test]
async fn test_sustain_accounting_end_to_end() {
    let mock_server = MockServer::start().await;

    // The listing only answers browser-like agents
    Mock::given(method("GET"))
        .and(path("/reporters/"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(html(
            r#"<a href="report1.pdf">Report</a>
               <a href="report1.pdf">Same report</a>
               <a href="x.html">Not a report</a>"#,
        ))
        .mount(&mock_server)
        .await;
    mount_get(&mock_server, "/reporters/report1.pdf", pdf("%PDF report1")).await;

    let mut settings = Settings::default();
    settings.sustain_accounting.link = format!("{}/reporters/", mock_server.uri());
    let scraper = SustainabilityAccountingScraper::new(settings.sustain_accounting, fetcher());

    let links = scraper.report_links().await.expect("Listing fetch failed");
    assert_eq!(links, BTreeSet::from([Link::from("report1.pdf")]));

    let temp = TempDir::new().unwrap();
    let summary = scraper.scrape(temp.path()).await.expect("Scrape failed");

    assert_eq!(summary, ScrapeSummary { saved: 1, skipped: 0 });
    assert_eq!(dir_entries(temp.path()), vec!["report1.pdf"]);
    assert_eq!(
        fs::read_to_string(temp.path().join("report1.pdf")).unwrap(),
        "%PDF report1"
    );
}

// ===== Poetry archive =====

#[tokio::test]
async fn test_aldiwan_skips_poems_without_verses() {
    let mock_server = MockServer::start().await;

    mount_get(
        &mock_server,
        "/letter1",
        html(r#"<a href="cat-poet">The poet</a><a href="about">About</a>"#),
    )
    .await;
    mount_get(
        &mock_server,
        "/cat-poet",
        html(
            r#"<a class="float-right" href="poem1">Poem one</a>
               <a class="float-right" href="poem2">Poem two</a>
               <a href="poem3">Not listed as a poem</a>"#,
        ),
    )
    .await;
    mount_get(
        &mock_server,
        "/poem1",
        html(r#"<div id="comments"><h3>Not a verse</h3></div>"#),
    )
    .await;
    mount_get(
        &mock_server,
        "/poem2",
        html(r#"<div id="poem_content"><h3>Verse one</h3><h3>Verse two</h3></div>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/poem3"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut settings = Settings::default();
    settings.aldiwan.link = format!("{}/", mock_server.uri());
    settings.aldiwan.letter_count = 1;
    let scraper = AldiwanScraper::new(settings.aldiwan, fetcher());

    let temp = TempDir::new().unwrap();
    let summary = scraper.scrape(temp.path()).await.expect("Scrape failed");

    let poet_dir = temp.path().join("aldiwan_data").join("cat-poet");
    assert_eq!(summary, ScrapeSummary { saved: 1, skipped: 1 });
    assert_eq!(dir_entries(&poet_dir), vec!["poem2.txt"]);

    let poem = fs::read_to_string(poet_dir.join("poem2.txt")).unwrap();
    assert_eq!(poem.lines().collect::<Vec<_>>(), vec!["Verse one", "Verse two"]);
}

#[tokio::test]
async fn test_aldiwan_poet_page_failure_aborts() {
    let temp = TempDir::new().unwrap();

    let mut settings = Settings::default();
    settings.aldiwan.link = UNREACHABLE.to_string();
    let scraper = AldiwanScraper::new(settings.aldiwan, fetcher());

    let result = scraper.scrape(temp.path()).await;
    assert!(matches!(result, Err(ScrapeError::PageFetch { .. })));
}

// ===== Annual sustainability reports =====

#[tokio::test]
async fn test_sustain_batch_survives_a_timeout() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/annual-reports/",
        html(&format!(
            r#"<a href="{}/company/acme">all annual reports</a>
               <a href="/company/ignored">company profile</a>"#,
            base_url
        )),
    )
    .await;
    mount_get(
        &mock_server,
        "/company/acme",
        html(
            r#"<h1 class="entry-title">Acme Corp</h1>
               <article id="post2001">
                   <a href="/files/2021.pdf">Report 2021</a>
                   <a href="/files/contact">Contact</a>
               </article>
               <article id="post2002">
                   <a href="/files/2020.pdf">Report 2020</a>
                   <a href="/files/2019.pdf">Report 2019</a>
               </article>
               <article id="post1"><a href="/files/2010.pdf">Report 2010</a></article>"#,
        ),
    )
    .await;
    mount_get(&mock_server, "/files/2021.pdf", pdf("report 2021")).await;
    mount_get(
        &mock_server,
        "/files/2020.pdf",
        pdf("report 2020").set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_get(&mock_server, "/files/2019.pdf", pdf("report 2019")).await;

    let mut settings = Settings::default();
    settings.sustain.link = format!("{}/annual-reports/", base_url);
    settings.sustain.download_timeout_secs = 1;
    let scraper = SustainabilityReportsScraper::new(settings.sustain, fetcher());

    let temp = TempDir::new().unwrap();
    let summary = scraper.scrape(temp.path()).await.expect("Scrape failed");

    let company_dir = temp.path().join("environment_data").join("Acme Corp");
    assert_eq!(summary, ScrapeSummary { saved: 2, skipped: 1 });
    assert_eq!(dir_entries(&company_dir), vec!["0.pdf", "2.pdf"]);
    assert_eq!(
        fs::read_to_string(company_dir.join("0.pdf")).unwrap(),
        "report 2021"
    );
    assert_eq!(
        fs::read_to_string(company_dir.join("2.pdf")).unwrap(),
        "report 2019"
    );
}

#[tokio::test]
async fn test_sustain_missing_company_heading_aborts() {
    let mock_server = MockServer::start().await;

    mount_get(
        &mock_server,
        "/annual-reports/",
        html(r#"<a href="/company/nameless">all annual reports</a>"#),
    )
    .await;
    mount_get(&mock_server, "/company/nameless", html("<h1>No class</h1>")).await;

    let mut settings = Settings::default();
    settings.sustain.link = format!("{}/annual-reports/", mock_server.uri());
    let scraper = SustainabilityReportsScraper::new(settings.sustain, fetcher());

    let temp = TempDir::new().unwrap();
    let result = scraper.scrape(temp.path()).await;

    assert!(matches!(result, Err(ScrapeError::MissingElement { selector, .. }) if selector == "h1.entry-title"));
}

#[tokio::test]
async fn test_sustain_listing_failure_aborts_before_writing() {
    let mut settings = Settings::default();
    settings.sustain.link = UNREACHABLE.to_string();
    let scraper = SustainabilityReportsScraper::new(settings.sustain, fetcher());

    let temp = TempDir::new().unwrap();
    let result = scraper.scrape(temp.path()).await;

    assert!(matches!(result, Err(ScrapeError::PageFetch { .. })));
    assert!(dir_entries(temp.path()).is_empty());
}

// ===== Registry and runner =====

#[tokio::test]
async fn test_run_scraper_rejects_missing_save_dir_before_fetching() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut settings = Settings::default();
    settings.sustain_accounting.link = format!("{}/", mock_server.uri());
    let factory = ScraperFactory::new(settings, fetcher());
    let scraper = factory.create(ScraperName::SustainAccounting);

    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does-not-exist");
    let result = run_scraper(scraper.as_ref(), Some(&missing)).await;

    assert!(matches!(result, Err(ScrapeError::InvalidSaveDirectory(path)) if path == missing));
}

#[tokio::test]
async fn test_run_scraper_through_factory() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/",
        html(r#"<a href="https://cdn.invalid/never.html">x</a><a href="files/a.pdf">A</a>"#),
    )
    .await;
    mount_get(&mock_server, "/files/a.pdf", pdf("a")).await;

    let temp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.sustain_accounting.link = format!("{}/", mock_server.uri());
    settings.sustain_accounting.root_directory = temp.path().to_path_buf();

    let factory = ScraperFactory::new(settings, fetcher());
    let scraper = factory
        .create_by_name("sustain_accounting")
        .expect("Scraper should be registered");

    let summary = run_scraper(scraper.as_ref(), None).await.expect("Run failed");

    assert_eq!(summary.saved, 1);
    assert_eq!(dir_entries(temp.path()), vec!["a.pdf"]);
}
