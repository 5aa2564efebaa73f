//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tinytrip::config::{Config, OutputConfig, OutputMode};
use tinytrip::crawler::crawl;
use tinytrip::output::ProgressReporter;
use tinytrip::{to_file_name, CrawlReport};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::ZipArchive;

/// Creates a test configuration writing to `out`
fn create_test_config(mode: OutputMode, out: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.timeout_secs = 5;
    config.output = OutputConfig {
        mode,
        path: Some(out.to_string_lossy().into_owned()),
    };
    config
}

/// Serves an HTML page with the given links; the page must be requested exactly once
async fn mount_page(server: &MockServer, page: &str, links: &[&str]) {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    let body = format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        page, anchors
    );

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .expect(1)
        .mount(server)
        .await;
}

/// Asserts that a page is never requested
async fn mount_untouched(server: &MockServer, page: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

async fn run(seed: &str, config: &Config) -> CrawlReport {
    crawl(seed, config, ProgressReporter::silent())
        .await
        .expect("crawl failed")
}

fn read_document(path: &Path) -> BTreeMap<String, String> {
    let file = File::open(path).expect("document missing");
    serde_json::from_reader(file).expect("document is not a JSON object of strings")
}

fn read_archive(path: &Path) -> BTreeMap<String, String> {
    let mut archive = ZipArchive::new(File::open(path).expect("archive missing")).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        entries.insert(entry.name().to_string(), content);
    }
    entries
}

#[tokio::test]
async fn test_archive_crawl_with_cycle_and_dead_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/index.html", &["a.html", "b.html", "a.html"]).await;
    mount_page(&server, "/a.html", &["/b.html", "/index.html"]).await;
    mount_page(&server, "/b.html", &["a.html", "missing.html", "logo.png"]).await;
    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_untouched(&server, "/logo.png").await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data").join("out.zip");
    let config = create_test_config(OutputMode::Archive, &out);

    let report = run(&format!("{}/index.html", base), &config).await;

    assert_eq!(
        report.urls,
        vec![
            format!("{}/a.html", base),
            format!("{}/b.html", base),
            format!("{}/index.html", base),
        ]
    );
    assert_eq!(report.pages, 3);
    assert_eq!(report.failures, 1);
    assert!(!report.interrupted);
    assert_eq!(report.output, out);

    let entries = read_archive(&out);
    assert_eq!(entries.len(), 3);
    let index_entry = to_file_name(&format!("{}/index.html", base), ".html");
    assert!(entries[&index_entry].contains("<title>/index.html</title>"));
    assert!(!entries.contains_key(&to_file_name(&format!("{}/missing.html", base), ".html")));
}

#[tokio::test]
async fn test_archive_is_appended_across_runs() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/first.html", &[]).await;
    mount_page(&server, "/second.html", &[]).await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.zip");
    let config = create_test_config(OutputMode::Archive, &out);

    run(&format!("{}/first.html", base), &config).await;
    run(&format!("{}/second.html", base), &config).await;

    let entries = read_archive(&out);
    assert_eq!(entries.len(), 2);
    assert!(entries.contains_key(&to_file_name(&format!("{}/first.html", base), ".html")));
    assert!(entries.contains_key(&to_file_name(&format!("{}/second.html", base), ".html")));
}

#[tokio::test]
async fn test_document_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/index.html", &["docs/intro.html", "docs/setup.htm"]).await;
    mount_page(&server, "/docs/intro.html", &["setup.htm", "../index.html"]).await;
    mount_page(&server, "/docs/setup.htm", &[]).await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site.json");
    let config = create_test_config(OutputMode::Document, &out);

    let report = run(&format!("{}/index.html", base), &config).await;

    let document = read_document(&out);
    let keys: Vec<String> = document.keys().cloned().collect();
    assert_eq!(keys, report.urls);
    assert_eq!(keys.len(), 3);
    assert!(document[&format!("{}/docs/setup.htm", base)].contains("/docs/setup.htm"));
}

#[tokio::test]
async fn test_document_written_when_seed_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.json");
    let config = create_test_config(OutputMode::Document, &out);

    let report = run(&format!("{}/index.html", server.uri()), &config).await;

    assert!(report.urls.is_empty());
    assert!(report.has_failures());
    assert!(read_document(&out).is_empty());
}

#[tokio::test]
async fn test_filters_applied_to_discovered_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/index.html",
        &[
            "/guide.html",
            "/private/secret.html",
            "https://elsewhere.invalid/page.html",
            "/report.pdf",
        ],
    )
    .await;
    mount_page(&server, "/guide.html", &[]).await;
    mount_untouched(&server, "/private/secret.html").await;
    mount_untouched(&server, "/report.pdf").await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("filtered.json");
    let mut config = create_test_config(OutputMode::Document, &out);
    config.filter.whitelist = vec![r"127\.0\.0\.1".to_string()];
    config.filter.blacklist = vec!["/private".to_string()];

    let report = run(&format!("{}/index.html", base), &config).await;

    assert_eq!(
        report.urls,
        vec![format!("{}/guide.html", base), format!("{}/index.html", base)]
    );
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/old.html"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new/page.html", base).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/new/page.html", &["sibling.html"]).await;
    mount_page(&server, "/new/sibling.html", &[]).await;
    mount_untouched(&server, "/sibling.html").await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("redirect.json");
    let config = create_test_config(OutputMode::Document, &out);

    let report = run(&format!("{}/old.html", base), &config).await;

    assert_eq!(
        report.urls,
        vec![format!("{}/new/sibling.html", base), format!("{}/old.html", base)]
    );
}

#[tokio::test]
async fn test_concurrent_crawl_matches_sequential() {
    async fn crawl_site(concurrency: u32) -> (Vec<String>, Vec<String>) {
        let server = MockServer::start().await;
        let base = server.uri();

        mount_page(&server, "/index.html", &["/s1/a.html", "/s2/a.html", "/s3/a.html"]).await;
        for section in ["s1", "s2", "s3"] {
            mount_page(&server, &format!("/{}/a.html", section), &["b.html", "/index.html"]).await;
            mount_page(&server, &format!("/{}/b.html", section), &["c.html", "/s1/a.html"]).await;
            mount_page(&server, &format!("/{}/c.html", section), &["/s2/b.html"]).await;
        }

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        let mut config = create_test_config(OutputMode::Document, &out);
        config.crawler.concurrency = concurrency;

        let report = run(&format!("{}/index.html", base), &config).await;
        let keys: Vec<String> = read_document(&out).into_keys().collect();

        let strip = |url: &String| url.trim_start_matches(base.as_str()).to_string();
        (
            report.urls.iter().map(strip).collect(),
            keys.iter().map(strip).collect(),
        )
    }

    let (sequential_urls, sequential_keys) = crawl_site(1).await;
    let (concurrent_urls, concurrent_keys) = crawl_site(4).await;

    assert_eq!(sequential_urls.len(), 10);
    assert_eq!(sequential_urls, concurrent_urls);
    assert_eq!(sequential_keys, concurrent_keys);
    assert_eq!(sequential_urls, sequential_keys);
}

#[tokio::test]
async fn test_max_pages_stops_claiming() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/index.html", &["a.html", "b.html"]).await;
    mount_page(&server, "/a.html", &[]).await;
    mount_untouched(&server, "/b.html").await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("limited.json");
    let mut config = create_test_config(OutputMode::Document, &out);
    config.crawler.max_pages = Some(2);

    let report = run(&format!("{}/index.html", base), &config).await;

    assert_eq!(report.pages, 2);
}
