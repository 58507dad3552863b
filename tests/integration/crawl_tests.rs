//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the real
//! HTTP transport through full crawls end-to-end.

use sitegraph::config::{Config, CrawlerConfig, HttpConfig, OutputConfig, OutputFormat};
use sitegraph::crawler::{crawl, Crawler, HttpTransport};
use sitegraph::output::export;
use sitegraph::{CanonicalUrl, CrawlReport, PageState, SitegraphError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings with pacing disabled so tests run fast
fn test_crawler_config() -> CrawlerConfig {
    CrawlerConfig {
        politeness_delay_ms: 0,
        ..CrawlerConfig::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

/// Answers every HEAD request with 200 so effective URLs equal requested ones
async fn mount_head_ok(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn run_crawl(server: &MockServer, max_depth: u32) -> CrawlReport {
    let transport = HttpTransport::new(&HttpConfig::default()).expect("Failed to build transport");
    Crawler::new(&transport, &test_crawler_config())
        .crawl(&format!("{}/", server.uri()), max_depth)
        .await
        .expect("Crawl failed")
}

fn state_of(report: &CrawlReport, url: &str) -> PageState {
    let url = CanonicalUrl::parse(url).expect("Invalid test URL");
    let index = report
        .graph
        .index_of(&url)
        .unwrap_or_else(|| panic!("{} is not in the graph", url));
    report.graph.get(index).expect("Missing node").state()
}

#[tokio::test]
async fn test_single_hop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_head_ok(&mock_server).await;
    mount_page(&mock_server, "/", r#"<a href="/a">A</a> <a href="/b">B</a>"#).await;

    // Children are at depth zero and must never be fetched
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html("A"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server, 1).await;

    assert_eq!(report.graph.len(), 3);
    assert_eq!(report.graph.edge_count(), 2);
    assert_eq!(report.root_url().unwrap().as_str(), format!("{}/", base_url));
    assert_eq!(state_of(&report, &format!("{}/", base_url)), PageState::Expanded);
    assert_eq!(state_of(&report, &format!("{}/a", base_url)), PageState::DepthExhausted);
    assert_eq!(state_of(&report, &format!("{}/b", base_url)), PageState::DepthExhausted);

    // HEAD root, GET root, HEAD /a, HEAD /b
    assert_eq!(report.requests, 4);
    assert!(!report.budget_exhausted);
}

#[tokio::test]
async fn test_redirect_collapses_to_effective_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(307).insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_head_ok(&mock_server).await;
    mount_page(&mock_server, "/", r#"<a href="/old">Old</a> <a href="/new">New</a>"#).await;

    let report = run_crawl(&mock_server, 1).await;

    assert_eq!(report.graph.len(), 2);
    assert_eq!(report.graph.edge_count(), 1);

    let old = CanonicalUrl::parse(&format!("{}/old", base_url)).unwrap();
    assert!(!report.graph.exists(&old));
    assert_eq!(state_of(&report, &format!("{}/new", base_url)), PageState::DepthExhausted);
}

#[tokio::test]
async fn test_missing_page_becomes_failed_leaf() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_head_ok(&mock_server).await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a> <a href="/ok">Ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "no links here").await;

    let report = run_crawl(&mock_server, 2).await;

    assert_eq!(report.graph.len(), 3);
    assert_eq!(state_of(&report, &format!("{}/missing", base_url)), PageState::FetchFailed);
    assert_eq!(state_of(&report, &format!("{}/ok", base_url)), PageState::Expanded);

    let missing = CanonicalUrl::parse(&format!("{}/missing", base_url)).unwrap();
    let node = report.graph.get(report.graph.index_of(&missing).unwrap()).unwrap();
    assert!(node.is_leaf());
    assert!(node.error().unwrap().contains("404"));
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_head_ok(&mock_server).await;

    // Create a chain: / -> level1 -> level2 -> level3
    mount_page(&mock_server, "/", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">Level 2</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html(r#"<a href="/level3">Level 3</a>"#))
        .expect(0) // Should never be fetched with max_depth=2
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server, 2).await;

    assert_eq!(report.graph.len(), 3);
    assert_eq!(state_of(&report, &format!("{}/level1", base_url)), PageState::Expanded);
    assert_eq!(state_of(&report, &format!("{}/level2", base_url)), PageState::DepthExhausted);

    let level3 = CanonicalUrl::parse(&format!("{}/level3", base_url)).unwrap();
    assert!(!report.graph.exists(&level3));
}

#[tokio::test]
async fn test_cycle_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_head_ok(&mock_server).await;
    mount_page(&mock_server, "/", r#"<a href="/loop">Loop</a>"#).await;
    mount_page(&mock_server, "/loop", r#"<a href="/">Home</a> <a href="/loop/">Self</a>"#).await;

    let report = run_crawl(&mock_server, 5).await;

    // Root, /loop; the back link and the trailing-slash self link add edges only
    assert_eq!(report.graph.len(), 2);
    assert_eq!(report.graph.edge_count(), 3);
    assert_eq!(state_of(&report, &format!("{}/loop", base_url)), PageState::Expanded);
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_head_ok(&mock_server).await;
    mount_page(&mock_server, "/", r#"<a href="/doc.pdf">Document</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server, 2).await;

    assert_eq!(
        state_of(&report, &format!("{}/doc.pdf", base_url)),
        PageState::ContentMismatch
    );
}

#[tokio::test]
async fn test_latin1_page_is_decoded_and_expanded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_head_ok(&mock_server).await;

    // "café" encoded as ISO-8859-1 is not valid UTF-8
    let mut body = b"<html><body><p>caf".to_vec();
    body.push(0xE9);
    body.extend_from_slice(br#"</p><a href="/x">x</a></body></html>"#);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1"))
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server, 1).await;

    assert_eq!(report.graph.len(), 2);
    assert_eq!(report.graph.edge_count(), 1);
    assert_eq!(state_of(&report, &format!("{}/", base_url)), PageState::Expanded);
    assert_eq!(state_of(&report, &format!("{}/x", base_url)), PageState::DepthExhausted);
}

#[tokio::test]
async fn test_unreachable_root_is_fatal() {
    let transport = HttpTransport::new(&HttpConfig::default()).unwrap();
    let result = Crawler::new(&transport, &test_crawler_config())
        .crawl("http://127.0.0.1:1/", 2)
        .await;

    assert!(matches!(result, Err(SitegraphError::RootResolution { .. })));
}

#[tokio::test]
async fn test_invalid_root_is_rejected_without_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(&HttpConfig::default()).unwrap();
    let result = Crawler::new(&transport, &test_crawler_config())
        .crawl("ftp://example.com/", 2)
        .await;

    assert!(matches!(result, Err(SitegraphError::Url(_))));
}

#[tokio::test]
async fn test_crawl_and_export() {
    let mock_server = MockServer::start().await;

    mount_head_ok(&mock_server).await;
    mount_page(&mock_server, "/", r#"<a href="/a">A</a> <a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/b", "leaf").await;

    let dir = TempDir::new().unwrap();
    let config = Config {
        crawler: test_crawler_config(),
        http: HttpConfig::default(),
        output: OutputConfig {
            directory: dir.path().to_path_buf(),
            file_stem: "site".to_string(),
            formats: vec![
                OutputFormat::Svg,
                OutputFormat::Dot,
                OutputFormat::Markdown,
                OutputFormat::Sqlite,
            ],
        },
    };

    let report = crawl(&config, &format!("{}/", mock_server.uri()), 2)
        .await
        .expect("Crawl failed");
    assert_eq!(report.graph.len(), 3);
    assert_eq!(report.graph.edge_count(), 3);

    let written = export(&report, &config.output, Some("deadbeef")).expect("Export failed");
    assert_eq!(written.len(), 4);

    let summary = std::fs::read_to_string(dir.path().join("site.md")).unwrap();
    assert!(summary.contains("- **Total Pages**: 3"));
    assert!(summary.contains("- **Config Hash**: deadbeef"));

    let dot = std::fs::read_to_string(dir.path().join("site.dot")).unwrap();
    assert!(dot.contains("digraph {"));

    let svg = std::fs::read_to_string(dir.path().join("site.svg")).unwrap();
    assert_eq!(svg.matches("<circle").count(), 3);

    assert!(dir.path().join("site.db").exists());
}
