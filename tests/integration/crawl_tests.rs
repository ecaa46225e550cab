//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_corpus::config::{
    BoilerplatePattern, Config, CrawlerConfig, NormalizerConfig, OutputConfig, UserAgentConfig,
};
use site_corpus::crawler::{
    build_http_client, fetch_url, run_crawl, Controller, CrawlLimits, FetchResult, HttpFetcher,
};
use site_corpus::output::read_raw_corpus;
use site_corpus::url::{ScopePolicy, UrlFilter};
use site_corpus::{normalize_corpus, CorpusWriter, Normalizer, Termination};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML response
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/contact".to_string()),
    }
}

/// Creates a controller confined to the mock server's host
fn create_controller(page_budget: usize, workers: usize) -> Controller<HttpFetcher> {
    let client = build_http_client(&test_user_agent(), Duration::from_secs(5))
        .expect("Failed to build HTTP client");

    Controller::new(
        HttpFetcher::new(client),
        UrlFilter::new("127.0.0.1", ScopePolicy::Suffix),
        CrawlLimits {
            page_budget,
            delay: Duration::ZERO,
            workers,
        },
    )
}

fn seed(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL")
}

fn paths(documents: &[site_corpus::CrawlDocument], server: &MockServer) -> Vec<String> {
    documents
        .iter()
        .map(|d| d.url.trim_start_matches(&server.uri()).to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <a href="/page1">Page 1</a>
        <a href="page2">Page 2</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><p>First page</p><a href="/page2">Again</a><a href="/page3">Three</a></body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body><p>Second page</p><a href="/">Home</a></body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page3",
        r#"<html><body><p>Third page</p></body></html>"#,
    )
    .await;

    let controller = create_controller(10, 1);
    let report = controller
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(
        paths(&report.documents, &mock_server),
        vec!["/", "/page1", "/page2", "/page3"]
    );
    assert_eq!(report.documents[0].text, "Home\nPage 1\nPage 2");
    assert_eq!(report.documents[1].text, "First page\nAgain\nThree");
    assert_eq!(report.visited, 4);
    assert_eq!(report.failures, 0);
    assert_eq!(report.termination, Termination::FrontierExhausted);
}

#[tokio::test]
async fn test_out_of_scope_links_not_fetched() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    // Same port space, different host name: out of scope for 127.0.0.1
    let other_port = Url::parse(&other_server.uri())
        .expect("Failed to parse other URL")
        .port()
        .expect("Mock server has a port");

    Mock::given(method("GET"))
        .respond_with(html("<p>should not be crawled</p>"))
        .expect(0)
        .mount(&other_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="http://localhost:{}/secret">Elsewhere</a>
               <a href="https://example.org/">External</a>
               <a href="/inside">Inside</a>"#,
            other_port
        ),
    )
    .await;
    mount_page(&mock_server, "/inside", "<p>inside</p>").await;

    let report = create_controller(10, 1)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&report.documents, &mock_server), vec!["/", "/inside"]);
}

#[tokio::test]
async fn test_page_budget_stops_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">1</a><a href="/page2">2</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", "<p>one</p>").await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("<p>two</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = create_controller(2, 1)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&report.documents, &mock_server), vec!["/", "/page1"]);
    assert_eq!(report.visited, 2);
    assert_eq!(report.termination, Termination::BudgetExhausted);
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_seed() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">1</a><a href="/page2">2</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html("<p>one</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = create_controller(1, 1)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.visited, 1);
}

#[tokio::test]
async fn test_failed_pages_are_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/missing">Missing</a><a href="/ok">OK</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<p>still crawled</p>").await;

    let report = create_controller(10, 1)
        .run(seed(&mock_server))
        .await
        .expect("Failed pages must not abort the crawl");

    assert_eq!(paths(&report.documents, &mock_server), vec!["/", "/ok"]);
    assert_eq!(report.failures, 2);
    assert_eq!(report.visited, 4);
}

#[tokio::test]
async fn test_seed_failure_yields_empty_corpus() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let report = create_controller(10, 1)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert!(report.documents.is_empty());
    assert_eq!(report.visited, 1);
    assert_eq!(report.failures, 1);
}

#[tokio::test]
async fn test_unresponsive_page_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>too late</p>").set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&test_user_agent(), Duration::from_secs(1))
        .expect("Failed to build HTTP client");

    let outcome = fetch_url(&client, &seed(&mock_server)).await;
    assert!(
        matches!(outcome, FetchResult::NetworkError { timed_out: true, .. }),
        "unexpected outcome: {:?}",
        outcome
    );

    let controller = Controller::new(
        HttpFetcher::new(client),
        UrlFilter::new("127.0.0.1", ScopePolicy::Suffix),
        CrawlLimits {
            page_budget: 10,
            delay: Duration::ZERO,
            workers: 1,
        },
    );

    let started = std::time::Instant::now();
    let report = controller
        .run(seed(&mock_server))
        .await
        .expect("A timeout must not abort the crawl");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(report.documents.is_empty());
    assert_eq!(report.visited, 1);
    assert_eq!(report.failures, 1);
    assert_eq!(report.termination, Termination::FrontierExhausted);
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/report.pdf">PDF</a><a href="/data.json">JSON</a><a href="/page">Page</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/page", "<p>html page</p>").await;

    let report = create_controller(10, 1)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&report.documents, &mock_server), vec!["/", "/page"]);
    assert_eq!(report.failures, 2);
}

#[tokio::test]
async fn test_links_resolved_against_redirect_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new/"))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/new/",
        r#"<p>moved</p><a href="child">Child</a>"#,
    )
    .await;
    mount_page(&mock_server, "/new/child", "<p>child</p>").await;

    let start = Url::parse(&format!("{}/old", mock_server.uri())).expect("Failed to parse URL");
    let report = create_controller(10, 1)
        .run(start)
        .await
        .expect("Crawl failed");

    assert_eq!(
        paths(&report.documents, &mock_server),
        vec!["/old", "/new/child"]
    );
    assert_eq!(report.documents[0].text, "moved\nChild");
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(html("<p>hello bot</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = create_controller(10, 1)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.documents.len(), 1);
}

#[tokio::test]
async fn test_worker_pool_crawl() {
    let mock_server = MockServer::start().await;

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 0..20 {
        mount_page(
            &mock_server,
            &format!("/p{}", i),
            &format!(r#"<p>page {}</p><a href="/">home</a>"#, i),
        )
        .await;
    }

    let report = create_controller(8, 4)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited, 8);
    assert_eq!(report.documents.len(), 8);
    assert_eq!(report.termination, Termination::BudgetExhausted);

    let mut urls: Vec<&str> = report.documents.iter().map(|d| d.url.as_str()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 8);

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording is enabled");
    assert_eq!(requests.len(), 8);
}

#[tokio::test]
async fn test_crawl_write_and_normalize() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Medicaid Enterprise | Gainwell</title></head>
        <body><p>Welcome   to the   portal</p><a href="/about">About</a></body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/about",
        r#"<p>About us</p><footer>Gainwell Technologies</footer>"#,
    )
    .await;

    let config = Config {
        crawler: CrawlerConfig {
            seed_url: Some(format!("{}/", mock_server.uri())),
            delay_ms: 0,
            timeout_secs: 5,
            ..Default::default()
        },
        user_agent: test_user_agent(),
        output: OutputConfig {
            raw_path: dir.path().join("raw/corpus.json").display().to_string(),
            cleaned_jsonl_path: dir.path().join("processed/clean.jsonl").display().to_string(),
            cleaned_text_path: dir.path().join("processed/clean.txt").display().to_string(),
        },
        normalizer: NormalizerConfig {
            patterns: vec![
                BoilerplatePattern::Literal("Medicaid Enterprise | Gainwell".to_string()),
                BoilerplatePattern::Literal("Gainwell Technologies".to_string()),
            ],
        },
    };

    let report = run_crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");
    assert_eq!(report.documents.len(), 2);

    let raw = CorpusWriter::new(&config.output.raw_path)
        .write(&report.documents)
        .expect("Failed to write corpus");
    assert_eq!(read_raw_corpus(&raw).expect("Corpus unreadable"), report.documents);

    let normalizer = Normalizer::from_config(&config).expect("Invalid patterns");
    let jsonl = dir.path().join("processed/clean.jsonl");
    let text = dir.path().join("processed/clean.txt");
    let summary =
        normalize_corpus(&raw, &jsonl, &text, &normalizer).expect("Normalization failed");
    assert_eq!(summary.records, 2);

    let lines: Vec<String> = std::fs::read_to_string(&jsonl)
        .expect("JSONL missing")
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(
        lines,
        vec![
            format!(
                r#"{{"url":"{}/","text":"Welcome to the portal About"}}"#,
                mock_server.uri()
            ),
            format!(r#"{{"url":"{}/about","text":"About us"}}"#, mock_server.uri()),
        ]
    );

    let dump = std::fs::read_to_string(&text).expect("Text dump missing");
    assert!(dump.starts_with(&format!("[Document 1] {}/\n", mock_server.uri())));
    assert!(dump.contains(&format!("[Document 2] {}/about\nAbout us\n\n", mock_server.uri())));
}

#[tokio::test]
async fn test_cancelled_crawl_fetches_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<p>never</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = create_controller(10, 1)
        .with_cancellation(cancel)
        .run(seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert!(report.documents.is_empty());
    assert_eq!(report.termination, Termination::Cancelled);
}
