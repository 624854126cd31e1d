//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch-retry-paginate cycle end-to-end over the real reqwest transport.

use std::time::Duration;
use tempfile::TempDir;
use vitrine::config::Config;
use vitrine::crawler::{
    build_http_client, crawl, FetchOutcome, Pacing, ReqwestTransport, RequestGate,
    ResilientFetcher, RetryPolicy,
};
use vitrine::output::export_all;
use vitrine::state::StopReason;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with every delay zeroed
fn create_test_config(start_url: String, max_pages: Option<usize>) -> Config {
    let mut config = Config::default();
    config.crawl.start_url = start_url;
    config.crawl.max_pages = max_pages;
    config.fetcher.max_retries = 3;
    config.fetcher.base_delay_ms = 0;
    config.fetcher.max_jitter_ms = 0;
    config.fetcher.timeout_secs = 1;
    config.fetcher.cooldown_ms = 0;
    config.fetcher.min_delay_ms = 0;
    config.fetcher.max_delay_ms = 0;
    config
}

/// A listing page with `count` product cards and an optional pager link
fn listing(page: usize, count: usize, next: Option<&str>) -> String {
    let cards: String = (1..=count)
        .map(|n| {
            format!(
                r#"<li class="col-xs-6"><article class="product_pod">
                    <p class="star-rating Two"></p>
                    <h3><a href="book-{page}-{n}/index.html" title="Book {page}-{n}">Book {page}-{n}...</a></h3>
                    <div class="product_price">
                        <p class="price_color">£1{n}.99</p>
                        <p class="instock availability"><i class="icon-ok"></i> In stock </p>
                    </div>
                </article></li>"#,
                page = page,
                n = n
            )
        })
        .collect();

    let pager = next
        .map(|href| format!(r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>All products | Books to Scrape</title></head>
        <body><ol class="row">{}</ol>{}</body></html>"#,
        cards, pager
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_follows_pager() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/catalogue/page-1.html", listing(1, 2, Some("page-2.html"))).await;
    mount_page(&mock_server, "/catalogue/page-2.html", listing(2, 2, Some("page-3.html"))).await;
    mount_page(&mock_server, "/catalogue/page-3.html", listing(3, 2, None)).await;

    let config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        None,
    );
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::NoNextPage);
    assert_eq!(outcome.page_count(), 3);
    assert_eq!(outcome.record_count(), 6);

    let first = outcome.records().next().unwrap();
    assert_eq!(first.name, "Book 1-1");
    assert_eq!(first.price, Some(11.99));
    assert_eq!(first.rating.as_deref(), Some("2"));
    assert_eq!(first.availability, "In stock");
    assert_eq!(
        first.link,
        format!("{}/catalogue/book-1-1/index.html", mock_server.uri())
    );
    assert_eq!(
        outcome.pages[2].url,
        format!("{}/catalogue/page-3.html", mock_server.uri())
    );
}

#[tokio::test]
async fn test_crawl_stops_at_page_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/catalogue/page-1.html", listing(1, 1, Some("page-2.html"))).await;
    mount_page(&mock_server, "/catalogue/page-2.html", listing(2, 1, Some("page-3.html"))).await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-3.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(3, 1, None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        Some(2),
    );
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::PageLimitReached);
    assert_eq!(outcome.page_count(), 2);
}

#[tokio::test]
async fn test_crawl_detects_cycle() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/catalogue/page-1.html", listing(1, 1, Some("page-2.html"))).await;
    mount_page(&mock_server, "/catalogue/page-2.html", listing(2, 1, Some("page-1.html"))).await;

    let config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        None,
    );
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::CycleDetected);
    assert_eq!(outcome.page_count(), 2);
}

#[tokio::test]
async fn test_server_error_is_retried_then_recovers() {
    let mock_server = MockServer::start().await;

    // First request fails, the next one succeeds
    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/catalogue/page-1.html", listing(1, 3, None)).await;

    let config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        None,
    );
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::NoNextPage);
    assert_eq!(outcome.record_count(), 3);
}

#[tokio::test]
async fn test_persistent_server_error_fails_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        None,
    );
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::FetchFailed);
    assert_eq!(outcome.page_count(), 0);
}

#[tokio::test]
async fn test_partial_failure_keeps_first_page() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/catalogue/page-1.html", listing(1, 4, Some("page-2.html"))).await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-2.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        None,
    );
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::FetchFailed);
    assert_eq!(outcome.page_count(), 1);
    assert_eq!(outcome.record_count(), 4);
}

#[tokio::test]
async fn test_captcha_page_is_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><form><div class="g-recaptcha" data-sitekey="abc"></div></form></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        None,
    );
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::FetchFailed);
    assert_eq!(outcome.record_count(), 0);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(1, 1, None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = build_http_client(Duration::from_secs(5)).unwrap();
    let policy = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::ZERO,
        timeout: Duration::from_millis(300),
        max_jitter: Duration::ZERO,
    };
    let mut fetcher = ResilientFetcher::new(
        ReqwestTransport::new(client),
        RequestGate::new(Duration::ZERO),
        policy,
        Pacing::none(),
    );

    let outcome = fetcher
        .fetch_with_retry(&format!("{}/slow", mock_server.uri()))
        .await;

    assert_eq!(outcome, FetchOutcome::Timeout);
}

#[tokio::test]
async fn test_connection_refused_is_not_retried() {
    let client = build_http_client(Duration::from_secs(2)).unwrap();
    let mut fetcher = ResilientFetcher::new(
        ReqwestTransport::new(client),
        RequestGate::new(Duration::ZERO),
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_secs(30),
            timeout: Duration::from_secs(2),
            max_jitter: Duration::ZERO,
        },
        Pacing::none(),
    );

    // A 30s backoff would make this test hang if the failure were retried
    let outcome = fetcher.fetch_with_retry("http://127.0.0.1:1/").await;

    assert_eq!(outcome, FetchOutcome::ConnectionError);
}

#[tokio::test]
async fn test_requests_carry_browser_identity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .and(header("dnt", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client(Duration::from_secs(2)).unwrap();
    let mut fetcher = ResilientFetcher::new(
        ReqwestTransport::new(client),
        RequestGate::new(Duration::ZERO),
        RetryPolicy {
            max_retries: 1,
            ..RetryPolicy::default()
        },
        Pacing::none(),
    );

    let outcome = fetcher
        .fetch_with_retry(&format!("{}/", mock_server.uri()))
        .await;

    assert!(outcome.is_success());
    assert_eq!(fetcher.gate().len(), 1);
}

#[tokio::test]
async fn test_crawl_then_export() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/catalogue/page-1.html", listing(1, 2, None)).await;

    let output_dir = TempDir::new().unwrap();
    let mut config = create_test_config(
        format!("{}/catalogue/page-1.html", mock_server.uri()),
        None,
    );
    config.output.directory = output_dir.path().to_path_buf();
    config.output.json = true;
    config.output.excel = true;

    let outcome = crawl(&config).await.unwrap();
    let records = outcome.into_records();
    let results = export_all(&records, &config.output, "scraped_20240101_000000");

    for (format, result) in &results {
        assert!(result.is_ok(), "{} export failed", format);
    }
    assert!(output_dir
        .path()
        .join("scraped_20240101_000000.xlsx")
        .exists());

    let csv = std::fs::read_to_string(output_dir.path().join("scraped_20240101_000000.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("name,price,category,description,availability,rating,link")
    );
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn test_crawl_rejects_unknown_profile() {
    let mut config = create_test_config("https://books.toscrape.com/".to_string(), None);
    config.crawl.profile = "shopify".to_string();

    assert!(crawl(&config).await.is_err());
}
