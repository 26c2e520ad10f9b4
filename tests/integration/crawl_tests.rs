//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sumi_corpus::config::Config;
use sumi_corpus::crawler::{Coordinator, FrontierEntry, PageRecord};
use sumi_corpus::output::CrawlOutput;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given start URL
fn create_test_config(start_url: &str, max_pages: usize, max_depth: u32, concurrency: usize) -> Config {
    let mut config = Config::new(start_url);
    config.crawl.max_pages = max_pages;
    config.crawl.max_depth = max_depth;
    config.crawl.concurrency = concurrency;
    config.http.page_timeout_secs = 5;
    config.http.endpoint_timeout_secs = 5;
    config
}

/// Builds a small HTML page with a paragraph and the given anchors
fn html_page(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <h1>{title}</h1>
        <p>This page is called {title} and has enough words to be kept.</p>
        {links}
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html"),
        )
        .mount(server)
        .await;
}

async fn run(config: Config) -> Vec<PageRecord> {
    Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
}

fn page_urls(records: &[PageRecord]) -> HashSet<String> {
    records.iter().map(|r| r.url.clone()).collect()
}

async fn request_count(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

#[tokio::test]
async fn test_three_page_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("A", &["/b", "/c"])).await;
    mount_page(&mock_server, "/b", html_page("B", &["/", "https://external.example/x"])).await;
    mount_page(&mock_server, "/c", html_page("C", &["/", "https://external.example/x"])).await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 1, 2)).await;

    let expected: HashSet<String> = ["/", "/b", "/c"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(page_urls(&records), expected);

    // Back-links to A never trigger a second fetch
    assert_eq!(request_count(&mock_server, "/").await, 1);
    assert_eq!(request_count(&mock_server, "/b").await, 1);
    assert_eq!(request_count(&mock_server, "/c").await, 1);

    // The start page comes first: later batches only hold deeper pages
    assert_eq!(records[0].url, format!("{}/", base_url));
    assert_eq!(
        records[0].chunks,
        vec!["A This page is called A and has enough words to be kept.".to_string()]
    );
}

#[tokio::test]
async fn test_max_pages_one_yields_start_page_only() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("A", &["/b", "/c", "/d", "/e"])).await;
    for route in ["/b", "/c", "/d", "/e"] {
        mount_page(&mock_server, route, html_page(route, &[])).await;
    }

    let records = run(create_test_config(&format!("{}/", base_url), 1, 2, 10)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/", base_url));

    let total_requests = mock_server.received_requests().await.unwrap().len();
    assert_eq!(total_requests, 1);
}

#[tokio::test]
async fn test_page_budget_bounds_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let all = ["/", "/p1", "/p2", "/p3", "/p4", "/p5"];
    for route in all {
        mount_page(&mock_server, route, html_page(route, &all)).await;
    }

    let records = run(create_test_config(&format!("{}/", base_url), 3, 3, 10)).await;

    assert_eq!(records.len(), 3);
    assert_eq!(page_urls(&records).len(), 3);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_each_url_fetched_once_under_concurrency() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Every page links to every other page, twice
    let all = ["/", "/p1", "/p2", "/p3", "/p4", "/p1", "/p2", "/p3", "/p4"];
    for route in ["/", "/p1", "/p2", "/p3", "/p4"] {
        mount_page(&mock_server, route, html_page(route, &all)).await;
    }

    let records = run(create_test_config(&format!("{}/", base_url), 20, 3, 10)).await;

    assert_eq!(records.len(), 5);
    assert_eq!(page_urls(&records).len(), 5);
    for route in ["/", "/p1", "/p2", "/p3", "/p4"] {
        assert_eq!(request_count(&mock_server, route).await, 1, "{} fetched twice", route);
    }
}

#[tokio::test]
async fn test_pdf_and_image_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <h1>Downloads</h1>
            <a href="report.pdf">Annual report</a>
            <img src="logo.png">
        </body></html>"#
            .to_string(),
    )
    .await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 0, 2)).await;

    assert_eq!(records.len(), 1);
    let page = &records[0];

    assert_eq!(page.pdfs.len(), 1);
    assert_eq!(page.pdfs[0].name, "report.pdf");
    assert_eq!(page.pdfs[0].url, format!("{}/report.pdf", base_url));

    assert_eq!(page.images.len(), 1);
    assert_eq!(page.images[0].name, "logo.png");
    assert_eq!(page.images[0].url, format!("{}/logo.png", base_url));

    assert_eq!(page.chunks, vec!["Downloads".to_string()]);
}

#[tokio::test]
async fn test_dynamic_endpoint_text_is_merged() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <h1>Catalog</h1>
            <div id="app"></div>
            <script>
                fetch("/api/courses");
                fetch("/api/broken");
                fetch("/api/not-json");
            </script>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"id": 1, "description": "Learn the fundamentals of ownership"},
                {"id": 2, "description": "short"}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/api/not-json", "<html>nope</html>".to_string()).await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 0, 2)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].chunks,
        vec!["Catalog Learn the fundamentals of ownership".to_string()]
    );
    assert_eq!(request_count(&mock_server, "/api/courses").await, 1);
    assert_eq!(request_count(&mock_server, "/api/broken").await, 1);
}

#[tokio::test]
async fn test_endpoint_untyped_json_is_parsed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<script>var url = '/data/GetSummary';</script>"#.to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/data/GetSummary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"["A summary served as plain text"]"#, "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 0, 2)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].chunks,
        vec!["A summary served as plain text".to_string()]
    );
}

#[tokio::test]
async fn test_login_and_tracking_links_excluded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", &["/login", "/about?utm_source=footer", "/docs"]),
    )
    .await;
    mount_page(&mock_server, "/login", html_page("Login", &[])).await;
    mount_page(&mock_server, "/about", html_page("About", &[])).await;
    mount_page(&mock_server, "/docs", html_page("Docs", &[])).await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 2, 5)).await;

    let expected: HashSet<String> = [format!("{}/", base_url), format!("{}/docs", base_url)]
        .into_iter()
        .collect();
    assert_eq!(page_urls(&records), expected);
    assert_eq!(request_count(&mock_server, "/login").await, 0);
    assert_eq!(request_count(&mock_server, "/about").await, 0);
}

#[tokio::test]
async fn test_failed_pages_are_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("Home", &["/missing", "/error", "/ok"])).await;
    mount_page(&mock_server, "/ok", html_page("Ok", &[])).await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 1, 4)).await;

    let expected: HashSet<String> = [format!("{}/", base_url), format!("{}/ok", base_url)]
        .into_iter()
        .collect();
    assert_eq!(page_urls(&records), expected);
}

#[tokio::test]
async fn test_missing_start_page_yields_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let records = run(create_test_config(&format!("{}/", base_url), 10, 2, 2)).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_admitted_depth_never_exceeds_max_depth() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("Root", &["/1"])).await;
    mount_page(&mock_server, "/1", html_page("One", &["/2"])).await;
    mount_page(&mock_server, "/2", html_page("Two", &["/3"])).await;
    mount_page(&mock_server, "/3", html_page("Three", &["/4"])).await;

    let admitted: Arc<Mutex<Vec<FrontierEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&admitted);

    let records = Coordinator::new(create_test_config(&format!("{}/", base_url), 10, 2, 3))
        .expect("Failed to create coordinator")
        .with_admission_hook(Arc::new(move |entry: &FrontierEntry| {
            sink.lock().unwrap().push(entry.clone());
        }))
        .run()
        .await;

    let admitted = admitted.lock().unwrap();
    assert_eq!(admitted.len(), 3);
    assert!(admitted.iter().all(|entry| entry.depth <= 2));
    assert_eq!(records.len(), 3);
    assert_eq!(request_count(&mock_server, "/3").await, 0);
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestCorpus/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("Home", &[]), "text/html"),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), 10, 0, 1);
    config.http.user_agent = "TestCorpus/1.0".to_string();

    let records = run(config).await;
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_output_document_shape() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let start_url = format!("{}/", base_url);

    mount_page(&mock_server, "/", html_page("Home", &[])).await;

    let records = run(create_test_config(&start_url, 10, 0, 1)).await;
    let output = CrawlOutput::new(start_url.clone(), records);
    let value: serde_json::Value = serde_json::from_str(&output.to_json(false).unwrap()).unwrap();

    assert_eq!(value["url"], start_url.as_str());
    assert_eq!(value["pages"].as_array().unwrap().len(), 1);
    assert!(value["pages"][0]["chunks"].is_array());
    assert!(value["pages"][0]["pdfs"].is_array());
    assert!(value["pages"][0]["images"].is_array());
}

#[tokio::test]
async fn test_plain_text_page_is_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<h1>Home</h1><p>one two three four five six</p>",
            "text/plain",
        ))
        .mount(&mock_server)
        .await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 0, 1)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].chunks,
        vec!["Home one two three four five six".to_string()]
    );
}

#[tokio::test]
async fn test_binary_page_is_dropped_but_spent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("Home", &["/file", "/file"])).await;
    Mock::given(method("GET"))
        .and(path("/file"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;

    let records = run(create_test_config(&format!("{}/", base_url), 10, 1, 2)).await;

    assert_eq!(page_urls(&records), HashSet::from([format!("{}/", base_url)]));
    assert_eq!(request_count(&mock_server, "/file").await, 1);
}

/// Serves a page that references three `/api/` endpoints, each returning text
async fn mount_endpoint_site(server: &MockServer, delay: Duration) {
    mount_page(
        server,
        "/",
        r#"<html><body>
            <h1>Dashboard</h1>
            <script>
                fetch("/api/one");
                fetch("/api/two");
                fetch("/api/three");
            </script>
        </body></html>"#
            .to_string(),
    )
    .await;

    for route in ["/api/one", "/api/two", "/api/three"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([format!("Text served by the {} endpoint", route)]))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }
}

async fn api_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .filter(|request| request.url.path().starts_with("/api/"))
        .count()
}

#[tokio::test]
async fn test_endpoint_cap_limits_fetches() {
    for (cap, expected) in [(0, 0), (1, 1), (50, 3)] {
        let mock_server = MockServer::start().await;
        mount_endpoint_site(&mock_server, Duration::ZERO).await;

        let mut config = create_test_config(&format!("{}/", mock_server.uri()), 10, 0, 1);
        config.extract.max_endpoints_per_page = cap;

        let records = run(config).await;

        assert_eq!(records.len(), 1);
        assert_eq!(api_request_count(&mock_server).await, expected, "cap {}", cap);
        assert!(records[0].chunks[0].starts_with("Dashboard"));
    }
}

#[tokio::test]
async fn test_endpoint_cap_keeps_first_sorted_endpoint() {
    let mock_server = MockServer::start().await;
    mount_endpoint_site(&mock_server, Duration::ZERO).await;

    let mut config = create_test_config(&format!("{}/", mock_server.uri()), 10, 0, 1);
    config.extract.max_endpoints_per_page = 1;

    let records = run(config).await;

    assert_eq!(request_count(&mock_server, "/api/one").await, 1);
    assert_eq!(
        records[0].chunks,
        vec!["Dashboard Text served by the /api/one endpoint".to_string()]
    );
}

#[tokio::test]
async fn test_endpoint_concurrency_is_bounded() {
    let mock_server = MockServer::start().await;
    mount_endpoint_site(&mock_server, Duration::from_millis(300)).await;

    let mut config = create_test_config(&format!("{}/", mock_server.uri()), 10, 0, 1);
    config.extract.endpoint_concurrency = 1;

    let started = Instant::now();
    let records = run(config).await;
    let elapsed = started.elapsed();

    assert_eq!(records.len(), 1);
    assert_eq!(api_request_count(&mock_server).await, 3);
    // Three sequential 300ms fetches
    assert!(elapsed >= Duration::from_millis(900), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_page_fetches_bounded_by_concurrency() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let children = ["/a", "/b", "/c", "/d"];
    mount_page(&mock_server, "/", html_page("Root", &children)).await;
    for route in children {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(html_page(route, &[]), "text/html")
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&mock_server)
            .await;
    }

    let started = Instant::now();
    let records = run(create_test_config(&format!("{}/", base_url), 10, 1, 2)).await;
    let elapsed = started.elapsed();

    assert_eq!(records.len(), 5);
    // Four delayed children at two per batch take two rounds
    assert!(elapsed >= Duration::from_millis(800), "took {:?}", elapsed);
}
