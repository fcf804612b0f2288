//! Integration tests for the scraper against a mock search engine.
//!
//! A `wiremock` server stands in for the landing page and the result
//! endpoint, so these tests exercise the real HTTP path: session bootstrap,
//! cookies, headers, pagination offsets and error propagation.

use baidu_search::config::{DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT};
use baidu_search::{
    BaiduScraper, ScraperConfig, SearchError, SearchQuery, SessionState, UNKNOWN_SOURCE,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn config_for(server: &MockServer) -> ScraperConfig {
    ScraperConfig {
        base_url: server.uri(),
        request_delay_ms: (0, 0),
        bootstrap_timeout_seconds: 5,
        request_timeout_seconds: 5,
        ..Default::default()
    }
}

/// Whole-value header match; the built-in matcher splits values on commas,
/// which browser header values are full of.
fn header_is(name: &'static str, expected: &'static str) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |req: &Request| req.headers.get(name).is_some_and(|v| v == expected)
}

/// A result page with one plain container per id.
fn results_page(ids: &[&str]) -> String {
    let body: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div class="result c-container">
  <h3 class="t"><a href="http://www.baidu.com/link?url={id}">标题 {id}</a></h3>
  <div class="c-abstract">摘要 {id}</div>
  <span class="c-showurl">{id}.example.com</span>
</div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div id="content_left">{body}</div></body></html>"#)
}

fn ids(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

fn page_of(ids: &[String]) -> String {
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    results_page(&refs)
}

async fn mount_landing(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(status).insert_header("set-cookie", "BAIDUID=session123; Path=/"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, pn: &str, body: String, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("pn", pn))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn bootstrap_cookie_and_headers_reach_page_requests() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 1).await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("wd", "人工智能"))
        .and(query_param("pn", "0"))
        .and(header("cookie", "BAIDUID=session123"))
        .and(header_is("user-agent", DEFAULT_USER_AGENT))
        .and(header_is("accept-language", DEFAULT_ACCEPT_LANGUAGE))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["a", "b"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut scraper = BaiduScraper::new(config_for(&server)).expect("valid config");
    let results = scraper.search("人工智能", 1).await;
    assert_eq!(scraper.session_state(), SessionState::Initialized);
    scraper.close();

    let results = results.expect("search succeeds");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "标题 a");
    assert_eq!(results[0].url, "http://www.baidu.com/link?url=a");
    assert_eq!(results[0].source, "a.example.com");
    assert_eq!(results[0].content, "摘要 a");
}

#[tokio::test]
async fn zero_page_count_fetches_one_page() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 1).await;
    mount_page(&server, "0", page_of(&ids("a", 10)), 1).await;
    mount_page(&server, "10", page_of(&ids("b", 10)), 0).await;

    let results = baidu_search::search("test", 0, config_for(&server))
        .await
        .expect("search succeeds");
    assert_eq!(results.len(), 10);
}

#[tokio::test]
async fn pages_use_ten_per_page_offsets_and_stop_on_short_page() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 1).await;
    mount_page(&server, "0", page_of(&ids("a", 10)), 1).await;
    mount_page(&server, "10", page_of(&ids("b", 10)), 1).await;
    mount_page(&server, "20", page_of(&ids("c", 3)), 1).await;
    mount_page(&server, "30", page_of(&ids("d", 10)), 0).await;

    let mut scraper = BaiduScraper::new(config_for(&server)).expect("valid config");
    let query = SearchQuery::new("rust", 5).expect("valid query");
    let report = scraper
        .search_detailed(&query, &CancellationToken::new())
        .await;
    scraper.close();

    let report = report.expect("search succeeds");
    assert_eq!(report.pages_fetched, 3);
    assert!(report.stopped_early);
    assert_eq!(report.records.len(), 23);
    assert!(report.records[0].url.ends_with("=a0"));
    assert!(report.records[10].url.ends_with("=b0"));
    assert!(report.records[22].url.ends_with("=c2"));
}

#[tokio::test]
async fn duplicate_last_page_yields_no_new_records() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 1).await;
    let first = ids("a", 10);
    mount_page(&server, "0", page_of(&first), 1).await;
    mount_page(&server, "10", page_of(&first[..4]), 1).await;

    let results = baidu_search::search("test", 2, config_for(&server))
        .await
        .expect("search succeeds");
    assert_eq!(results.len(), 10);
    let mut urls: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls.len(), 10);
}

#[tokio::test]
async fn non_success_bootstrap_is_tolerated() {
    let server = MockServer::start().await;
    mount_landing(&server, 503, 1).await;
    mount_page(&server, "0", results_page(&["x"]), 1).await;

    let mut scraper = BaiduScraper::new(config_for(&server)).expect("valid config");
    let results = scraper.search("test", 1).await;
    assert_eq!(
        scraper.session_state(),
        SessionState::Degraded { status: 503 }
    );
    scraper.close();
    assert_eq!(results.expect("search proceeds").len(), 1);
}

#[tokio::test]
async fn bootstrap_happens_once_per_scraper() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 1).await;
    mount_page(&server, "0", results_page(&["x"]), 2).await;

    let mut scraper = BaiduScraper::new(config_for(&server)).expect("valid config");
    scraper.search("first", 1).await.expect("first search");
    scraper.search("second", 1).await.expect("second search");
    scraper.close();
}

#[tokio::test]
async fn transport_failure_during_bootstrap_is_fatal() {
    let config = ScraperConfig {
        base_url: "http://127.0.0.1:9".into(),
        bootstrap_timeout_seconds: 2,
        request_delay_ms: (0, 0),
        ..Default::default()
    };
    let mut scraper = BaiduScraper::new(config).expect("valid config");
    let err = scraper.search("test", 1).await.unwrap_err();
    assert!(matches!(err, SearchError::SessionInit(_)));
    assert_eq!(scraper.session_state(), SessionState::Failed);

    let err = scraper.search("test", 1).await.unwrap_err();
    assert!(matches!(err, SearchError::SessionFailed));
    scraper.close();
}

#[tokio::test]
async fn non_success_page_aborts_search() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 1).await;
    mount_page(&server, "0", page_of(&ids("a", 10)), 1).await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("pn", "10"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "20", page_of(&ids("c", 10)), 0).await;

    let err = baidu_search::search("test", 3, config_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Status { status: 403, .. }));
}

#[tokio::test]
async fn empty_keywords_never_reach_the_server() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 0).await;

    let err = baidu_search::search("", 3, config_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)));
}

#[tokio::test]
async fn untitled_and_sourceless_containers() {
    let server = MockServer::start().await;
    mount_landing(&server, 200, 1).await;
    let html = r#"<html><body>
        <div class="result"><div class="c-abstract">no title</div><a href="http://www.baidu.com/link?url=n">n</a></div>
        <div class="result"><h3 class="t"><a href="/link?url=rel">相对链接</a></h3></div>
    </body></html>"#;
    mount_page(&server, "0", html.to_string(), 1).await;

    let results = baidu_search::search("test", 1, config_for(&server))
        .await
        .expect("search succeeds");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "相对链接");
    assert_eq!(results[0].url, format!("{}/link?url=rel", server.uri()));
    assert_eq!(results[0].source, UNKNOWN_SOURCE);
    assert_eq!(results[0].content, "");
}
