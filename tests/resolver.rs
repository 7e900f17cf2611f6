use quest_scout_lib::models::config::{HttpConfig, ScoringConfig, SearchConfig};
use quest_scout_lib::models::source::MANUAL_SEARCH_LABEL;
use quest_scout_lib::services::http::{PageFetcher, ReqwestFetcher};
use quest_scout_lib::services::search::DuckDuckGoSearch;
use quest_scout_lib::services::source_resolver::SourceResolver;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_RESULTS: &str = include_str!("fixtures/search_results.html");
const SITE_SEARCH: &str = include_str!("fixtures/site_search.html");
const SITE_SEARCH_EMPTY: &str = include_str!("fixtures/site_search_empty.html");

const MISSION: &str = "精鋭「第十九駆逐隊」、出撃せよ！";
const CLEAN_MISSION: &str = "精鋭第十九駆逐隊、出撃せよ";

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

/// Resolver whose general search and site search both point at `server`
fn resolver_for(server: &MockServer) -> SourceResolver {
    let search_config = SearchConfig {
        endpoint: format!("{}/html/", server.uri()),
        site_search_url: format!("{}/site/?s=", server.uri()),
        ..SearchConfig::default()
    };
    let timeout = Duration::from_secs(5);
    let fetcher: Arc<dyn PageFetcher> = Arc::new(ReqwestFetcher::new(&HttpConfig::default()).unwrap());
    let search = Arc::new(DuckDuckGoSearch::new(
        fetcher.clone(),
        search_config.endpoint.clone(),
        timeout,
    ));
    SourceResolver::new(search, fetcher, search_config, ScoringConfig::default(), timeout)
}

async fn mount_general_search(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", format!("{} 艦これ 攻略", CLEAN_MISSION)))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_site_candidate_ranks_before_general_results() {
    let server = MockServer::start().await;
    mount_general_search(&server, SEARCH_RESULTS).await;
    Mock::given(method("GET"))
        .and(path("/site/"))
        .and(query_param("s", CLEAN_MISSION))
        .respond_with(html(SITE_SEARCH))
        .expect(1)
        .mount(&server)
        .await;

    let sources = resolver_for(&server).resolve_sources(MISSION).await;

    let site_entry = format!("{}/blog-entry-451.html", server.uri());
    let urls: Vec<&str> = sources.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            site_entry.as_str(),
            "https://wikiwiki.jp/kancolle/%E4%BB%BB%E5%8B%99",
            "https://kancolle.example.org/quest/19",
        ]
    );
    assert_eq!(sources[0].site_label, "zekamashi.net");
    // quest term + fleet example term
    assert_eq!(sources[0].score, 3);
    assert_eq!(sources[1].site_label, "wikiwiki.jp");
    assert_eq!(sources[2].site_label, "kancolle.example.org");
    assert!(sources.iter().all(|s| !s.manual_only));
}

#[tokio::test]
async fn test_empty_site_listing_leaves_general_results() {
    let server = MockServer::start().await;
    mount_general_search(&server, SEARCH_RESULTS).await;
    Mock::given(method("GET"))
        .and(path("/site/"))
        .respond_with(html(SITE_SEARCH_EMPTY))
        .mount(&server)
        .await;

    let sources = resolver_for(&server).resolve_sources(MISSION).await;

    assert_eq!(sources.len(), 2);
    assert!(sources.iter().all(|s| s.score == 0));
}

#[tokio::test]
async fn test_failing_site_search_is_not_fatal() {
    let server = MockServer::start().await;
    mount_general_search(&server, SEARCH_RESULTS).await;
    Mock::given(method("GET"))
        .and(path("/site/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sources = resolver_for(&server).resolve_sources(MISSION).await;

    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].site_label, "wikiwiki.jp");
}

#[tokio::test]
async fn test_preferred_domain_hit_short_circuits() {
    let server = MockServer::start().await;
    let results = r#"<a class="result__a" href="https://wikiwiki.jp/kancolle/x">wiki</a>
        <a class="result__a" href="https://zekamashi.net/blog-entry-451.html">zekamashi</a>"#;
    mount_general_search(&server, results).await;
    Mock::given(method("GET"))
        .and(path("/site/"))
        .respond_with(html(SITE_SEARCH))
        .expect(0)
        .mount(&server)
        .await;

    let sources = resolver_for(&server).resolve_sources(MISSION).await;

    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].url, "https://zekamashi.net/blog-entry-451.html");
    assert_eq!(sources[0].site_label, "zekamashi.net (via search)");
}

#[tokio::test]
async fn test_search_failure_gives_manual_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sources = resolver_for(&server).resolve_sources(MISSION).await;

    assert_eq!(sources.len(), 1);
    assert!(sources[0].manual_only);
    assert_eq!(sources[0].site_label, MANUAL_SEARCH_LABEL);
    assert!(sources[0].url.starts_with("https://www.google.com/search?q="));
}

#[tokio::test]
async fn test_no_search_results_gives_manual_placeholder() {
    let server = MockServer::start().await;
    mount_general_search(&server, "<html><body><p>No results.</p></body></html>").await;

    let sources = resolver_for(&server).resolve_sources(MISSION).await;

    assert_eq!(sources.len(), 1);
    assert!(sources[0].manual_only);
}

#[tokio::test]
async fn test_blank_name_never_searches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(SEARCH_RESULTS))
        .expect(0)
        .mount(&server)
        .await;

    let sources = resolver_for(&server).resolve_sources(" 「」！ ").await;

    assert_eq!(sources.len(), 1);
    assert!(sources[0].manual_only);
}
