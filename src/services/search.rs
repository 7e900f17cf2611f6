use crate::error::QuestError;
use crate::services::extract::text::{descendants, has_class};
use crate::services::http::PageFetcher;
use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// General web search: query in, result URLs out (best first)
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, QuestError>;
}

/// Scrapes the DuckDuckGo HTML endpoint
pub struct DuckDuckGoSearch {
    fetcher: Arc<dyn PageFetcher>,
    endpoint: String,
    timeout: Duration,
}

impl DuckDuckGoSearch {
    pub fn new(fetcher: Arc<dyn PageFetcher>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    fn query_url(&self, query: &str) -> Result<Url, QuestError> {
        Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map_err(|e| QuestError::Config(format!("bad search endpoint '{}': {}", self.endpoint, e)))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, QuestError> {
        let url = self.query_url(query)?;
        let page = self.fetcher.fetch(url.as_str(), self.timeout).await?;
        let results = parse_result_links(&page.body, limit);
        debug!(query, results = results.len(), "Search finished");
        Ok(results)
    }
}

fn is_engine_host(host: &str) -> bool {
    host == "duckduckgo.com" || host.ends_with(".duckduckgo.com")
}

/// Turn one result href into a target URL.
///
/// Redirect links (`/l/?uddg=<target>`) are unwrapped; links back into the
/// engine itself and non-web links give `None`.
pub fn decode_result_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let url = Url::parse(&absolute).ok()?;
    let host = url.host_str()?;

    if is_engine_host(host) {
        if !url.path().starts_with("/l/") {
            return None;
        }
        let (_, target) = url.query_pairs().find(|(key, _)| key == "uddg")?;
        return decode_result_link(&target);
    }

    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

/// Result links of a search page, in order, without duplicates
pub fn parse_result_links(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors: Vec<_> = descendants(document.root_element())
        .filter(|el| el.value().name() == "a")
        .collect();

    // Prefer the result title links; other anchors are navigation
    let titled: Vec<_> = anchors.iter().filter(|a| has_class(**a, "result__a")).collect();
    let candidates: Vec<_> = if titled.is_empty() {
        anchors.iter().collect()
    } else {
        titled
    };

    let mut results: Vec<String> = Vec::new();
    for anchor in candidates {
        let Some(link) = anchor.value().attr("href").and_then(decode_result_link) else {
            continue;
        };
        if !results.contains(&link) {
            results.push(link);
        }
        if results.len() >= limit {
            break;
        }
    }
    results
}
