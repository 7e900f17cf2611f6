use crate::error::QuestError;
use crate::models::config::{ScoringConfig, SearchConfig};
use crate::models::CandidateSource;
use crate::services::extract::text::{descendants, find_first, has_class, raw_text, stripped_text, tag_is};
use crate::services::http::PageFetcher;
use crate::services::search::SearchProvider;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::{form_urlencoded, Url};

const NO_RESULT_PHRASES: &[&str] = &["何も見つかりませんでした", "お探しのページは見つかりませんでした"];

/// Strip brackets and exclamation marks, turn bars into spaces, collapse whitespace
pub fn clean_mission_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .filter(|c| !matches!(c, '「' | '」' | '【' | '】' | '[' | ']' | '!' | '！'))
        .map(|c| if c == '|' || c == '｜' { ' ' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Words of the cleaned name worth matching: longer than one char, not a bare
/// number (full-width digits included)
pub fn query_keywords(clean_name: &str) -> Vec<String> {
    clean_name
        .split_whitespace()
        .filter(|word| word.chars().count() > 1 && !word.chars().all(char::is_numeric))
        .map(str::to_string)
        .collect()
}

fn encode_query(query: &str) -> String {
    form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}

fn is_on_domain(url: &str, domain: &str) -> bool {
    host_of(url).is_some_and(|host| host == domain || host.ends_with(&format!(".{}", domain)))
}

/// Relevance of one listing link to the mission keywords
pub fn score_link(text: &str, href: &str, keywords: &[String], scoring: &ScoringConfig) -> i32 {
    let text_lower = text.to_lowercase();
    let href_lower = href.to_lowercase();

    let mut score = 0;
    for keyword in keywords {
        if text.contains(keyword.as_str()) {
            score += scoring.exact_text_match;
        } else if text_lower.contains(&keyword.to_lowercase()) {
            score += scoring.case_insensitive_match;
        } else if href.contains(keyword.as_str()) {
            score += scoring.href_match;
        }
    }

    let quest_text = scoring.quest_text_terms.iter().any(|t| text.contains(t.as_str()));
    let quest_href = scoring
        .quest_href_terms
        .iter()
        .any(|t| href_lower.contains(&t.to_lowercase()));
    if quest_text || quest_href {
        score += scoring.quest_bonus;
    }
    if scoring.fleet_example_terms.iter().any(|t| text.contains(t.as_str())) {
        score += scoring.fleet_example_bonus;
    }
    score
}

/// A WordPress-style "nothing found" page
fn is_no_results_page(document: &Html) -> bool {
    let root = document.root_element();
    let says_nothing = NO_RESULT_PHRASES.iter().any(|p| raw_text(root).contains(p));
    says_nothing
        && descendants(root).any(|el| {
            has_class(el, "no-results") || (el.value().name() == "div" && has_class(el, "error404"))
        })
}

fn is_listing_entry(element: ElementRef<'_>) -> bool {
    match element.value().name() {
        "article" => has_class(element, "post") || has_class(element, "page"),
        "div" => has_class(element, "search-entry") || has_class(element, "post-item"),
        _ => false,
    }
}

fn is_link(element: ElementRef<'_>) -> bool {
    element.value().name() == "a" && element.value().attr("href").is_some()
}

/// Title link of a listing entry, else its first link
fn entry_link(entry: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let title_tags = ["h1", "h2", "h3"];
    let title = descendants(entry)
        .find(|el| tag_is(*el, &title_tags) && has_class(*el, "entry-title"))
        .or_else(|| find_first(entry, &title_tags));

    title
        .and_then(|title| descendants(title).find(|el| is_link(*el)))
        .or_else(|| descendants(entry).find(|el| is_link(*el)))
}

/// Pick the best link of the preferred site's search listing.
///
/// Ties keep the first seen; anything under `min_score` is rejected.
pub fn score_site_listing(
    html: &str,
    keywords: &[String],
    base_url: &Url,
    site_label: &str,
    scoring: &ScoringConfig,
) -> Option<CandidateSource> {
    let document = Html::parse_document(html);
    if is_no_results_page(&document) {
        debug!("Site search reported no results");
        return None;
    }

    let root = document.root_element();
    let mut entries: Vec<ElementRef<'_>> = descendants(root).filter(|el| is_listing_entry(*el)).collect();
    if entries.is_empty() {
        entries = descendants(root).filter(|el| el.value().name() == "article").collect();
    }

    let mut best: Option<(i32, String)> = None;
    for link in entries.into_iter().filter_map(entry_link) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let score = score_link(&stripped_text(link), href, keywords, scoring);
        if score > best.as_ref().map_or(0, |(top, _)| *top) {
            if let Ok(url) = base_url.join(href) {
                best = Some((score, url.to_string()));
            }
        }
    }

    match best {
        Some((score, url)) if score >= scoring.min_score => {
            debug!(%url, score, "Site candidate accepted");
            Some(CandidateSource::new(url, site_label, score))
        }
        other => {
            debug!(best = other.map_or(0, |(s, _)| s), "No site candidate above threshold");
            None
        }
    }
}

/// Mission name → ranked guide-page candidates
pub struct SourceResolver {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    config: SearchConfig,
    scoring: ScoringConfig,
    timeout: Duration,
}

impl SourceResolver {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        config: SearchConfig,
        scoring: ScoringConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            search,
            fetcher,
            config,
            scoring,
            timeout,
        }
    }

    pub fn manual_search_url(&self, query: &str) -> String {
        format!("{}{}", self.config.manual_search_url, encode_query(query))
    }

    /// Ranked candidates for a mission name; never empty.
    ///
    /// When nothing usable is found the single result is a manual-search
    /// placeholder that callers must not fetch.
    pub async fn resolve_sources(&self, mission_name: &str) -> Vec<CandidateSource> {
        let clean = clean_mission_name(mission_name);
        let query = format!(
            "{} {} {}",
            clean, self.config.game_keyword, self.config.strategy_keyword
        );
        let manual = || vec![CandidateSource::manual(self.manual_search_url(&query))];

        if clean.is_empty() {
            warn!(mission_name, "Mission name is empty after cleaning");
            return manual();
        }

        let results = match self.search.search(&query, self.config.max_results).await {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => {
                info!(%query, "Search returned nothing");
                return manual();
            }
            Err(error) => {
                warn!(%query, %error, "Search failed");
                return manual();
            }
        };

        let domain = self.config.preferred_domain.as_str();
        if let Some(hit) = results.iter().find(|url| is_on_domain(url, domain)) {
            info!(url = %hit, "Preferred site found in search results");
            return vec![CandidateSource::new(hit.as_str(), format!("{} (via search)", domain), 0)];
        }

        let mut candidates = Vec::new();
        if self.config.site_search_enabled {
            match self.search_site(&clean).await {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => {}
                Err(error) => warn!(%error, "Site search failed"),
            }
        }

        candidates.extend(results.iter().take(self.config.fallback_results).map(|url| {
            let label = host_of(url).unwrap_or_else(|| url.clone());
            CandidateSource::new(url.as_str(), label, 0)
        }));
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    async fn search_site(&self, clean_name: &str) -> Result<Option<CandidateSource>, QuestError> {
        let search_url = format!("{}{}", self.config.site_search_url, encode_query(clean_name));
        let base_url = Url::parse(&self.config.site_search_url).map_err(|e| {
            QuestError::Config(format!("bad site search url '{}': {}", self.config.site_search_url, e))
        })?;

        let page = self.fetcher.fetch(&search_url, self.timeout).await?;
        let keywords = query_keywords(clean_name);
        Ok(score_site_listing(
            &page.body,
            &keywords,
            &base_url,
            &self.config.preferred_domain,
            &self.scoring,
        ))
    }
}
