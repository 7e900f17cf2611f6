use serde::{Deserialize, Serialize};

/// Label of the placeholder returned when no page could be found automatically
pub const MANUAL_SEARCH_LABEL: &str = "Web検索 (手動確認用)";

/// A page that might describe a mission, ranked by score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSource {
    pub url: String,
    pub site_label: String,
    pub score: i32,
    /// Search-page link for the user; never fetched automatically
    #[serde(default)]
    pub manual_only: bool,
}

impl CandidateSource {
    pub fn new(url: impl Into<String>, site_label: impl Into<String>, score: i32) -> Self {
        Self {
            url: url.into(),
            site_label: site_label.into(),
            score,
            manual_only: false,
        }
    }

    pub fn manual(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            site_label: MANUAL_SEARCH_LABEL.to_string(),
            score: 0,
            manual_only: true,
        }
    }
}
