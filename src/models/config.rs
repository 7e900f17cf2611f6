use crate::models::roi::Roi;
use serde::{Deserialize, Serialize};

/// Window discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Title of the standalone game window
    pub exact_title: String,
    /// Fragments identifying the game inside a browser window title
    pub title_hints: Vec<String>,
    pub browser_hints: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            exact_title: "艦隊これくしょん -艦これ- - オンラインゲーム - DMM GAMES".to_string(),
            title_hints: vec![
                "艦隊これくしょん -艦これ-".to_string(),
                "「艦隊これくしょん -艦これ-」".to_string(),
            ],
            browser_hints: vec!["Google Chrome".to_string(), "Microsoft Edge".to_string()],
        }
    }
}

/// Mission slot regions on the captured window, top to bottom
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlotConfig {
    pub regions: Vec<Roi>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        // Five quest rows of the 1920x1080 layout, 102px apart
        let regions = (0..5)
            .map(|i| Roi::new(670, 371 + 102 * i, 747, 26))
            .collect();
        Self { regions }
    }
}

/// Image preprocessing applied to each slot before OCR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreprocessingConfig {
    pub scale_factor: f64,
    pub grayscale: bool,
    /// Binarize at this luma level; `None` keeps gray levels
    pub threshold: Option<u8>,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            scale_factor: 2.0,
            grayscale: true,
            threshold: None,
        }
    }
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Explicit tesseract binary; looked up automatically when unset
    pub tesseract_path: Option<String>,
    pub language: String,
    pub page_seg_mode: u8,
    pub preprocessing: PreprocessingConfig,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            language: "jpn".to_string(),
            page_seg_mode: 7,
            preprocessing: PreprocessingConfig::default(),
        }
    }
}

/// Web search and guide-site settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub game_keyword: String,
    pub strategy_keyword: String,
    pub max_results: usize,
    /// General results appended after the site-scored candidate
    pub fallback_results: usize,
    pub preferred_domain: String,
    /// Site search URL; the query is appended percent-encoded
    pub site_search_url: String,
    pub site_search_enabled: bool,
    pub manual_search_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            game_keyword: "艦これ".to_string(),
            strategy_keyword: "攻略".to_string(),
            max_results: 5,
            fallback_results: 3,
            preferred_domain: "zekamashi.net".to_string(),
            site_search_url: "https://zekamashi.net/?s=".to_string(),
            site_search_enabled: true,
            manual_search_url: "https://www.google.com/search?q=".to_string(),
        }
    }
}

/// Weights used to rank the preferred site's own search listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub exact_text_match: i32,
    pub case_insensitive_match: i32,
    pub href_match: i32,
    pub quest_bonus: i32,
    pub fleet_example_bonus: i32,
    pub min_score: i32,
    /// Link text containing one of these earns the quest bonus
    pub quest_text_terms: Vec<String>,
    /// Href containing one of these (case-insensitive) earns the quest bonus
    pub quest_href_terms: Vec<String>,
    pub fleet_example_terms: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exact_text_match: 3,
            case_insensitive_match: 2,
            href_match: 1,
            quest_bonus: 2,
            fleet_example_bonus: 1,
            min_score: 3,
            quest_text_terms: vec!["任務".to_string()],
            quest_href_terms: vec!["/任務".to_string(), "quest".to_string()],
            fleet_example_terms: vec!["編成例".to_string()],
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub search_timeout_secs: u64,
    pub page_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            search_timeout_secs: 10,
            page_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub capture: CaptureConfig,
    pub slots: SlotConfig,
    pub ocr: OcrConfig,
    pub search: SearchConfig,
    pub scoring: ScoringConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        // Slots
        assert_eq!(config.slots.regions.len(), 5);
        assert_eq!(config.slots.regions[0], Roi::from_bounds(670, 371, 1417, 397).unwrap());
        assert_eq!(config.slots.regions[4], Roi::from_bounds(670, 779, 1417, 805).unwrap());

        // OCR
        assert_eq!(config.ocr.language, "jpn");
        assert_eq!(config.ocr.page_seg_mode, 7);
        assert!(config.ocr.tesseract_path.is_none());

        // Search
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.fallback_results, 3);
        assert_eq!(config.search.preferred_domain, "zekamashi.net");

        // Scoring
        assert_eq!(config.scoring.exact_text_match, 3);
        assert_eq!(config.scoring.min_score, 3);

        // HTTP
        assert_eq!(config.http.search_timeout_secs, 10);
        assert_eq!(config.http.page_timeout_secs, 15);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_app_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"search": {"max_results": 8},"logging": {"json": true}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.search.max_results, 8);
        assert_eq!(config.search.game_keyword, "艦これ");
        assert!(config.logging.json);
        assert_eq!(config.slots, SlotConfig::default());
    }

    #[test]
    fn test_custom_slots_round_trip() {
        let mut config = AppConfig::default();
        config.slots.regions = vec![Roi::new(10, 20, 300, 30)];

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.slots.regions.len(), 1);
        assert_eq!(config, deserialized);
    }
}
