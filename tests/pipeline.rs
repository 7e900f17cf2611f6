use async_trait::async_trait;
use image::DynamicImage;
use parking_lot::Mutex;
use quest_scout_lib::models::config::{ScoringConfig, SearchConfig, SlotConfig};
use quest_scout_lib::models::SlotSelection;
use quest_scout_lib::services::http::{FetchedPage, PageFetcher};
use quest_scout_lib::services::ocr::{OcrEngine, PreprocessingService, SlotReader};
use quest_scout_lib::services::pipeline::{event_channel, MissionPipeline, PipelineEvent};
use quest_scout_lib::services::search::SearchProvider;
use quest_scout_lib::services::source_resolver::SourceResolver;
use quest_scout_lib::QuestError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

const QUEST_PAGE: &str = include_str!("fixtures/quest_page.html");
const GUIDE_URL: &str = "https://zekamashi.net/blog-entry-451.html";

/// Search that always answers with the same list, or fails
struct FixedSearch(Result<Vec<String>, ()>);

#[async_trait]
impl SearchProvider for FixedSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, QuestError> {
        match &self.0 {
            Ok(urls) => Ok(urls.iter().take(limit).cloned().collect()),
            Err(()) => Err(QuestError::Network(format!("search for '{}' refused", query))),
        }
    }
}

/// Serves canned pages and remembers what was requested
#[derive(Default)]
struct CannedFetcher {
    pages: HashMap<String, String>,
    timeouts: Vec<String>,
    requested: Mutex<Vec<String>>,
}

#[async_trait]
impl PageFetcher for CannedFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedPage, QuestError> {
        self.requested.lock().push(url.to_string());
        if self.timeouts.iter().any(|u| u == url) {
            return Err(QuestError::Timeout(url.to_string()));
        }
        self.pages
            .get(url)
            .map(|body| FetchedPage {
                url: url.to_string(),
                body: body.clone(),
            })
            .ok_or_else(|| QuestError::Network(format!("{} returned 404 Not Found", url)))
    }
}

struct ScriptedOcr(Mutex<Vec<String>>);

impl OcrEngine for ScriptedOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, QuestError> {
        self.recognize_with_lang(image, "jpn")
    }

    fn recognize_with_lang(&self, _image: &DynamicImage, _lang: &str) -> Result<String, QuestError> {
        Ok(self.0.lock().pop().unwrap_or_default())
    }
}

fn guide_fetcher() -> Arc<CannedFetcher> {
    let mut fetcher = CannedFetcher::default();
    fetcher.pages.insert(GUIDE_URL.to_string(), QUEST_PAGE.to_string());
    Arc::new(fetcher)
}

fn pipeline_with(
    search: FixedSearch,
    fetcher: Arc<CannedFetcher>,
) -> (MissionPipeline, UnboundedReceiver<PipelineEvent>) {
    let config = SearchConfig {
        site_search_enabled: false,
        ..SearchConfig::default()
    };
    let timeout = Duration::from_secs(1);
    let resolver = SourceResolver::new(
        Arc::new(search),
        fetcher.clone(),
        config,
        ScoringConfig::default(),
        timeout,
    );
    let (tx, rx) = event_channel();
    (MissionPipeline::new(Arc::new(resolver), fetcher, timeout, tx), rx)
}

fn drain(rx: &mut UnboundedReceiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn statuses(events: &[PipelineEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Status { message } => Some(message.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_slot_completes_with_record() {
    let fetcher = guide_fetcher();
    let (pipeline, mut rx) = pipeline_with(FixedSearch(Ok(vec![GUIDE_URL.to_string()])), fetcher.clone());

    pipeline.run_slot(1, 1, "精鋭「第十九駆逐隊」、出撃せよ！").await;

    let events = drain(&mut rx);
    let record = events
        .iter()
        .find_map(|e| match e {
            PipelineEvent::Completed { slot: 1, record, .. } => Some(record),
            _ => None,
        })
        .expect("completed event");
    assert_eq!(record.ocr_name, "精鋭「第十九駆逐隊」、出撃せよ！");
    assert_eq!(record.source_url, GUIDE_URL);
    assert_eq!(record.site_name, "zekamashi.net (via search)");
    assert_eq!(record.rewards, vec!["燃料 x300", "改修資材 x4"]);

    assert_eq!(
        statuses(&events),
        vec![
            "Slot 2: searching for 「精鋭「第十九駆逐隊」、出撃せよ...」",
            "Slot 2: fetching from zekamashi.net (via search)",
            "Slot 2: 「精鋭「第十九駆逐隊」、出撃せよ...」 done",
        ]
    );
    assert_eq!(*fetcher.requested.lock(), vec![GUIDE_URL.to_string()]);
}

#[tokio::test]
async fn test_manual_source_is_never_fetched() {
    let fetcher = guide_fetcher();
    let (pipeline, mut rx) = pipeline_with(FixedSearch(Err(())), fetcher.clone());

    pipeline.run_slot(1, 0, "「艦隊拡充計画」").await;

    let events = drain(&mut rx);
    let manual = events.iter().find_map(|e| match e {
        PipelineEvent::ManualSearch { slot, mission_name, url, .. } => Some((*slot, mission_name, url)),
        _ => None,
    });
    let (slot, mission_name, url) = manual.expect("manual search event");
    assert_eq!(slot, 0);
    assert_eq!(mission_name, "「艦隊拡充計画」");
    assert!(url.starts_with("https://www.google.com/search?q="));

    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Completed { .. })));
    assert!(fetcher.requested.lock().is_empty());
}

#[tokio::test]
async fn test_fetch_timeout_reports_failure() {
    let mut fetcher = CannedFetcher::default();
    fetcher.timeouts.push(GUIDE_URL.to_string());
    let fetcher = Arc::new(fetcher);
    let (pipeline, mut rx) = pipeline_with(FixedSearch(Ok(vec![GUIDE_URL.to_string()])), fetcher);

    pipeline.run_slot(1, 4, "「艦隊拡充計画」").await;

    let events = drain(&mut rx);
    assert!(events.contains(&PipelineEvent::Failed {
        batch: 1,
        slot: 4,
        kind: "timeout".to_string(),
        error: format!("request timed out: {}", GUIDE_URL),
    }));
    assert_eq!(statuses(&events).last(), Some(&"Slot 5: error"));
}

#[tokio::test]
async fn test_capture_batch_runs_selected_slots() {
    let fetcher = guide_fetcher();
    let (pipeline, mut rx) = pipeline_with(FixedSearch(Ok(vec![GUIDE_URL.to_string()])), fetcher);

    // Popped from the back: slot 1 first, then slot 3
    let ocr = ScriptedOcr(Mutex::new(vec![String::new(), "「艦隊拡充計画」\n8 x".to_string()]));
    let reader = Arc::new(SlotReader::new(Arc::new(ocr), PreprocessingService::default()));
    let image = Arc::new(DynamicImage::new_rgb8(1500, 900));
    let regions = SlotConfig::default().regions;
    let selection = SlotSelection::parse("3, 1", regions.len()).unwrap();

    let handles = pipeline
        .process_capture(reader, image, regions, selection)
        .await
        .unwrap();
    assert_eq!(handles.len(), 1);
    for handle in handles {
        handle.await.unwrap();
    }

    let events = drain(&mut rx);
    assert_eq!(events[0], PipelineEvent::BatchStarted { batch: 1, slots: vec![0, 2] });
    assert!(statuses(&events).contains(&"Slot 3: no text read, skipped"));

    let completed: Vec<(usize, &str)> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Completed { slot, record, .. } => Some((*slot, record.ocr_name.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![(0, "「艦隊拡充計画」")]);
}

#[tokio::test]
async fn test_out_of_range_regions_fail_per_slot() {
    let (pipeline, mut rx) = pipeline_with(FixedSearch(Ok(vec![])), guide_fetcher());
    let ocr = ScriptedOcr(Mutex::new(vec!["「艦隊拡充計画」".to_string()]));
    let reader = Arc::new(SlotReader::new(Arc::new(ocr), PreprocessingService::default()));
    // Smaller than every default region
    let image = Arc::new(DynamicImage::new_rgb8(200, 200));

    let handles = pipeline
        .process_capture(reader, image, SlotConfig::default().regions, SlotSelection::all(5))
        .await
        .unwrap();

    assert!(handles.is_empty());
    let failures = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, PipelineEvent::Failed { kind, .. } if kind == "input"))
        .count();
    assert_eq!(failures, 5);
}

#[tokio::test]
async fn test_each_capture_batch_gets_a_new_id() {
    let (pipeline, mut rx) = pipeline_with(FixedSearch(Ok(vec![])), guide_fetcher());
    let image = Arc::new(DynamicImage::new_rgb8(1500, 900));
    let regions = SlotConfig::default().regions;

    for _ in 0..2 {
        let ocr = ScriptedOcr(Mutex::new(Vec::new()));
        let reader = Arc::new(SlotReader::new(Arc::new(ocr), PreprocessingService::default()));
        let selection = SlotSelection::parse("1", regions.len()).unwrap();
        pipeline
            .process_capture(reader, image.clone(), regions.clone(), selection)
            .await
            .unwrap();
    }

    let batches: Vec<u64> = drain(&mut rx)
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::BatchStarted { batch, .. } => Some(*batch),
            _ => None,
        })
        .collect();
    assert_eq!(batches, vec![1, 2]);
}
