use crate::error::QuestError;
use crate::models::{AppConfig, MissionRecord, Roi, SlotSelection};
use crate::services::aggregator::build_record;
use crate::services::http::{PageFetcher, ReqwestFetcher};
use crate::services::ocr::{SlotOutcome, SlotReader};
use crate::services::search::DuckDuckGoSearch;
use crate::services::source_resolver::SourceResolver;
use image::DynamicImage;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Progress reported by slot tasks to the presentation layer.
///
/// Slot results carry the id of the batch that produced them so a consumer
/// can drop late results of an earlier batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineEvent {
    /// A new batch of slots is about to be processed
    BatchStarted {
        batch: u64,
        slots: Vec<usize>,
    },
    Status {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        batch: u64,
        slot: usize,
        record: MissionRecord,
    },
    /// No page could be picked automatically; the user has to search
    #[serde(rename_all = "camelCase")]
    ManualSearch {
        batch: u64,
        slot: usize,
        mission_name: String,
        url: String,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        batch: u64,
        slot: usize,
        kind: String,
        error: String,
    },
}

impl PipelineEvent {
    /// Name of the frontend event this is forwarded as
    /// Batch a slot result belongs to; `None` for batch-independent events
    pub fn batch(&self) -> Option<u64> {
        match self {
            Self::BatchStarted { batch, .. }
            | Self::Completed { batch, .. }
            | Self::ManualSearch { batch, .. }
            | Self::Failed { batch, .. } => Some(*batch),
            Self::Status { .. } => None,
        }
    }

    pub fn channel(&self) -> &'static str {
        match self {
            Self::BatchStarted { .. } => "mission:batch",
            Self::Status { .. } => "mission:status",
            Self::Completed { .. } => "mission:record",
            Self::ManualSearch { .. } => "mission:manual",
            Self::Failed { .. } => "mission:error",
        }
    }

    fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    fn failed(batch: u64, slot: usize, error: &QuestError) -> Self {
        Self::Failed {
            batch,
            slot,
            kind: error.kind().to_string(),
            error: error.to_string(),
        }
    }
}

pub fn event_channel() -> (UnboundedSender<PipelineEvent>, UnboundedReceiver<PipelineEvent>) {
    mpsc::unbounded_channel()
}

/// Mission name shortened for status lines
fn short_name(name: &str) -> String {
    let mut short: String = name.chars().take(15).collect();
    if name.chars().count() > 15 {
        short.push_str("...");
    }
    short
}

/// Resolves, fetches and extracts one mission per slot, each on its own task
#[derive(Clone)]
pub struct MissionPipeline {
    resolver: Arc<SourceResolver>,
    fetcher: Arc<dyn PageFetcher>,
    page_timeout: Duration,
    events: UnboundedSender<PipelineEvent>,
    /// Id of the last batch handed out; shared by clones
    batches: Arc<AtomicU64>,
}

impl MissionPipeline {
    pub fn new(
        resolver: Arc<SourceResolver>,
        fetcher: Arc<dyn PageFetcher>,
        page_timeout: Duration,
        events: UnboundedSender<PipelineEvent>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            page_timeout,
            events,
            batches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Pipeline over the real web: reqwest fetcher and DuckDuckGo search
    pub fn from_config(
        config: &AppConfig,
        events: UnboundedSender<PipelineEvent>,
    ) -> Result<Self, QuestError> {
        let search_timeout = Duration::from_secs(config.http.search_timeout_secs);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(ReqwestFetcher::new(&config.http)?);
        let search = Arc::new(DuckDuckGoSearch::new(
            fetcher.clone(),
            config.search.endpoint.clone(),
            search_timeout,
        ));
        let resolver = Arc::new(SourceResolver::new(
            search,
            fetcher.clone(),
            config.search.clone(),
            config.scoring.clone(),
            search_timeout,
        ));

        Ok(Self::new(
            resolver,
            fetcher,
            Duration::from_secs(config.http.page_timeout_secs),
            events,
        ))
    }

    fn emit(&self, event: PipelineEvent) {
        // Receiver gone means the UI is closing
        self.events.send(event).ok();
    }

    /// Hand out the id of a new batch (ids start at 1)
    pub fn next_batch(&self) -> u64 {
        self.batches.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// OCR the selected slots on a blocking thread, then start one task per
    /// slot that produced text
    pub async fn process_capture(
        &self,
        reader: Arc<SlotReader>,
        image: Arc<DynamicImage>,
        regions: Vec<Roi>,
        selection: SlotSelection,
    ) -> Result<Vec<JoinHandle<()>>, QuestError> {
        let batch = self.next_batch();
        let numbers: Vec<String> = selection.slots().iter().map(|s| (s + 1).to_string()).collect();
        self.emit(PipelineEvent::BatchStarted {
            batch,
            slots: selection.slots().to_vec(),
        });
        self.emit(PipelineEvent::status(format!("Reading slots {}", numbers.join(", "))));

        let outcomes = tokio::task::spawn_blocking(move || reader.read_slots(&image, &regions, &selection))
            .await
            .map_err(|e| QuestError::Ocr(format!("OCR worker stopped: {}", e)))?;

        Ok(self.process_outcomes(batch, outcomes))
    }

    pub fn process_outcomes(&self, batch: u64, outcomes: Vec<SlotOutcome>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        for outcome in outcomes {
            match outcome {
                SlotOutcome::Read(reading) => {
                    handles.push(self.spawn_slot(batch, reading.slot, reading.title));
                }
                SlotOutcome::Empty { slot } => {
                    self.emit(PipelineEvent::status(format!("Slot {}: no text read, skipped", slot + 1)));
                }
                SlotOutcome::Failed { slot, error } => {
                    self.emit(PipelineEvent::failed(batch, slot, &error));
                    self.emit(PipelineEvent::status(format!("Slot {}: OCR failed", slot + 1)));
                }
            }
        }
        handles
    }

    pub fn spawn_slot(&self, batch: u64, slot: usize, mission_name: String) -> JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.run_slot(batch, slot, &mission_name).await })
    }

    /// Handle one mission end to end, reporting through events only
    pub async fn run_slot(&self, batch: u64, slot: usize, mission_name: &str) {
        let number = slot + 1;
        self.emit(PipelineEvent::status(format!(
            "Slot {}: searching for 「{}」",
            number,
            short_name(mission_name)
        )));

        let sources = self.resolver.resolve_sources(mission_name).await;
        let Some(source) = sources.into_iter().next() else {
            let error = QuestError::NotFound(format!("no source for '{}'", mission_name));
            self.emit(PipelineEvent::failed(batch, slot, &error));
            return;
        };

        if source.manual_only {
            info!(slot, url = %source.url, "Manual search required");
            self.emit(PipelineEvent::ManualSearch {
                batch,
                slot,
                mission_name: mission_name.to_string(),
                url: source.url,
            });
            self.emit(PipelineEvent::status(format!("Slot {}: check the web search manually", number)));
            return;
        }

        self.emit(PipelineEvent::status(format!(
            "Slot {}: fetching from {}",
            number, source.site_label
        )));

        match self.fetcher.fetch(&source.url, self.page_timeout).await {
            Ok(page) => {
                let record = build_record(mission_name, &source, &page.body);
                info!(slot, title = %record.title, "Mission extracted");
                self.emit(PipelineEvent::Completed { batch, slot, record });
                self.emit(PipelineEvent::status(format!(
                    "Slot {}: 「{}」 done",
                    number,
                    short_name(mission_name)
                )));
            }
            Err(error) => {
                warn!(slot, url = %source.url, %error, "Fetching guide page failed");
                self.emit(PipelineEvent::failed(batch, slot, &error));
                self.emit(PipelineEvent::status(format!("Slot {}: error", number)));
            }
        }
    }
}
