use crate::models::{AppConfig, SlotRecord};
use crate::services::pipeline::PipelineEvent;
use chrono::{DateTime, Local};
use image::DynamicImage;
use parking_lot::Mutex;
use std::sync::Arc;

/// State shared between UI commands and the event consumer
#[derive(Default)]
pub struct AppState {
    pub config: AppConfig,
    /// Latest window capture, read by every slot of a batch
    pub capture: Option<Arc<DynamicImage>>,
    pub captured_at: Option<DateTime<Local>>,
    /// Batch whose results are being collected
    pub current_batch: u64,
    /// Records of the current batch in arrival order
    pub records: Vec<SlotRecord>,
    pub last_status: Option<String>,
}

/// State wrapper (Arc for async sharing, parking_lot::Mutex for performance)
pub type AppStateHandle = Arc<Mutex<AppState>>;

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the stored capture; a new capture invalidates the old records
    pub fn store_capture(&mut self, image: DynamicImage) -> Arc<DynamicImage> {
        let image = Arc::new(image);
        self.capture = Some(image.clone());
        self.captured_at = Some(Local::now());
        self.records.clear();
        image
    }

    /// True when the event belongs to a batch that has been superseded
    pub fn is_stale(&self, event: &PipelineEvent) -> bool {
        if matches!(event, PipelineEvent::BatchStarted { .. }) {
            return false;
        }
        event.batch().is_some_and(|batch| batch != self.current_batch)
    }

    /// Fold a pipeline event into the state. Only the event consumer calls this.
    ///
    /// Results of an older batch are ignored.
    pub fn apply(&mut self, event: &PipelineEvent) {
        if self.is_stale(event) {
            return;
        }
        match event {
            PipelineEvent::BatchStarted { batch, .. } => {
                self.current_batch = *batch;
                self.records.clear();
            }
            PipelineEvent::Status { message } => self.last_status = Some(message.clone()),
            PipelineEvent::Completed { slot, record, .. } => self.records.push(SlotRecord {
                slot: *slot,
                record: record.clone(),
            }),
            PipelineEvent::ManualSearch { .. } | PipelineEvent::Failed { .. } => {}
        }
    }
}
