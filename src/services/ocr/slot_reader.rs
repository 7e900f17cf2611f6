use super::engine::OcrEngine;
use super::preprocessing::PreprocessingService;
use crate::error::QuestError;
use crate::models::{Roi, SlotSelection};
use crate::services::extract::pick_title;
use crate::services::screen_capture::crop_slot;
use image::DynamicImage;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// OCR output of one slot
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotReading {
    pub slot: usize,
    pub raw_text: String,
    /// Line used as the search name
    pub title: String,
}

#[derive(Debug)]
pub enum SlotOutcome {
    Read(SlotReading),
    /// OCR ran but found no text
    Empty { slot: usize },
    Failed { slot: usize, error: QuestError },
}

/// Crops, preprocesses and recognizes mission slots of a capture
pub struct SlotReader {
    engine: Arc<dyn OcrEngine>,
    preprocessing: PreprocessingService,
}

impl SlotReader {
    pub fn new(engine: Arc<dyn OcrEngine>, preprocessing: PreprocessingService) -> Self {
        Self {
            engine,
            preprocessing,
        }
    }

    pub fn read_slot(&self, image: &DynamicImage, slot: usize, region: &Roi) -> SlotOutcome {
        let text = crop_slot(image, region)
            .map(|crop| self.preprocessing.preprocess(&crop))
            .and_then(|prepared| self.engine.recognize(&prepared));

        match text {
            Ok(raw_text) if raw_text.trim().is_empty() => {
                debug!(slot, "Slot has no text");
                SlotOutcome::Empty { slot }
            }
            Ok(raw_text) => {
                let title = pick_title(&raw_text);
                debug!(slot, %title, "Slot read");
                SlotOutcome::Read(SlotReading {
                    slot,
                    raw_text,
                    title,
                })
            }
            Err(error) => {
                warn!(slot, %error, "Slot OCR failed");
                SlotOutcome::Failed { slot, error }
            }
        }
    }

    /// Read the selected slots one after another, in slot order
    pub fn read_slots(
        &self,
        image: &DynamicImage,
        regions: &[Roi],
        selection: &SlotSelection,
    ) -> Vec<SlotOutcome> {
        selection
            .slots()
            .iter()
            .map(|&slot| match regions.get(slot) {
                Some(region) => self.read_slot(image, slot, region),
                None => SlotOutcome::Failed {
                    slot,
                    error: QuestError::Input(format!("slot {} has no configured region", slot + 1)),
                },
            })
            .collect()
    }
}
