use crate::models::{SlotRecord, SlotSelection};
use crate::services::ocr::SlotReader;
use crate::services::pipeline::MissionPipeline;
use crate::services::screen_capture::{self, image_to_data_url};
use crate::state::AppStateHandle;
use serde::Serialize;
use std::sync::Arc;
use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;
use tracing::info;

/// OCR reader shared by every batch
pub struct ReaderState(pub Arc<SlotReader>);

/// What the UI needs to show the latest capture
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePreview {
    pub width: u32,
    pub height: u32,
    pub data_url: String,
    pub captured_at: String,
}

/// Capture the game window and keep it for the next `process_slots`
#[tauri::command]
pub async fn capture_game_window(state: State<'_, AppStateHandle>) -> Result<CapturePreview, String> {
    let capture_config = state.lock().config.capture.clone();

    let image = tokio::task::spawn_blocking(move || screen_capture::capture_game_window(&capture_config))
        .await
        .map_err(|e| format!("Capture worker stopped: {}", e))??;

    let data_url = image_to_data_url(&image)?;
    let (width, height) = (image.width(), image.height());

    let mut guard = state.lock();
    guard.store_capture(image);
    let captured_at = guard
        .captured_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    Ok(CapturePreview {
        width,
        height,
        data_url,
        captured_at,
    })
}

/// Start OCR and lookup for the selected slots ("all" or "1,3,5").
///
/// Returns the 0-based slots that were queued; results arrive as events.
#[tauri::command]
pub async fn process_slots(
    selection: String,
    state: State<'_, AppStateHandle>,
    reader: State<'_, ReaderState>,
    pipeline: State<'_, MissionPipeline>,
) -> Result<Vec<usize>, String> {
    let (image, regions) = {
        let guard = state.lock();
        let image = guard
            .capture
            .clone()
            .ok_or("No capture yet, capture the game window first")?;
        (image, guard.config.slots.regions.clone())
    };

    let selection = SlotSelection::parse(&selection, regions.len())?;
    let slots = selection.slots().to_vec();
    info!(?slots, "Processing slots");

    // Tasks report through events; the handles are not awaited here
    pipeline
        .process_capture(reader.0.clone(), image, regions, selection)
        .await?;

    Ok(slots)
}

/// Records of the current batch, in arrival order
#[tauri::command]
pub fn get_records(state: State<'_, AppStateHandle>) -> Vec<SlotRecord> {
    state.lock().records.clone()
}

#[tauri::command]
pub fn get_last_status(state: State<'_, AppStateHandle>) -> Option<String> {
    state.lock().last_status.clone()
}

/// Open a manual search URL in the default browser
#[tauri::command]
pub fn open_manual_search(app: AppHandle, url: String) -> Result<(), String> {
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| format!("Failed to open browser: {}", e))
}
