pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

#[cfg(feature = "desktop")]
mod commands;

pub use error::QuestError;
pub use models::{AppConfig, CandidateSource, MissionRecord, SlotRecord, SlotSelection};
pub use services::pipeline::{MissionPipeline, PipelineEvent};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::capture::ReaderState;
    use commands::config::init_config_manager;
    use services::ocr::{PreprocessingService, SlotReader, TesseractEngine};
    use services::pipeline::event_channel;
    use state::{AppState, AppStateHandle};
    use std::sync::Arc;
    use tracing::{error, info};

    // Initialize config manager
    let config_manager = init_config_manager().expect("Failed to initialize config manager");
    let config = match config_manager.lock().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}; falling back to defaults", e);
            AppConfig::default()
        }
    };
    logging::init_tracing(config.logging.json);
    info!(path = %config_manager.lock().config_file_path().display(), "Configuration loaded");

    // Without tesseract nothing downstream can work
    let engine = match TesseractEngine::new(&config.ocr) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "Tesseract unavailable");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let reader = SlotReader::new(
        Arc::new(engine),
        PreprocessingService::new(config.ocr.preprocessing.clone()),
    );

    let (events_tx, events_rx) = event_channel();
    let pipeline = MissionPipeline::from_config(&config, events_tx)
        .expect("Failed to build HTTP client");

    let app_state: AppStateHandle = Arc::new(parking_lot::Mutex::new(AppState::new(config)));
    let forwarder_state = app_state.clone();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(app_state)
        .manage(config_manager)
        .manage(ReaderState(Arc::new(reader)))
        .manage(pipeline)
        .setup(move |app| {
            commands::events::spawn_event_forwarder(app.handle().clone(), forwarder_state, events_rx);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::capture::capture_game_window,
            commands::capture::process_slots,
            commands::capture::get_records,
            commands::capture::get_last_status,
            commands::capture::open_manual_search,
            commands::config::load_config,
            commands::config::save_config,
            commands::config::get_config_path,
            commands::config::get_slot_regions
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
