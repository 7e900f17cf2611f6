use crate::models::{AppConfig, Roi};
use crate::services::config::ConfigManager;
use crate::state::AppStateHandle;
use parking_lot::Mutex;
use tauri::State;

/// State wrapper for configuration manager
pub type ConfigManagerState = Mutex<ConfigManager>;

/// Initialize config manager state
pub fn init_config_manager() -> Result<ConfigManagerState, String> {
    let manager = ConfigManager::new()?;
    Ok(Mutex::new(manager))
}

#[tauri::command]
pub fn load_config(state: State<ConfigManagerState>) -> Result<AppConfig, String> {
    Ok(state.lock().load()?)
}

/// Persist the configuration.
///
/// Capture hints and slot regions apply from the next capture; OCR, search
/// and HTTP settings apply after a restart.
#[tauri::command]
pub fn save_config(
    config: AppConfig,
    manager: State<ConfigManagerState>,
    app_state: State<AppStateHandle>,
) -> Result<(), String> {
    for (index, roi) in config.slots.regions.iter().enumerate() {
        if !roi.is_valid() {
            return Err(format!("Slot {} region has zero size", index + 1));
        }
    }

    manager.lock().save(&config)?;
    app_state.lock().config = config;
    Ok(())
}

#[tauri::command]
pub fn get_config_path(state: State<ConfigManagerState>) -> String {
    state.lock().config_file_path().display().to_string()
}

/// Slot regions currently in effect
#[tauri::command]
pub fn get_slot_regions(app_state: State<AppStateHandle>) -> Vec<Roi> {
    app_state.lock().config.slots.regions.clone()
}
