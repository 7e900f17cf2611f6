use crate::error::QuestError;
use crate::models::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager for app settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the platform config directory (`<config>/quest-scout`).
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new() -> Result<Self, QuestError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| QuestError::Config("Failed to determine config directory".to_string()))?
            .join("quest-scout");

        fs::create_dir_all(&config_dir)
            .map_err(|e| QuestError::Config(format!("Failed to create config directory: {}", e)))?;

        Ok(Self::with_dir(config_dir))
    }

    /// Manager rooted at an explicit directory; nothing is created until `save`
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let config_path = config_dir.join("config.json");
        Self {
            config_dir,
            config_path,
        }
    }

    /// Save configuration to disk
    pub fn save(&self, config: &AppConfig) -> Result<(), QuestError> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| QuestError::Config(format!("Failed to create config directory: {}", e)))?;

        // Pretty print for human readability
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| QuestError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.config_path, json)
            .map_err(|e| QuestError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load configuration from disk
    ///
    /// If config file doesn't exist, returns default configuration
    pub fn load(&self) -> Result<AppConfig, QuestError> {
        if !self.config_exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| QuestError::Config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| QuestError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}
