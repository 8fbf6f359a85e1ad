use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::AppError;
use crate::app::services::sequence::SequenceOptions;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_highlighting")]
    pub highlighting_enabled: bool,

    /// Delay between the last edit and the reclassification pass.
    #[serde(default = "default_debounce_ms")]
    pub highlight_debounce_ms: u32,

    /// Defaults used when starting a sequence paste.
    #[serde(default)]
    pub sequence_options: SequenceOptions,
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Dark
}

fn default_font_size() -> u32 {
    15
}

fn default_highlighting() -> bool {
    true
}

fn default_debounce_ms() -> u32 {
    80
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            font_size: default_font_size(),
            highlighting_enabled: default_highlighting(),
            highlight_debounce_ms: default_debounce_ms(),
            sequence_options: SequenceOptions::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    fn load_from(config_path: &Path) -> Self {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                let _ = default.save();
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::get_config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("markpad");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.font_size, 15);
        assert!(settings.highlighting_enabled);
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert_eq!(settings.highlight_debounce_ms, 80);
        assert!(settings.sequence_options.auto_increment);
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_config() {
        // Simulate old config missing new fields
        let json = r#"{"font_size": 18}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.font_size, 18);
        assert!(settings.highlighting_enabled);
        assert_eq!(settings.highlight_debounce_ms, 80);
    }

    #[test]
    fn test_theme_mode_serialization() {
        let settings = AppSettings {
            theme_mode: ThemeMode::Light,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"Light\""));
    }

    #[test]
    fn test_load_from_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let settings = AppSettings::load_from(&path);
        assert_eq!(settings, AppSettings::default());
    }
}
