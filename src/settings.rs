//! Game settings and preferences
//!
//! Read from a JSON file at startup. Missing or malformed files fall back to
//! defaults; unknown fields are ignored and missing fields take defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::highscores::DEFAULT_HIGH_SCORE_FILE;

/// Environment variable naming the settings file
pub const SETTINGS_ENV_VAR: &str = "SHAPE_INVADERS_SETTINGS";
/// Settings file used when the variable is unset
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed run seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// Where the high score is stored
    pub high_score_path: String,

    // === Accessibility ===
    /// Keep invulnerability flashing off in the render snapshot
    pub reduced_flashing: bool,

    // === Demo ===
    /// Let the AI play
    pub autopilot: bool,
    /// Stop the headless runner after this many ticks
    pub max_demo_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            high_score_path: DEFAULT_HIGH_SCORE_FILE.to_string(),
            reduced_flashing: false,
            autopilot: true,
            max_demo_ticks: 60 * 60 * 5,
        }
    }
}

impl Settings {
    /// Load from the file named by `SHAPE_INVADERS_SETTINGS`, else `settings.json`
    pub fn load() -> Self {
        let path = std::env::var(SETTINGS_ENV_VAR).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.into());
        Self::load_from(Path::new(&path))
    }

    /// Load from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match read_settings(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                if path.exists() {
                    log::warn!("{e}, using defaults");
                } else {
                    log::info!("Using default settings");
                }
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;
        fs::write(path, json).map_err(|e| format!("Failed to write settings file: {e}"))
    }
}

fn read_settings(path: &Path) -> Result<Settings, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("Failed to read settings: {e}"))?;
    serde_json::from_str(&json).map_err(|e| format!("Failed to parse settings: {e}"))
}
