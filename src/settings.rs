//! Game settings and preferences
//!
//! Loaded from a JSON file by the native runner. Missing fields take their
//! defaults so old files keep working.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tuning::Difficulty;

/// Errors while reading a settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Run ===
    /// Difficulty picked when the runner starts a run
    pub difficulty: Difficulty,
    /// RNG seed (None = derive one from the clock)
    pub seed: Option<u64>,
    /// Play area size in pixels
    pub width: f32,
    pub height: f32,
    /// Simulated seconds the headless runner plays before giving up
    pub run_seconds: f32,

    // === Feedback ===
    /// Emit sound cues (plop/splash)
    pub sfx_enabled: bool,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Screen shake on misses
    pub screen_shake: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            seed: None,
            width: 800.0,
            height: 600.0,
            run_seconds: 120.0,

            sfx_enabled: true,
            music_volume: 0.5,
            screen_shake: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e} ({}), using default settings", path.display());
                Self::default()
            }
        }
    }
}
