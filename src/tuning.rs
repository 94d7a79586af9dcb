//! Difficulty presets
//!
//! Chosen once when a run starts and fixed for the rest of it.

use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY_SCALE;

/// Difficulty levels offered on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parameter bundle for this preset
    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                spawn_delay_mult: 2.5,
                catch_bonus: 20.0,
                miss_penalty: 12.0,
                chef_speed: 12.0,
                gravity: 0.35,
            },
            Difficulty::Medium => DifficultyParams {
                spawn_delay_mult: 1.8,
                catch_bonus: 12.0,
                miss_penalty: 25.0,
                chef_speed: 10.0,
                gravity: 0.6,
            },
            Difficulty::Hard => DifficultyParams {
                spawn_delay_mult: 1.2,
                catch_bonus: 8.0,
                miss_penalty: 40.0,
                chef_speed: 8.0,
                gravity: 0.85,
            },
        }
    }
}

/// Balance knobs for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Multiplier on the base spawn delay range
    pub spawn_delay_mult: f32,
    /// Soup quality per catch
    pub catch_bonus: f32,
    /// Panic per floor hit
    pub miss_penalty: f32,
    /// Chef movement in px per logic tick
    pub chef_speed: f32,
    /// Gravity in engine units
    pub gravity: f32,
}

impl DifficultyParams {
    /// Downward acceleration in px/s²
    pub fn gravity_px(&self) -> f32 {
        self.gravity * GRAVITY_SCALE
    }
}
