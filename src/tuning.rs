//! Data-driven game balance
//!
//! Defaults mirror `consts`. A JSON override can be stored next to the high
//! score, which is handy for playtesting speeds without a rebuild.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Difficulty picked on the start menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier applied to the pursuer base speed
    pub fn pursuer_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Hard => 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("tile size must be positive, got {0}")]
    TileSize(f32),
    #[error("{name} speed must be positive and below one tile per tick, got {value}")]
    Speed { name: &'static str, value: f32 },
    #[error("{name} radius must be positive and fit inside a tile, got {value}")]
    Radius { name: &'static str, value: f32 },
    #[error("starting lives must be at least 1")]
    NoLives,
    #[error("invalid tuning JSON: {0}")]
    Json(String),
}

/// Balance values read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub tile_size: f32,
    /// Pixels per tick
    pub player_speed: f32,
    /// Pixels per tick, before the difficulty multiplier
    pub pursuer_base_speed: f32,
    pub entity_radius: f32,
    pub dot_radius: f32,
    pub power_radius: f32,
    pub dot_value: u64,
    pub power_value: u64,
    pub start_lives: u8,
    /// Seconds the board freezes after a life is lost
    pub reset_delay_secs: f32,
    pub swipe_threshold: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            player_speed: PLAYER_SPEED,
            pursuer_base_speed: PURSUER_BASE_SPEED,
            entity_radius: ENTITY_RADIUS,
            dot_radius: DOT_RADIUS,
            power_radius: POWER_RADIUS,
            dot_value: DOT_VALUE,
            power_value: POWER_VALUE,
            start_lives: START_LIVES,
            reset_delay_secs: RESET_DELAY_SECS,
            swipe_threshold: SWIPE_THRESHOLD,
        }
    }
}

impl Tuning {
    /// Storage key for an optional JSON override
    pub const STORAGE_KEY: &'static str = "pixelMuncherTuning";

    /// Parse and validate a JSON override. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Json(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.tile_size.is_nan() || self.tile_size <= 0.0 {
            return Err(TuningError::TileSize(self.tile_size));
        }
        // A step longer than a tile would skip collision checks entirely
        let max_speed = self.tile_size * self.difficulty_ceiling();
        check_speed("player", self.player_speed, self.tile_size)?;
        check_speed("pursuer", self.pursuer_base_speed, max_speed)?;
        check_radius("entity", self.entity_radius, self.tile_size)?;
        check_radius("dot", self.dot_radius, self.tile_size)?;
        check_radius("power", self.power_radius, self.tile_size)?;
        if self.start_lives == 0 {
            return Err(TuningError::NoLives);
        }
        Ok(())
    }

    /// Pursuer speed for a difficulty
    pub fn pursuer_speed(&self, difficulty: Difficulty) -> f32 {
        self.pursuer_base_speed * difficulty.pursuer_multiplier()
    }

    /// Reset delay converted to whole simulation ticks
    pub fn reset_delay_ticks(&self) -> u32 {
        (self.reset_delay_secs.max(0.0) * TICKS_PER_SECOND).round() as u32
    }

    fn difficulty_ceiling(&self) -> f32 {
        1.0 / Difficulty::Hard.pursuer_multiplier()
    }

    /// Load an override from storage, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring stored tuning: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
            Err(e) => log::warn!("Failed to serialize tuning: {}", e),
        }
    }
}

fn check_speed(name: &'static str, value: f32, max: f32) -> Result<(), TuningError> {
    if value > 0.0 && value < max {
        Ok(())
    } else {
        Err(TuningError::Speed { name, value })
    }
}

fn check_radius(name: &'static str, value: f32, tile: f32) -> Result<(), TuningError> {
    if value > 0.0 && value <= tile / 2.0 {
        Ok(())
    } else {
        Err(TuningError::Radius { name, value })
    }
}
