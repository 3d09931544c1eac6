//! Game settings and preferences
//!
//! Loaded from a JSON file by the native runner. Tuning constants (speeds,
//! radii, pool capacities) are compiled in; see [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_PLAYERS;

/// How players relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// One ship; clearing the scripted wave table wins
    #[default]
    SinglePlayer,
    /// Several ships on one team; bullets never hurt other players
    Coop,
    /// Several ships; bullets from other players do damage
    Versus,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::SinglePlayer => "SinglePlayer",
            GameMode::Coop => "Coop",
            GameMode::Versus => "Versus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "singleplayer" | "solo" => Some(GameMode::SinglePlayer),
            "coop" | "co-op" => Some(GameMode::Coop),
            "versus" | "vs" | "pvp" => Some(GameMode::Versus),
            _ => None,
        }
    }

    /// Whether player bullets can damage other players
    pub fn friendly_fire(&self) -> bool {
        !matches!(self, GameMode::Coop)
    }
}

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("player_count must be between 1 and {max}, got {got}")]
    PlayerCount { got: u32, max: u32 },
    #[error("single player mode needs exactly one player, got {0}")]
    SinglePlayerCount(u32),
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Player relationship and win condition
    pub mode: GameMode,
    /// Ships created at game start
    pub player_count: u32,
    /// Run seed; a fresh one is drawn when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Camera shake on impacts
    pub screen_shake: bool,
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,

    // === Demo ===
    /// Ships fly themselves
    pub autopilot: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::SinglePlayer,
            player_count: 1,
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,

            screen_shake: true,
            reduced_motion: false,

            autopilot: false,
        }
    }
}

impl GameSettings {
    /// Settings for a given mode with a sensible player count
    pub fn for_mode(mode: GameMode, player_count: u32) -> Self {
        Self {
            mode,
            player_count,
            ..Self::default()
        }
    }

    /// More than one ship in play
    pub fn is_multiplayer(&self) -> bool {
        self.mode != GameMode::SinglePlayer
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective sound effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Check ranges and clamp volumes
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        let max = MAX_PLAYERS as u32;
        if self.player_count == 0 || self.player_count > max {
            return Err(SettingsError::PlayerCount {
                got: self.player_count,
                max,
            });
        }
        if self.mode == GameMode::SinglePlayer && self.player_count != 1 {
            return Err(SettingsError::SinglePlayerCount(self.player_count));
        }
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        Ok(self)
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validated()
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {err}");
                Self::default()
            }
        }
    }
}
