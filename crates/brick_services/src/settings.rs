//! Settings management
//!
//! Settings are JSON. Every field has a default, so a file only needs the
//! values it overrides:
//!
//! ```json
//! { "window": { "title": "BRICK", "width": 800 }, "timing": { "target_fps": 30 } }
//! ```

use std::path::Path;

use brick_core::{GameConfig, ecs::Color};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Engine and game settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub timing: TimingSettings,
    pub gameplay: GameplaySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "BRICK".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub target_fps: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            target_fps: brick_core::time::DEFAULT_TARGET_FPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Paddle speed in pixels per second, per axis.
    pub paddle_speed: [f32; 2],
    /// Initial ball velocity in pixels per second.
    pub ball_velocity: [f32; 2],
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            paddle_speed: [500.0, 500.0],
            ball_velocity: [-200.0, 200.0],
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&source)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(source: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.timing.target_fps == 0 {
            return Err(SettingsError::Invalid("target_fps must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Loop configuration derived from these settings.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            title: self.window.title.clone(),
            target_fps: self.timing.target_fps,
            clear_color: Color::BLACK,
        }
    }
}
