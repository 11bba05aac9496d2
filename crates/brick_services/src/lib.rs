//! Brick Services Layer
//!
//! Platform-facing helpers shared by the runtime: settings and input state.

pub mod input;
pub mod settings;

pub use input::InputState;
pub use settings::{GameplaySettings, Settings, SettingsError, TimingSettings, WindowSettings};
