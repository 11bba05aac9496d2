//! Brick Engine Core
//!
//! Contains the pieces every game built on the engine shares:
//! - Scene/system dispatch over a `hecs` component store
//! - The frame-loop controller
//! - Frame pacing and FPS accounting
//! - The backend interface windows and test harnesses implement

pub mod backend;
pub mod ecs;
pub mod game;
pub mod time;

pub use backend::{Backend, BackendError, Event, Key, Rect, Surface};
pub use game::{Game, GameConfig, GameError, RunSummary};
pub use glam;
pub use hecs;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
