//! Gameplay components

use glam::Vec2;

/// Marks an entity steered by the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerController {
    pub enabled: bool,
    /// Pixels per second along each axis while a key is held.
    pub speed: Vec2,
}

/// The paddle's hit box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarCollider {
    pub width: f32,
    pub height: f32,
}

/// A ball's hit box and per-frame collision state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
    /// Already bounced off something this frame.
    pub triggered: bool,
}

impl Collider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            triggered: false,
        }
    }
}

/// A brick. Destroyed bricks stay in the store but no longer collide or draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnemyCollider {
    pub destroyed: bool,
}
