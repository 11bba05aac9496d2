//! Input abstraction
//!
//! Turns key press/release events into a held-direction state, so movement
//! systems ask "which way" instead of replaying event history.

use brick_core::{Event, Key};
use glam::Vec2;

/// Directional keys currently held down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state. Returns whether it changed anything.
    pub fn apply(&mut self, event: &Event) -> bool {
        let (key, pressed) = match *event {
            Event::KeyDown(key) => (key, true),
            Event::KeyUp(key) => (key, false),
            _ => return false,
        };

        let slot = match key {
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Up => &mut self.up,
            Key::Down => &mut self.down,
            _ => return false,
        };

        let changed = *slot != pressed;
        *slot = pressed;
        changed
    }

    /// Movement direction with components in {-1, 0, 1}, y down.
    /// Opposite keys cancel.
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}
