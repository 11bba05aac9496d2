//! Rendering/input backend interface
//!
//! The loop controller only talks to a window through [`Backend`]: a
//! monotonic clock, a blocking delay, a non-blocking event poll, rectangle
//! drawing, present and a title setter. `brick_render` provides the windowed
//! and headless implementations.

use std::time::Duration;

use thiserror::Error;

use crate::ecs::Color;

/// Keys the engine distinguishes. Everything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Escape,
    Other,
}

/// Backend-neutral input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Window close or an explicit quit request.
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    Resized { width: u32, height: u32 },
}

impl Event {
    pub fn is_quit(&self) -> bool {
        matches!(self, Event::Quit)
    }
}

/// Rectangle in surface pixels, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test; touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Drawing target handed to render systems.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Size in pixels.
    fn size(&self) -> (u32, u32);
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("surface lost and could not be recovered")]
    SurfaceLost,

    #[error("graphics device out of memory")]
    OutOfMemory,

    #[error("backend failure: {0}")]
    Other(String),
}

/// Window, clock and input source driven by [`Game`](crate::Game).
pub trait Backend {
    /// Monotonic time since the backend was created.
    fn now(&self) -> Duration;

    /// Block the calling thread.
    fn sleep(&mut self, duration: Duration);

    /// Next pending input event, without blocking.
    fn poll_event(&mut self) -> Option<Event>;

    /// Start a frame filled with `color`.
    fn clear(&mut self, color: Color);

    /// Surface for the frame started by [`Backend::clear`].
    fn surface(&mut self) -> &mut dyn Surface;

    /// Show the frame.
    fn present(&mut self) -> Result<(), BackendError>;

    fn set_title(&mut self, title: &str);

    /// Release the window and graphics resources. Called once, after the loop.
    fn close(&mut self);
}
