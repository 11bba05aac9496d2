//! Brick Render System
//!
//! Implementations of [`brick_core::Backend`]:
//! - [`WinitBackend`]: a winit window drawn with wgpu
//! - [`HeadlessBackend`]: no window, manual clock, scripted input (tests, CI)

pub mod backend;
pub mod draw_list;
pub mod headless;
mod renderer;
pub mod window;

pub use draw_list::{DrawCommand, DrawList};
pub use headless::HeadlessBackend;
pub use window::WinitBackend;

pub use wgpu;
pub use winit;

use thiserror::Error;

/// Failures while acquiring the window or graphics device.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("window was not created during startup")]
    WindowNotCreated,

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
