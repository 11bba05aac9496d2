//! Windowed backend
//!
//! A winit window driven by pumping the event loop from inside the game's
//! own frame loop, drawn with the wgpu quad renderer.
//!
//! Game code sees logical pixels (the settings' window size); only the GPU
//! surface is sized in physical pixels.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use brick_core::ecs::Color;
use brick_core::{Backend, BackendError, Event, Key, Surface};
use brick_services::WindowSettings;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    error::OsError,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

use crate::backend::GpuContext;
use crate::draw_list::DrawList;
use crate::renderer::QuadRenderer;
use crate::RenderError;

/// Startup pumps before giving up on the window appearing.
const STARTUP_PUMPS: u32 = 200;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

fn window_attributes(settings: &WindowSettings) -> WindowAttributes {
    Window::default_attributes()
        .with_title(settings.title.clone())
        .with_inner_size(LogicalSize::new(settings.width, settings.height))
        .with_resizable(false)
}

/// Surface size seen by render systems for a physical window size.
pub(crate) fn logical_size(physical: PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
    let logical: LogicalSize<u32> = physical.to_logical(scale_factor);
    (logical.width, logical.height)
}

fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(KeyCode::ArrowLeft) => Key::Left,
        PhysicalKey::Code(KeyCode::ArrowRight) => Key::Right,
        PhysicalKey::Code(KeyCode::ArrowUp) => Key::Up,
        PhysicalKey::Code(KeyCode::ArrowDown) => Key::Down,
        PhysicalKey::Code(KeyCode::Space) => Key::Space,
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        _ => Key::Other,
    }
}

/// Receives winit callbacks and queues them as engine events.
struct WindowState {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    create_error: Option<OsError>,
    events: VecDeque<Event>,
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.create_error.is_some() {
            return;
        }
        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(err) => self.create_error = Some(err),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.events.push_back(Event::Quit),
            WindowEvent::Resized(size) => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let (width, height) = logical_size(size, scale);
                self.events.push_back(Event::Resized { width, height });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = map_key(event.physical_key);
                match event.state {
                    ElementState::Pressed => self.events.push_back(Event::KeyDown(key)),
                    ElementState::Released => self.events.push_back(Event::KeyUp(key)),
                }
            }
            _ => {}
        }
    }
}

/// [`Backend`] backed by a real window.
pub struct WinitBackend {
    event_loop: EventLoop<()>,
    state: WindowState,
    renderer: Option<QuadRenderer>,
    draw_list: DrawList,
    started: Instant,
    /// Native events were pumped and the queue is still being drained.
    pumped: bool,
}

impl WinitBackend {
    /// Open the window and acquire the GPU. Fails fast on any missing piece.
    pub fn new(settings: &WindowSettings) -> Result<Self, RenderError> {
        let mut event_loop = EventLoop::new()?;
        let mut state = WindowState {
            attributes: window_attributes(settings),
            window: None,
            create_error: None,
            events: VecDeque::new(),
        };

        let mut pumps = 0;
        let window = loop {
            if let Some(err) = state.create_error.take() {
                return Err(err.into());
            }
            if let Some(window) = state.window.clone() {
                break window;
            }
            if pumps == STARTUP_PUMPS {
                return Err(RenderError::WindowNotCreated);
            }
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut state)
            {
                tracing::warn!(code, "event loop exited during startup");
                return Err(RenderError::WindowNotCreated);
            }
            pumps += 1;
        };

        let scale_factor = window.scale_factor();
        let (width, height) = logical_size(window.inner_size(), scale_factor);
        let gpu = pollster::block_on(GpuContext::new(window))?;
        tracing::info!(
            width,
            height,
            scale_factor,
            max_texture = gpu.capabilities.max_texture_size,
            "window opened"
        );

        Ok(Self {
            event_loop,
            state,
            renderer: Some(QuadRenderer::new(gpu)),
            draw_list: DrawList::new(width, height),
            started: Instant::now(),
            pumped: false,
        })
    }

    pub fn window(&self) -> Option<&Window> {
        self.state.window.as_deref()
    }

    fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            tracing::debug!(code, "event loop exited");
            self.state.events.push_back(Event::Quit);
        }
        self.pumped = true;
    }
}

impl Backend for WinitBackend {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn poll_event(&mut self) -> Option<Event> {
        if !self.pumped {
            self.pump();
        }

        let Some(event) = self.state.events.pop_front() else {
            // drained; pump again on the next frame's first poll
            self.pumped = false;
            return None;
        };
        if let Event::Resized { width, height } = event {
            self.draw_list.resize(width, height);
            if let (Some(renderer), Some(window)) =
                (self.renderer.as_mut(), self.state.window.as_ref())
            {
                let physical = window.inner_size();
                renderer.resize(physical.width, physical.height);
            }
        }
        Some(event)
    }

    fn clear(&mut self, color: Color) {
        self.draw_list.begin(color);
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.draw_list
    }

    fn present(&mut self) -> Result<(), BackendError> {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.draw(&self.draw_list),
            None => Ok(()),
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.state.window.as_ref() {
            window.set_title(title);
        }
    }

    fn close(&mut self) {
        // the surface borrows the window, so the renderer goes first
        self.renderer = None;
        self.state.window = None;
        self.state.events.clear();
        tracing::info!("window closed");
    }
}
