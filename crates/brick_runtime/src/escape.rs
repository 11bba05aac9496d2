//! Escape-to-quit adapter

use std::time::Duration;

use brick_core::ecs::Color;
use brick_core::{Backend, BackendError, Event, Key, Surface};

/// Wraps a backend so an Escape key press reads as [`Event::Quit`].
#[derive(Debug)]
pub struct EscapeQuits<B> {
    inner: B,
}

impl<B: Backend> EscapeQuits<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: Backend> Backend for EscapeQuits<B> {
    fn now(&self) -> Duration {
        self.inner.now()
    }

    fn sleep(&mut self, duration: Duration) {
        self.inner.sleep(duration);
    }

    fn poll_event(&mut self) -> Option<Event> {
        match self.inner.poll_event()? {
            Event::KeyDown(Key::Escape) => {
                tracing::debug!("escape pressed");
                Some(Event::Quit)
            }
            event => Some(event),
        }
    }

    fn clear(&mut self, color: Color) {
        self.inner.clear(color);
    }

    fn surface(&mut self) -> &mut dyn Surface {
        self.inner.surface()
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.inner.present()
    }

    fn set_title(&mut self, title: &str) {
        self.inner.set_title(title);
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_render::HeadlessBackend;

    #[test]
    fn escape_press_becomes_quit() {
        let mut headless = HeadlessBackend::new(10, 10);
        headless.push_event(Event::KeyDown(Key::Escape));
        headless.push_event(Event::KeyUp(Key::Escape));
        headless.push_event(Event::KeyDown(Key::Left));

        let mut backend = EscapeQuits::new(headless);
        assert_eq!(backend.poll_event(), Some(Event::Quit));
        assert_eq!(backend.poll_event(), Some(Event::KeyUp(Key::Escape)));
        assert_eq!(backend.poll_event(), Some(Event::KeyDown(Key::Left)));
        assert_eq!(backend.poll_event(), None);
    }

    #[test]
    fn everything_else_is_forwarded() {
        let mut backend = EscapeQuits::new(HeadlessBackend::new(10, 10));
        backend.sleep(Duration::from_millis(5));
        backend.set_title("BRICK | FPS: 60");
        backend.close();

        assert_eq!(backend.now(), Duration::from_millis(5));
        let inner = backend.into_inner();
        assert_eq!(inner.titles(), ["BRICK | FPS: 60".to_string()]);
        assert!(inner.is_closed());
    }
}
