//! Headless backend
//!
//! No window and no GPU. Time only moves when the loop sleeps or when a frame
//! is presented (the configured work cost), so runs are deterministic. Input
//! is scripted up front, optionally pinned to a frame number.

use std::collections::VecDeque;
use std::time::Duration;

use brick_core::ecs::Color;
use brick_core::{Backend, BackendError, Event, Surface};

use crate::draw_list::DrawList;

#[derive(Debug)]
pub struct HeadlessBackend {
    now: Duration,
    frame_cost: Duration,
    slept: Duration,
    /// Available immediately.
    pending: VecDeque<Event>,
    /// `(frame, event)` sorted by frame; released once `frame` frames were presented.
    scheduled: VecDeque<(u64, Event)>,
    frame: DrawList,
    last_frame: Option<DrawList>,
    presented: u64,
    titles: Vec<String>,
    closed: bool,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            now: Duration::ZERO,
            frame_cost: Duration::ZERO,
            slept: Duration::ZERO,
            pending: VecDeque::new(),
            scheduled: VecDeque::new(),
            frame: DrawList::new(width, height),
            last_frame: None,
            presented: 0,
            titles: Vec::new(),
            closed: false,
        }
    }

    /// Simulated time spent rendering each frame.
    pub fn with_frame_cost(mut self, cost: Duration) -> Self {
        self.frame_cost = cost;
        self
    }

    /// Queue an event for the next poll.
    pub fn push_event(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Deliver `event` during the first poll after `frame` frames were presented.
    pub fn schedule(&mut self, frame: u64, event: Event) {
        let at = self.scheduled.partition_point(|(f, _)| *f <= frame);
        self.scheduled.insert(at, (frame, event));
    }

    /// Move the clock without sleeping.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Draw list of the most recently presented frame.
    pub fn last_frame(&self) -> Option<&DrawList> {
        self.last_frame.as_ref()
    }

    pub fn total_sleep(&self) -> Duration {
        self.slept
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn release_scheduled(&mut self) {
        while let Some((frame, _)) = self.scheduled.front() {
            if *frame > self.presented {
                break;
            }
            if let Some((_, event)) = self.scheduled.pop_front() {
                self.pending.push_back(event);
            }
        }
    }
}

impl Backend for HeadlessBackend {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.slept += duration;
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.release_scheduled();
        let event = self.pending.pop_front()?;
        if let Event::Resized { width, height } = event {
            self.frame.resize(width, height);
        }
        Some(event)
    }

    fn clear(&mut self, color: Color) {
        self.frame.begin(color);
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.frame
    }

    fn present(&mut self) -> Result<(), BackendError> {
        if self.closed {
            return Err(BackendError::SurfaceLost);
        }
        self.now += self.frame_cost;
        self.presented += 1;
        self.last_frame = Some(self.frame.clone());
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
