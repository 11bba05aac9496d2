//! Frame timing
//!
//! Variable-step loop capped at a target rate (60 Hz = 16.666ms per frame).
//! There is no accumulator: a slow frame simply yields a larger delta time on
//! the next one.
//!
//! Timestamps are `Duration`s read from the backend's monotonic clock.

use std::time::Duration;

/// Default frame cap
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Length of one FPS measurement window
pub const FPS_WINDOW: Duration = Duration::from_millis(1000);

/// Target duration of one frame at `fps`. Zero is treated as 1 Hz.
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Per-frame timestamps and the delta time derived from them.
#[derive(Debug, Clone)]
pub struct FrameClock {
    target: Duration,
    frame_start: Duration,
    last_frame_end: Option<Duration>,
    delta: f32,
}

impl FrameClock {
    pub fn new(target: Duration) -> Self {
        Self {
            target,
            frame_start: Duration::ZERO,
            last_frame_end: None,
            delta: 0.0,
        }
    }

    pub fn with_fps(fps: u32) -> Self {
        Self::new(frame_duration(fps))
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Seconds between the previous frame's end and the current frame's start.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn frame_start(&self) -> Duration {
        self.frame_start
    }

    pub fn last_frame_end(&self) -> Option<Duration> {
        self.last_frame_end
    }

    /// Mark the start of a frame and compute its delta time.
    ///
    /// The first frame after construction (or [`FrameClock::reset`]) gets 0.
    pub fn begin(&mut self, now: Duration) -> f32 {
        self.frame_start = now;
        self.delta = match self.last_frame_end {
            Some(end) => now.saturating_sub(end).as_secs_f32(),
            None => 0.0,
        };
        self.delta
    }

    /// Mark the end of a frame's work.
    ///
    /// Returns how long to sleep to reach the target duration, or `None` when
    /// the frame already ran long enough.
    pub fn end(&mut self, now: Duration) -> Option<Duration> {
        self.last_frame_end = Some(now);
        let elapsed = now.saturating_sub(self.frame_start);
        if elapsed < self.target {
            Some(self.target - elapsed)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.frame_start = Duration::ZERO;
        self.last_frame_end = None;
        self.delta = 0.0;
    }
}

/// Frames-per-second over rolling one-second windows.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    window_start: Duration,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start measuring from `now` instead of the clock origin.
    pub fn starting_at(now: Duration) -> Self {
        Self {
            window_start: now,
            ..Self::default()
        }
    }

    /// Count one frame ending at `now`.
    ///
    /// Once more than [`FPS_WINDOW`] has passed since the window start the
    /// rate is recomputed, the window restarts at `now` and the frame count
    /// drops to 0. Returns the new rate only on those frames.
    pub fn tick(&mut self, now: Duration) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_sub(self.window_start);
        if elapsed <= FPS_WINDOW {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.window_start = now;
        self.frames = 0;
        Some(self.fps)
    }

    /// Last computed rate (0 until the first window closes).
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Frames counted in the current window.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn window_start(&self) -> Duration {
        self.window_start
    }
}
