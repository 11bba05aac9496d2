//! Loop controller
//!
//! [`Game`] owns the backend (window, clock, input) and at most one active
//! [`Scene`]. Each iteration runs five phases in sequence on the calling
//! thread:
//!
//! 1. frame start: timestamp, delta time (0 on the first frame)
//! 2. events: drain the backend queue, forward each event to the scene
//! 3. update: forward delta time; an [`Outcome`] ends the session
//! 4. render: clear, let the scene draw, present
//! 5. frame end: sleep out the rest of the target duration, count FPS
//!
//! The loop stops on a quit event, [`Game::stop`], a scene outcome, or a
//! fatal backend error. Clean-up runs on every one of those paths.

use std::ops::ControlFlow;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, trace};

use crate::backend::{Backend, BackendError};
use crate::ecs::{Color, Outcome, Scene};
use crate::time::{FpsCounter, FrameClock, DEFAULT_TARGET_FPS};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no active scene; call set_scene before run")]
    NoActiveScene,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Loop settings fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window title; the FPS readout is appended to it.
    pub title: String,
    pub target_fps: u32,
    pub clear_color: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "BRICK".to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            clear_color: Color::BLACK,
        }
    }
}

/// How a finished [`Game::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Set when an update system ended the session; `None` for a quit/stop.
    pub outcome: Option<Outcome>,
    /// Completed iterations.
    pub frames: u64,
}

pub struct Game<B: Backend> {
    backend: B,
    config: GameConfig,
    scene: Option<Scene>,
    clock: FrameClock,
    fps: FpsCounter,
    running: bool,
    outcome: Option<Outcome>,
    frames: u64,
    cleaned: bool,
}

impl<B: Backend> Game<B> {
    pub fn new(backend: B, config: GameConfig) -> Self {
        let clock = FrameClock::with_fps(config.target_fps);
        let fps = FpsCounter::starting_at(backend.now());
        info!(
            title = %config.title,
            target_fps = config.target_fps,
            frame_ms = clock.target().as_secs_f32() * 1000.0,
            "game created"
        );

        Self {
            backend,
            config,
            scene: None,
            clock,
            fps,
            running: true,
            outcome: None,
            frames: 0,
            cleaned: false,
        }
    }

    /// Install `scene` as the active scene, running its setup systems.
    ///
    /// The outgoing scene, if any, is torn down first and handed back.
    /// Passing `None` leaves the game without a scene.
    pub fn set_scene(&mut self, scene: Option<Scene>) -> Option<Scene> {
        let previous = self.scene.take().map(|mut old| {
            old.teardown();
            old
        });

        if let Some(mut scene) = scene {
            scene.setup();
            info!(scene = scene.name(), "scene activated");
            self.scene = Some(scene);
        }

        previous
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ask the loop to finish after the current iteration.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Latest FPS measurement (0 until the first window closes).
    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Delta time of the current (or last) frame, in seconds.
    pub fn delta_time(&self) -> f32 {
        self.clock.delta()
    }

    /// Run the frame loop until it stops, then clean up.
    ///
    /// Fails with [`GameError::NoActiveScene`] before any iteration when no
    /// scene is installed.
    pub fn run(&mut self) -> Result<RunSummary, GameError> {
        if self.scene.is_none() {
            error!("run called without an active scene");
            return Err(GameError::NoActiveScene);
        }

        info!("entering frame loop");
        let result = self.frame_loop();
        self.clean();
        result?;

        info!(frames = self.frames, outcome = ?self.outcome, "frame loop finished");
        Ok(RunSummary {
            outcome: self.outcome,
            frames: self.frames,
        })
    }

    fn frame_loop(&mut self) -> Result<(), GameError> {
        while self.running && self.scene.is_some() {
            self.frame_start();
            self.handle_events();
            if let ControlFlow::Break(outcome) = self.update() {
                self.outcome = Some(outcome);
                self.running = false;
                break;
            }
            self.render()?;
            self.frame_end();
        }
        Ok(())
    }

    fn frame_start(&mut self) {
        let dt = self.clock.begin(self.backend.now());
        trace!(frame = self.frames, dt, "frame start");
    }

    fn handle_events(&mut self) {
        while let Some(event) = self.backend.poll_event() {
            if event.is_quit() {
                info!("quit requested");
                self.running = false;
            }
            if let Some(scene) = self.scene.as_mut() {
                scene.process_events(&event);
            }
        }
    }

    fn update(&mut self) -> ControlFlow<Outcome> {
        match self.scene.as_mut() {
            Some(scene) => scene.update(self.clock.delta()),
            None => ControlFlow::Continue(()),
        }
    }

    fn render(&mut self) -> Result<(), GameError> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };

        self.backend.clear(self.config.clear_color);
        scene.render(self.backend.surface());
        self.backend.present()?;
        Ok(())
    }

    fn frame_end(&mut self) {
        let now = self.backend.now();
        let elapsed = now.saturating_sub(self.clock.frame_start());
        if let Some(delay) = self.clock.end(now) {
            self.backend.sleep(delay);
        }
        trace!(work_ms = elapsed.as_secs_f32() * 1000.0, "frame end");

        self.frames += 1;
        if let Some(fps) = self.fps.tick(self.backend.now()) {
            debug!(fps, "fps window closed");
            if fps > 0.0 {
                let title = format!("{} | FPS: {}", self.config.title, fps as u32);
                self.backend.set_title(&title);
            }
        }
    }

    /// Tear down the active scene and release the backend. Idempotent.
    pub fn clean(&mut self) {
        if self.cleaned {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.teardown();
        }
        self.backend.close();
        self.cleaned = true;
        info!("game cleaned up");
    }

    /// Target frame duration.
    pub fn frame_duration(&self) -> Duration {
        self.clock.target()
    }
}

impl<B: Backend> Drop for Game<B> {
    fn drop(&mut self) {
        self.clean();
    }
}
