//! System roles
//!
//! A scene dispatches four kinds of systems, each a single-method capability.
//! The scene's store is handed to every call as an explicit context argument;
//! systems never keep a reference back to their scene.
//!
//! | Role               | When                          | Store access |
//! |--------------------|-------------------------------|--------------|
//! | [`SetupSystem`]    | once, on scene activation     | mutable      |
//! | [`UpdateSystem`]   | once per frame                | mutable      |
//! | [`RenderSystem`]   | once per frame, after update  | shared       |
//! | [`EventSystem`]    | once per pending input event  | mutable      |
//!
//! Closures with the matching signature are systems too:
//!
//! ```ignore
//! scene.add_update_system(|world: &mut World, dt: f32| {
//!     for (_, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
//!         pos.0 += vel.0 * dt;
//!     }
//!     ControlFlow::Continue(())
//! });
//! ```

use std::ops::ControlFlow;

use crate::backend::{Event, Surface};
use crate::ecs::World;

/// Terminal state of a play session, raised from an update system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    pub fn is_victory(self) -> bool {
        matches!(self, Outcome::Victory)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Victory => f.write_str("victory"),
            Outcome::Defeat => f.write_str("defeat"),
        }
    }
}

/// Result of one update system: keep going, or end the session.
pub type Flow = ControlFlow<Outcome>;

/// Runs exactly once when its scene is set up; typically spawns entities.
pub trait SetupSystem {
    fn run(&mut self, world: &mut World);

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Runs once per frame with the elapsed seconds since the previous frame.
pub trait UpdateSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> Flow;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Draws after update. The store is shared so simulation state cannot change.
pub trait RenderSystem {
    fn run(&mut self, world: &World, surface: &mut dyn Surface);

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Receives every polled input event, one call per event.
pub trait EventSystem {
    fn run(&mut self, world: &mut World, event: &Event);

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> SetupSystem for F
where
    F: FnMut(&mut World),
{
    fn run(&mut self, world: &mut World) {
        self(world)
    }
}

impl<F> UpdateSystem for F
where
    F: FnMut(&mut World, f32) -> Flow,
{
    fn run(&mut self, world: &mut World, dt: f32) -> Flow {
        self(world, dt)
    }
}

impl<F> RenderSystem for F
where
    F: FnMut(&World, &mut dyn Surface),
{
    fn run(&mut self, world: &World, surface: &mut dyn Surface) {
        self(world, surface)
    }
}

impl<F> EventSystem for F
where
    F: FnMut(&mut World, &Event),
{
    fn run(&mut self, world: &mut World, event: &Event) {
        self(world, event)
    }
}
