//! Entity Component System layer.
//!
//! Component storage and filtered iteration come from `hecs`. This module
//! adds the pieces a game loop drives: the scene-owned [`World`] facade,
//! the four system roles, and the [`Scene`] that orders and dispatches them.

mod component;
mod entity;
mod scene;
mod system;
mod world;

pub use component::{Color, Name, Position, Sprite, Velocity};
pub use entity::{Entity, EntityMut};
pub use scene::{Scene, SceneState, SystemCounts};
pub use system::{EventSystem, Flow, Outcome, RenderSystem, SetupSystem, UpdateSystem};
pub use world::World;
