//! Breakout demo
//!
//! One scene: a paddle, a ball and a row of bricks. Clearing every brick is
//! a victory; letting the ball reach the bottom edge is a defeat.

pub mod components;
pub mod systems;

use brick_core::ecs::{Scene, World};
use brick_services::Settings;
use glam::Vec2;

pub use components::{BarCollider, Collider, EnemyCollider, PlayerController};
pub use systems::{
    ColliderResetSystem, EnemyCheckSystem, EnemyCollisionSystem, LoseSystem, MovementSystem,
    PlayerColliderSystem, PlayerMovementSystem, PlayerWallHitSystem, SpawnSystem,
    SpriteRenderSystem, WallHitSystem,
};

/// Play-field size in pixels, fixed when systems are registered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<&Settings> for Field {
    fn from(settings: &Settings) -> Self {
        Self::new(settings.window.width as f32, settings.window.height as f32)
    }
}

/// Assemble the breakout scene. Update systems run in the order listed;
/// collision checks see last frame's positions and [`MovementSystem`] applies
/// the resulting velocities at the end.
pub fn build_scene(settings: &Settings) -> Scene {
    let field = Field::from(settings);
    let paddle_speed = Vec2::from(settings.gameplay.paddle_speed);
    let ball_velocity = Vec2::from(settings.gameplay.ball_velocity);

    let mut scene = Scene::new("breakout", World::new());
    scene
        .add_setup_system(SpawnSystem::new(field, paddle_speed, ball_velocity))
        .add_update_system(ColliderResetSystem)
        .add_update_system(PlayerColliderSystem)
        .add_update_system(LoseSystem::new(field))
        .add_update_system(PlayerWallHitSystem::new(field))
        .add_update_system(EnemyCollisionSystem)
        .add_update_system(WallHitSystem::new(field))
        .add_update_system(EnemyCheckSystem)
        .add_event_system(PlayerMovementSystem::new())
        .add_update_system(MovementSystem)
        .add_render_system(SpriteRenderSystem);
    scene
}
