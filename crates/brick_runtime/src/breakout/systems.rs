//! Breakout systems
//!
//! Collision systems look one step ahead (position + velocity * dt) and only
//! touch velocities; [`MovementSystem`] runs last and applies them.

use std::ops::ControlFlow;

use brick_core::ecs::{
    Color, Entity, EventSystem, Flow, Outcome, Position, RenderSystem, SetupSystem, Sprite,
    UpdateSystem, Velocity, World,
};
use brick_core::{Event, Rect, Surface};
use brick_services::InputState;
use glam::Vec2;
use tracing::{debug, info};

use super::components::{BarCollider, Collider, EnemyCollider, PlayerController};
use super::Field;

pub const PADDLE_SIZE: Vec2 = Vec2::new(200.0, 30.0);
pub const PADDLE_COLOR: Color = Color::rgb(0, 0, 255);
/// Gap between the paddle's top edge and the bottom of the field.
pub const PADDLE_LIFT: f32 = 40.0;

pub const BALL_START: Vec2 = Vec2::new(100.0, 100.0);
pub const BALL_SIZE: Vec2 = Vec2::new(100.0, 100.0);
pub const BALL_COLOR: Color = Color::rgb(229, 235, 231);

pub const BRICK_SIZE: Vec2 = Vec2::new(100.0, 50.0);
pub const BRICK_COLOR: Color = Color::rgb(255, 0, 0);
pub const BRICK_LAYOUT: [Vec2; 4] = [
    Vec2::new(500.0, 0.0),
    Vec2::new(650.0, 200.0),
    Vec2::new(750.0, 0.0),
    Vec2::new(300.0, 200.0),
];

fn predicted(position: Vec2, velocity: Vec2, size: Vec2, dt: f32) -> Rect {
    let next = position + velocity * dt;
    Rect::new(next.x, next.y, size.x, size.y)
}

fn rect_at(position: Vec2, size: Vec2) -> Rect {
    Rect::new(position.x, position.y, size.x, size.y)
}

/// Spawns the paddle, the ball and the bricks.
pub struct SpawnSystem {
    field: Field,
    paddle_speed: Vec2,
    ball_velocity: Vec2,
}

impl SpawnSystem {
    pub fn new(field: Field, paddle_speed: Vec2, ball_velocity: Vec2) -> Self {
        Self {
            field,
            paddle_speed,
            ball_velocity,
        }
    }
}

impl SetupSystem for SpawnSystem {
    fn run(&mut self, world: &mut World) {
        world
            .create_entity(
                "Paddle",
                self.field.width / 2.0,
                self.field.height - PADDLE_LIFT,
            )
            .add_component(Sprite::new(PADDLE_SIZE.x, PADDLE_SIZE.y, PADDLE_COLOR))
            .add_component(Velocity::default())
            .add_component(PlayerController {
                enabled: true,
                speed: self.paddle_speed,
            })
            .add_component(BarCollider {
                width: PADDLE_SIZE.x,
                height: PADDLE_SIZE.y,
            });

        world
            .create_entity("Ball", BALL_START.x, BALL_START.y)
            .add_component(Sprite::new(BALL_SIZE.x, BALL_SIZE.y, BALL_COLOR))
            .add_component(Velocity(self.ball_velocity))
            .add_component(Collider::new(BALL_SIZE.x, BALL_SIZE.y));

        for at in BRICK_LAYOUT {
            world
                .create_entity("Brick", at.x, at.y)
                .add_component(Sprite::new(BRICK_SIZE.x, BRICK_SIZE.y, BRICK_COLOR))
                .add_component(EnemyCollider::default());
        }

        info!(entities = world.len(), "breakout field spawned");
    }
}

/// Clears last frame's `Collider::triggered`.
pub struct ColliderResetSystem;

impl UpdateSystem for ColliderResetSystem {
    fn run(&mut self, world: &mut World, _dt: f32) -> Flow {
        for (_, collider) in world.query_mut::<&mut Collider>() {
            collider.triggered = false;
        }
        ControlFlow::Continue(())
    }
}

/// Ball against paddle: the ball always leaves upward.
pub struct PlayerColliderSystem;

impl UpdateSystem for PlayerColliderSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> Flow {
        let paddles: Vec<Rect> = world
            .query::<(&Position, &BarCollider)>()
            .iter()
            .map(|(_, (pos, bar))| rect_at(pos.0, Vec2::new(bar.width, bar.height)))
            .collect();
        if paddles.is_empty() {
            return ControlFlow::Continue(());
        }

        for (_, (pos, vel, collider)) in
            world.query_mut::<(&Position, &mut Velocity, &mut Collider)>()
        {
            if collider.triggered {
                continue;
            }
            let next = predicted(pos.0, vel.0, Vec2::new(collider.width, collider.height), dt);
            if paddles.iter().any(|paddle| paddle.intersects(&next)) {
                vel.0.y = -vel.0.y.abs();
                collider.triggered = true;
            }
        }
        ControlFlow::Continue(())
    }
}

/// A ball about to cross the bottom edge ends the game.
pub struct LoseSystem {
    field: Field,
}

impl LoseSystem {
    pub fn new(field: Field) -> Self {
        Self { field }
    }
}

impl UpdateSystem for LoseSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> Flow {
        for (_, (pos, vel, collider)) in world.query::<(&Position, &Velocity, &Collider)>().iter() {
            let next = predicted(pos.0, vel.0, Vec2::new(collider.width, collider.height), dt);
            if next.bottom() > self.field.height {
                info!(y = pos.0.y, "ball left the field");
                return ControlFlow::Break(Outcome::Defeat);
            }
        }
        ControlFlow::Continue(())
    }
}

/// Stops the paddle at the field edges.
pub struct PlayerWallHitSystem {
    field: Field,
}

impl PlayerWallHitSystem {
    pub fn new(field: Field) -> Self {
        Self { field }
    }
}

impl UpdateSystem for PlayerWallHitSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> Flow {
        for (_, (pos, vel, bar)) in world.query_mut::<(&Position, &mut Velocity, &BarCollider)>() {
            let next = predicted(pos.0, vel.0, Vec2::new(bar.width, bar.height), dt);
            if next.x < 0.0 || next.right() > self.field.width {
                vel.0.x = 0.0;
            }
            if next.y < 0.0 || next.bottom() > self.field.height {
                vel.0.y = 0.0;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Ball against bricks. Each ball destroys at most one brick per frame.
pub struct EnemyCollisionSystem;

impl UpdateSystem for EnemyCollisionSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> Flow {
        let balls: Vec<(Entity, Rect)> = world
            .query::<(&Position, &Velocity, &Collider)>()
            .iter()
            .filter(|(_, (_, _, collider))| !collider.triggered)
            .map(|(id, (pos, vel, collider))| {
                let size = Vec2::new(collider.width, collider.height);
                (id, predicted(pos.0, vel.0, size, dt))
            })
            .collect();

        for (ball, next) in balls {
            let hit = world
                .query_mut::<(&Position, &Sprite, &mut EnemyCollider)>()
                .into_iter()
                .find(|(_, (pos, sprite, enemy))| {
                    !enemy.destroyed && rect_at(pos.0, sprite.size()).intersects(&next)
                })
                .map(|(id, (_, _, enemy))| {
                    enemy.destroyed = true;
                    id
                });

            let Some(brick) = hit else { continue };
            debug!(?ball, ?brick, "brick destroyed");
            if let Some(vel) = world.get_mut::<Velocity>(ball) {
                vel.0.y = -vel.0.y;
            }
            if let Some(collider) = world.get_mut::<Collider>(ball) {
                collider.triggered = true;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Reflects balls off the field edges.
pub struct WallHitSystem {
    field: Field,
}

impl WallHitSystem {
    pub fn new(field: Field) -> Self {
        Self { field }
    }
}

impl UpdateSystem for WallHitSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> Flow {
        for (_, (pos, vel, collider)) in world.query_mut::<(&Position, &mut Velocity, &Collider)>() {
            let next = predicted(pos.0, vel.0, Vec2::new(collider.width, collider.height), dt);
            if next.x < 0.0 || next.right() > self.field.width {
                vel.0.x = -vel.0.x;
            }
            if next.y < 0.0 || next.bottom() > self.field.height {
                vel.0.y = -vel.0.y;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Every brick destroyed ends the game. A field without bricks counts.
pub struct EnemyCheckSystem;

impl UpdateSystem for EnemyCheckSystem {
    fn run(&mut self, world: &mut World, _dt: f32) -> Flow {
        let cleared = world
            .query::<&EnemyCollider>()
            .iter()
            .all(|(_, enemy)| enemy.destroyed);
        if cleared {
            info!("all bricks destroyed");
            ControlFlow::Break(Outcome::Victory)
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Arrow keys drive every enabled [`PlayerController`].
#[derive(Default)]
pub struct PlayerMovementSystem {
    input: InputState,
}

impl PlayerMovementSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSystem for PlayerMovementSystem {
    fn run(&mut self, world: &mut World, event: &Event) {
        if !self.input.apply(event) {
            return;
        }
        let axis = self.input.axis();
        for (_, (vel, controller)) in world.query_mut::<(&mut Velocity, &PlayerController)>() {
            if controller.enabled {
                vel.0 = axis * controller.speed;
            }
        }
    }
}

/// `position += velocity * dt`
pub struct MovementSystem;

impl UpdateSystem for MovementSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> Flow {
        for (_, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
            pos.0 += vel.0 * dt;
        }
        ControlFlow::Continue(())
    }
}

/// Draws every sprite except destroyed bricks.
pub struct SpriteRenderSystem;

impl RenderSystem for SpriteRenderSystem {
    fn run(&mut self, world: &World, surface: &mut dyn Surface) {
        for (_, (pos, sprite, enemy)) in world
            .query::<(&Position, &Sprite, Option<&EnemyCollider>)>()
            .iter()
        {
            if enemy.is_some_and(|enemy| enemy.destroyed) {
                continue;
            }
            surface.fill_rect(rect_at(pos.0, sprite.size()), sprite.color);
        }
    }
}
