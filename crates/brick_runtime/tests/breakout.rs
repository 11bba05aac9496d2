//! Full sessions of the breakout scene on the headless backend.

use brick_core::ecs::{Color, Outcome, Position, Scene, Sprite, Velocity, World};
use brick_core::{Event, Game, GameConfig, GameError, Key};
use brick_render::HeadlessBackend;
use brick_runtime::breakout::systems::{BALL_COLOR, BRICK_COLOR, BRICK_SIZE, PADDLE_COLOR};
use brick_runtime::breakout::{
    Collider, EnemyCheckSystem, EnemyCollider, EnemyCollisionSystem, MovementSystem,
};
use brick_runtime::{build_scene, EscapeQuits};
use brick_services::Settings;

/// Stops any scenario that fails to end on its own.
const SAFETY_QUIT: u64 = 5_000;

fn headless(settings: &Settings) -> HeadlessBackend {
    let mut backend = HeadlessBackend::new(settings.window.width, settings.window.height);
    backend.schedule(SAFETY_QUIT, Event::Quit);
    backend
}

#[test]
fn quit_ends_the_session_without_an_outcome() {
    let settings = Settings::default();
    let mut backend = headless(&settings);
    backend.schedule(3, Event::Quit);

    let mut game = Game::new(backend, settings.game_config());
    game.set_scene(Some(build_scene(&settings)));
    let summary = game.run().unwrap();

    assert_eq!(summary.outcome, None);
    // the iteration that saw the quit still completes
    assert_eq!(summary.frames, 4);
    assert_eq!(game.backend().frames_presented(), 4);
    assert!(game.backend().is_closed());
}

#[test]
fn escape_quits_through_the_adapter() {
    let settings = Settings::default();
    let mut backend = headless(&settings);
    backend.schedule(2, Event::KeyDown(Key::Escape));

    let mut game = Game::new(EscapeQuits::new(backend), settings.game_config());
    game.set_scene(Some(build_scene(&settings)));
    let summary = game.run().unwrap();

    assert_eq!(summary.outcome, None);
    assert_eq!(summary.frames, 3);
    assert!(game.backend().inner().is_closed());
}

#[test]
fn first_frame_draws_the_whole_field() {
    let settings = Settings::default();
    let mut backend = headless(&settings);
    backend.schedule(1, Event::Quit);

    let mut game = Game::new(backend, settings.game_config());
    game.set_scene(Some(build_scene(&settings)));
    game.run().unwrap();

    let frame = game.backend().last_frame().unwrap();
    let count = |color: Color| frame.commands().iter().filter(|c| c.color == color).count();
    assert_eq!(frame.len(), 6);
    assert_eq!(count(BRICK_COLOR), 4);
    assert_eq!(count(PADDLE_COLOR), 1);
    assert_eq!(count(BALL_COLOR), 1);
}

#[test]
fn ball_falling_past_the_paddle_is_a_defeat() {
    let mut settings = Settings::default();
    // straight down at x = 100, clear of the paddle and the bricks
    settings.gameplay.ball_velocity = [0.0, 2000.0];

    let mut game = Game::new(headless(&settings), settings.game_config());
    game.set_scene(Some(build_scene(&settings)));
    let summary = game.run().unwrap();

    assert_eq!(summary.outcome, Some(Outcome::Defeat));
    assert!(summary.frames < 100);
    assert!(game.backend().is_closed());
    // torn down on the way out
    assert!(game.scene().unwrap().world().is_empty());
}

#[test]
fn clearing_the_last_brick_is_a_victory() {
    let settings = Settings::default();
    let mut scene = Scene::new("one brick", World::new());
    scene
        .add_setup_system(|world: &mut World| {
            world
                .create_entity("Brick", 500.0, 0.0)
                .add_component(Sprite::new(BRICK_SIZE.x, BRICK_SIZE.y, BRICK_COLOR))
                .add_component(EnemyCollider::default());
            world
                .create_entity("Ball", 500.0, 100.0)
                .add_component(Sprite::new(100.0, 100.0, BALL_COLOR))
                .add_component(Velocity::new(0.0, -600.0))
                .add_component(Collider::new(100.0, 100.0));
        })
        .add_update_system(EnemyCollisionSystem)
        .add_update_system(EnemyCheckSystem)
        .add_update_system(MovementSystem);

    let mut game = Game::new(headless(&settings), settings.game_config());
    game.set_scene(Some(scene));
    let summary = game.run().unwrap();

    assert_eq!(summary.outcome, Some(Outcome::Victory));
    // the winning frame is not rendered
    assert_eq!(game.backend().frames_presented(), summary.frames);
}

#[test]
fn arrow_key_moves_the_paddle() {
    let settings = Settings::default();
    let mut backend = headless(&settings);
    backend.schedule(1, Event::KeyDown(Key::Right));
    backend.schedule(10, Event::Quit);

    let mut game = Game::new(backend, settings.game_config());
    game.set_scene(Some(build_scene(&settings)));
    game.run().unwrap();

    let frame = game.backend().last_frame().unwrap();
    let paddle = frame
        .commands()
        .iter()
        .find(|c| c.color == PADDLE_COLOR)
        .unwrap();
    assert!(paddle.rect.x > 512.0);
    assert_eq!(paddle.rect.y, 728.0);
}

#[test]
fn fps_is_shown_in_the_title_after_a_second() {
    let settings = Settings::default();
    let mut backend = headless(&settings);
    backend.schedule(70, Event::Quit);

    let mut game = Game::new(backend, settings.game_config());
    game.set_scene(Some(build_scene(&settings)));
    game.run().unwrap();

    let titles = game.backend().titles();
    assert_eq!(titles.len(), 1);
    assert!(titles[0].starts_with("BRICK | FPS: "));
}

#[test]
fn running_without_a_scene_fails() {
    let mut game = Game::new(HeadlessBackend::new(64, 64), GameConfig::default());
    assert!(matches!(game.run(), Err(GameError::NoActiveScene)));
    assert_eq!(game.backend().frames_presented(), 0);
}

#[test]
fn movement_matches_hand_computed_positions() {
    let mut world = World::new();
    let id = world
        .create_entity("Ball", 100.0, 100.0)
        .add_component(Velocity::new(-200.0, 200.0))
        .id();

    let mut movement = MovementSystem;
    brick_core::ecs::UpdateSystem::run(&mut movement, &mut world, 0.1);

    assert_eq!(*world.get::<Position>(id).unwrap(), Position::new(80.0, 120.0));
}
