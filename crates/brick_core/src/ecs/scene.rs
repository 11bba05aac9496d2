// scene.rs - One level/mode: a component store plus its ordered systems

use std::ops::ControlFlow;

use tracing::{debug, info, trace, warn};

use crate::backend::{Event, Surface};
use crate::ecs::{
    EntityMut, EventSystem, Flow, RenderSystem, SetupSystem, UpdateSystem, World,
};

/// Lifecycle of a scene. A torn-down scene goes back to `Active` the next
/// time it is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Systems may be registered; nothing has run.
    Building,
    /// `setup()` ran; per-frame dispatch is live.
    Active,
    /// `teardown()` ran; the store has been emptied. `setup()` runs the
    /// setup systems again.
    TornDown,
}

/// Number of registered systems per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemCounts {
    pub setup: usize,
    pub update: usize,
    pub render: usize,
    pub event: usize,
}

/// Owns a [`World`] and four ordered system lists.
///
/// Registration order is execution order within each phase. Update order
/// matters: systems that reset derived state (collision flags, say) must come
/// before the systems that read it in the same frame. Render order is
/// painter's order; later systems draw on top.
pub struct Scene {
    name: String,
    world: World,
    state: SceneState,
    setup_systems: Vec<Box<dyn SetupSystem>>,
    update_systems: Vec<Box<dyn UpdateSystem>>,
    render_systems: Vec<Box<dyn RenderSystem>>,
    event_systems: Vec<Box<dyn EventSystem>>,
}

impl Scene {
    /// Bind a scene to an already constructed store.
    pub fn new(name: impl Into<String>, world: World) -> Self {
        Self {
            name: name.into(),
            world,
            state: SceneState::Building,
            setup_systems: Vec::new(),
            update_systems: Vec::new(),
            render_systems: Vec::new(),
            event_systems: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn is_set_up(&self) -> bool {
        self.state == SceneState::Active
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Allocate an entity in this scene's store.
    pub fn create_entity(&mut self, name: impl Into<String>, x: f32, y: f32) -> EntityMut<'_> {
        self.world.create_entity(name, x, y)
    }

    pub fn add_setup_system<S: SetupSystem + 'static>(&mut self, system: S) -> &mut Self {
        if self.is_set_up() {
            warn!(
                scene = %self.name,
                system = system.name(),
                "setup system registered on an active scene; it runs on the next setup"
            );
        }
        debug!(scene = %self.name, system = system.name(), "registered setup system");
        self.setup_systems.push(Box::new(system));
        self
    }

    pub fn add_update_system<S: UpdateSystem + 'static>(&mut self, system: S) -> &mut Self {
        debug!(scene = %self.name, system = system.name(), "registered update system");
        self.update_systems.push(Box::new(system));
        self
    }

    pub fn add_render_system<S: RenderSystem + 'static>(&mut self, system: S) -> &mut Self {
        debug!(scene = %self.name, system = system.name(), "registered render system");
        self.render_systems.push(Box::new(system));
        self
    }

    pub fn add_event_system<S: EventSystem + 'static>(&mut self, system: S) -> &mut Self {
        debug!(scene = %self.name, system = system.name(), "registered event system");
        self.event_systems.push(Box::new(system));
        self
    }

    pub fn system_counts(&self) -> SystemCounts {
        SystemCounts {
            setup: self.setup_systems.len(),
            update: self.update_systems.len(),
            render: self.render_systems.len(),
            event: self.event_systems.len(),
        }
    }

    /// Run every setup system once, in registration order.
    ///
    /// Calls on an active scene are no-ops. After [`Scene::teardown`] the
    /// store is empty, so the setup systems run again.
    pub fn setup(&mut self) {
        if self.is_set_up() {
            debug!(scene = %self.name, "setup already ran");
            return;
        }

        for system in &mut self.setup_systems {
            trace!(system = system.name(), "setup");
            system.run(&mut self.world);
        }
        self.state = SceneState::Active;

        info!(
            scene = %self.name,
            entities = self.world.len(),
            systems = self.setup_systems.len(),
            "scene set up"
        );
    }

    /// Forward one input event to every event system.
    pub fn process_events(&mut self, event: &Event) {
        for system in &mut self.event_systems {
            system.run(&mut self.world, event);
        }
    }

    /// Forward the frame's delta time to every update system.
    ///
    /// Stops at the first system that breaks with an outcome; the systems
    /// after it do not run this frame.
    pub fn update(&mut self, dt: f32) -> Flow {
        for system in &mut self.update_systems {
            if let ControlFlow::Break(outcome) = system.run(&mut self.world, dt) {
                info!(scene = %self.name, system = system.name(), %outcome, "session ended");
                return ControlFlow::Break(outcome);
            }
        }
        ControlFlow::Continue(())
    }

    /// Hand the drawing surface to every render system.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        for system in &mut self.render_systems {
            system.run(&self.world, surface);
        }
    }

    /// Release the scene's entities. Repeated calls are no-ops until the
    /// scene is set up again.
    pub fn teardown(&mut self) {
        if self.state == SceneState::TornDown {
            return;
        }
        let released = self.world.len();
        self.world.clear();
        self.state = SceneState::TornDown;
        info!(scene = %self.name, released, "scene torn down");
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("world", &self.world)
            .field("systems", &self.system_counts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Key, Rect};
    use crate::ecs::{Color, Outcome, Position, Velocity};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        label: &'static str,
        log: Log,
    }

    impl UpdateSystem for Recorder {
        fn run(&mut self, _world: &mut World, dt: f32) -> Flow {
            self.log.borrow_mut().push(format!("{}:{dt}", self.label));
            ControlFlow::Continue(())
        }
    }

    impl EventSystem for Recorder {
        fn run(&mut self, _world: &mut World, event: &Event) {
            self.log.borrow_mut().push(format!("{}:{event:?}", self.label));
        }
    }

    impl RenderSystem for Recorder {
        fn run(&mut self, world: &World, surface: &mut dyn Surface) {
            self.log.borrow_mut().push(format!("{}:{}", self.label, world.len()));
            surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        }
    }

    struct Spawner;

    impl SetupSystem for Spawner {
        fn run(&mut self, world: &mut World) {
            world
                .create_entity("ball", 100.0, 100.0)
                .add_component(Velocity::new(-200.0, 200.0));
        }
    }

    #[derive(Default)]
    struct CountingSurface {
        rects: usize,
    }

    impl Surface for CountingSurface {
        fn fill_rect(&mut self, _rect: Rect, _color: Color) {
            self.rects += 1;
        }

        fn size(&self) -> (u32, u32) {
            (1024, 768)
        }
    }

    fn recorder(label: &'static str, log: &Log) -> Recorder {
        Recorder {
            label,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn setup_without_systems_is_a_no_op() {
        let mut scene = Scene::new("empty", World::new());
        scene.setup();

        assert!(scene.is_set_up());
        assert!(scene.world().is_empty());
    }

    #[test]
    fn setup_runs_exactly_once() {
        let mut scene = Scene::new("level", World::new());
        scene.add_setup_system(Spawner);

        scene.setup();
        scene.setup();

        assert_eq!(scene.world().len(), 1);
        assert_eq!(scene.state(), SceneState::Active);
    }

    #[test]
    fn update_dispatch_follows_registration_order() {
        let run = || {
            let log = Log::default();
            let mut scene = Scene::new("order", World::new());
            scene
                .add_update_system(recorder("a", &log))
                .add_update_system(recorder("b", &log))
                .add_update_system(recorder("c", &log));
            scene.setup();
            assert_eq!(scene.update(0.5), ControlFlow::Continue(()));
            let entries = log.borrow().clone();
            entries
        };

        let first = run();
        assert_eq!(first, vec!["a:0.5", "b:0.5", "c:0.5"]);
        assert_eq!(first, run());
    }

    #[test]
    fn breaking_system_stops_the_frame() {
        let log = Log::default();
        let mut scene = Scene::new("end", World::new());
        scene
            .add_update_system(recorder("before", &log))
            .add_update_system(|_: &mut World, _: f32| -> Flow { ControlFlow::Break(Outcome::Defeat) })
            .add_update_system(recorder("after", &log));

        assert_eq!(scene.update(0.1), ControlFlow::Break(Outcome::Defeat));
        assert_eq!(*log.borrow(), vec!["before:0.1"]);
    }

    #[test]
    fn events_reach_every_event_system_in_order() {
        let log = Log::default();
        let mut scene = Scene::new("input", World::new());
        scene
            .add_event_system(recorder("first", &log))
            .add_event_system(recorder("second", &log));

        scene.process_events(&Event::KeyDown(Key::Left));
        scene.process_events(&Event::Quit);

        assert_eq!(
            *log.borrow(),
            vec![
                "first:KeyDown(Left)",
                "second:KeyDown(Left)",
                "first:Quit",
                "second:Quit",
            ]
        );
    }

    #[test]
    fn render_systems_share_the_surface_in_order() {
        let log = Log::default();
        let mut scene = Scene::new("draw", World::new());
        scene.add_setup_system(Spawner);
        scene
            .add_render_system(recorder("back", &log))
            .add_render_system(recorder("front", &log));
        scene.setup();

        let mut surface = CountingSurface::default();
        scene.render(&mut surface);

        assert_eq!(surface.rects, 2);
        assert_eq!(*log.borrow(), vec!["back:1", "front:1"]);
    }

    #[test]
    fn closure_update_system_moves_entities() {
        let mut scene = Scene::new("closures", World::new());
        scene.add_setup_system(Spawner);
        scene.add_update_system(|world: &mut World, dt: f32| -> Flow {
            for (_, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
                pos.0 += vel.0 * dt;
            }
            ControlFlow::Continue(())
        });
        scene.setup();
        let _ = scene.update(0.1);

        let mut query = scene.world().query::<&Position>();
        let (_, pos) = query.iter().next().unwrap();
        assert!((pos.0.x - 80.0).abs() < 1e-4);
        assert!((pos.0.y - 120.0).abs() < 1e-4);
    }

    #[test]
    fn create_entity_returns_distinct_handles_for_equal_names() {
        let mut scene = Scene::new("names", World::new());
        let a = scene.create_entity("Enemy", 0.0, 0.0).id();
        let b = scene.create_entity("Enemy", 0.0, 0.0).id();
        assert_ne!(a, b);
    }

    #[test]
    fn teardown_releases_entities_once() {
        let mut scene = Scene::new("gone", World::new());
        scene.add_setup_system(Spawner);
        scene.setup();
        scene.teardown();
        scene.teardown();

        assert!(scene.world().is_empty());
        assert_eq!(scene.state(), SceneState::TornDown);
    }

    #[test]
    fn setup_after_teardown_respawns() {
        let mut scene = Scene::new("again", World::new());
        scene.add_setup_system(Spawner);
        scene.setup();
        scene.teardown();
        assert!(!scene.is_set_up());

        scene.setup();
        assert_eq!(scene.state(), SceneState::Active);
        assert_eq!(scene.world().len(), 1);
    }

    #[test]
    fn counts_registered_systems() {
        let log = Log::default();
        let mut scene = Scene::new("counts", World::new());
        scene
            .add_setup_system(Spawner)
            .add_update_system(recorder("u", &log))
            .add_event_system(recorder("e", &log));

        assert_eq!(
            scene.system_counts(),
            SystemCounts {
                setup: 1,
                update: 1,
                render: 0,
                event: 1,
            }
        );
    }
}
