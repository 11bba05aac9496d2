//! Entity handles
//!
//! Entities are opaque `hecs` ids (generation-indexed, 8 bytes) that are only
//! meaningful inside the [`World`](crate::ecs::World) that created them. They
//! carry no data; everything lives in attached components.
//!
//! [`EntityMut`] is a short-lived facade bound to one world, used to attach
//! components right after creation:
//!
//! ```ignore
//! let paddle = world
//!     .create_entity("PADDLE", 412.0, 728.0)
//!     .add_component(Velocity::default())
//!     .add_component(Sprite::new(200.0, 30.0, Color::rgb(0, 0, 255)))
//!     .id();
//! ```

pub use hecs::Entity;

/// Mutable view of one entity inside its world.
pub struct EntityMut<'w> {
    world: &'w mut hecs::World,
    id: Entity,
}

impl<'w> EntityMut<'w> {
    pub(crate) fn new(world: &'w mut hecs::World, id: Entity) -> Self {
        Self { world, id }
    }

    pub fn id(&self) -> Entity {
        self.id
    }

    /// Attach `component`. Attaching a type the entity already has replaces
    /// the old value.
    pub fn add_component<T: hecs::Component>(self, component: T) -> Self {
        if self.world.insert_one(self.id, component).is_err() {
            tracing::warn!(entity = ?self.id, "component attached to a despawned entity");
        }
        self
    }

    /// Detach and return a component, if present.
    pub fn remove_component<T: hecs::Component>(&mut self) -> Option<T> {
        self.world.remove_one::<T>(self.id).ok()
    }

    pub fn has<T: hecs::Component>(&self) -> bool {
        self.world
            .entity(self.id)
            .map(|entity| entity.has::<T>())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityMut").field("id", &self.id).finish()
    }
}
