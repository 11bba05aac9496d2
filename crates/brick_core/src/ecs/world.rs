// world.rs - Scene-owned component store

use crate::ecs::{Entity, EntityMut, Name, Position};

/// The component store a [`Scene`](crate::ecs::Scene) owns.
///
/// Storage and iteration are delegated to `hecs`; this type adds the
/// engine's entity-creation convention (every entity starts with a [`Name`]
/// and a [`Position`]) and keeps the surface systems see small.
#[derive(Default)]
pub struct World {
    inner: hecs::World,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Allocate an entity with a name and a starting position.
    ///
    /// Names are not identifiers; calling this twice with the same name
    /// yields two distinct entities.
    pub fn create_entity(&mut self, name: impl Into<String>, x: f32, y: f32) -> EntityMut<'_> {
        let id = self
            .inner
            .spawn((Name(name.into()), Position::new(x, y)));
        EntityMut::new(&mut self.inner, id)
    }

    /// Reopen the facade for an existing entity.
    pub fn entity(&mut self, id: Entity) -> Option<EntityMut<'_>> {
        if self.inner.contains(id) {
            Some(EntityMut::new(&mut self.inner, id))
        } else {
            None
        }
    }

    pub fn contains(&self, id: Entity) -> bool {
        self.inner.contains(id)
    }

    /// Shared access to one component.
    pub fn get<T: hecs::Component>(&self, id: Entity) -> Option<hecs::Ref<'_, T>> {
        self.inner.get::<&T>(id).ok()
    }

    /// Exclusive access to one component.
    pub fn get_mut<T: hecs::Component>(&mut self, id: Entity) -> Option<&mut T> {
        self.inner.query_one_mut::<&mut T>(id).ok()
    }

    pub fn has<T: hecs::Component>(&self, id: Entity) -> bool {
        self.inner
            .entity(id)
            .map(|entity| entity.has::<T>())
            .unwrap_or(false)
    }

    /// Iterate entities whose components are a superset of `Q`.
    ///
    /// Usable from read-only contexts such as render systems.
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query::<Q>()
    }

    /// Like [`World::query`] but without runtime borrow tracking.
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut::<Q>()
    }

    /// Count entities matching `Q`.
    pub fn count<Q: hecs::Query>(&self) -> usize {
        self.inner.query::<Q>().iter().count()
    }

    pub fn despawn(&mut self, id: Entity) -> bool {
        self.inner.despawn(id).is_ok()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.inner.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Despawn every entity.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl From<hecs::World> for World {
    fn from(inner: hecs::World) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World").field("entities", &self.len()).finish()
    }
}
