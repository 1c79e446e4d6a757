//! The entity registry and component storage as one value.

use std::rc::Rc;

use stratum_foundation::{EntityId, Result};
use tracing::trace;

use crate::cache::CacheStats;
use crate::component::ComponentManager;
use crate::entity::EntityManager;
use crate::query::QueryResult;
use crate::schema::{ComponentData, ComponentHandle, ComponentSchema, Schema};

/// Entity lifecycle, component lifecycle and queries over one schema.
///
/// This is the data systems see during a tick.
#[derive(Debug)]
pub struct Store {
    entities: EntityManager,
    components: ComponentManager,
}

impl Store {
    /// Creates a store for `schema` holding at most `capacity` live entities.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero or oversized capacity, a
    /// schema with duplicate names, or more than 32 component types.
    pub fn new(schema: &Schema, capacity: usize, cache_capacity: usize) -> Result<Self> {
        let entities = EntityManager::new(capacity)?;
        let components = ComponentManager::new(schema, capacity, cache_capacity)?;
        Ok(Self {
            entities,
            components,
        })
    }

    // ========== Entities ==========

    /// Creates an entity with no components.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` when every index is live.
    pub fn create(&mut self) -> Result<EntityId> {
        let id = self.entities.create()?;
        trace!(entity = %id, "entity created");
        Ok(id)
    }

    /// Destroys an entity, detaching all of its components first.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the entity is not live.
    pub fn destroy(&mut self, id: EntityId) -> Result<()> {
        self.components.remove_all(&self.entities, id)?;
        self.entities.destroy(id)?;
        trace!(entity = %id, "entity destroyed");
        Ok(())
    }

    /// Checks whether an entity is live.
    #[must_use]
    pub fn is_valid(&self, id: EntityId) -> bool {
        self.entities.is_valid(id)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the fixed entity capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Returns the live entities in ascending index order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.entities.active_ids()
    }

    // ========== Components ==========

    /// Attaches a component. See [`ComponentManager::add`].
    ///
    /// # Errors
    ///
    /// Fails if the entity is stale, already has the component, or the data
    /// does not fit the component's schema.
    pub fn add(
        &mut self,
        id: EntityId,
        handle: &ComponentHandle,
        data: Option<&ComponentData>,
    ) -> Result<()> {
        self.components.add(&self.entities, id, handle, data)
    }

    /// Adds or overwrites a component. See [`ComponentManager::set`].
    ///
    /// # Errors
    ///
    /// Fails if the entity is stale or the data does not fit the schema.
    pub fn set(
        &mut self,
        id: EntityId,
        handle: &ComponentHandle,
        data: Option<&ComponentData>,
    ) -> Result<()> {
        self.components.set(&self.entities, id, handle, data)
    }

    /// Detaches a component.
    ///
    /// # Errors
    ///
    /// Fails if the entity is stale or lacks the component.
    pub fn remove(&mut self, id: EntityId, handle: &ComponentHandle) -> Result<()> {
        self.components.remove(&self.entities, id, handle)
    }

    /// Detaches every component, leaving the entity alive.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the entity is not live.
    pub fn remove_all(&mut self, id: EntityId) -> Result<()> {
        self.components.remove_all(&self.entities, id)
    }

    /// Checks whether an entity carries a component.
    #[must_use]
    pub fn has(&self, id: EntityId, handle: &ComponentHandle) -> bool {
        self.entities.is_valid(id) && self.components.has(id, handle)
    }

    /// Reads every field of a component.
    ///
    /// # Errors
    ///
    /// Fails if the entity is stale or lacks the component.
    pub fn get(&self, id: EntityId, handle: &ComponentHandle) -> Result<ComponentData> {
        self.components.get(&self.entities, id, handle)
    }

    // ========== Queries ==========

    /// Finds every live entity carrying at least the given components.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for an empty handle list.
    pub fn query<'a>(
        &mut self,
        handles: impl IntoIterator<Item = &'a ComponentHandle>,
    ) -> Result<Rc<QueryResult>> {
        self.components.query(&self.entities, handles)
    }

    // ========== Schema ==========

    /// Looks up a component handle by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent` if the schema has no such type.
    pub fn handle(&self, name: &str) -> Result<ComponentHandle> {
        self.components.handle(name)
    }

    /// Returns the declared component names in bit order.
    #[must_use]
    pub fn component_names(&self) -> Vec<&str> {
        self.components.component_names()
    }

    /// Returns the schema of a component type.
    ///
    /// # Errors
    ///
    /// Returns `ForeignHandle` for a handle from another instance.
    pub fn schema(&self, handle: &ComponentHandle) -> Result<&ComponentSchema> {
        self.components.schema(handle)
    }

    /// Returns the query cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.components.cache_stats()
    }
}
