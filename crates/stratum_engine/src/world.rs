//! The world: storage and systems behind one API.

use std::rc::Rc;

use stratum_foundation::{EntityId, ErrorContext, Result};
use stratum_storage::{
    CacheStats, ComponentData, ComponentHandle, ComponentSchema, QueryResult, Schema, Store,
};
use tracing::debug;

use crate::config::WorldConfig;
use crate::scheduler::SystemManager;
use crate::system::System;

/// An ECS instance: entities, components, queries and systems.
///
/// Systems operate on the world's [`Store`]. Hosts drive the simulation by
/// calling [`World::tick`] and must call [`World::teardown_all`] when done;
/// dropping a world does not run teardown hooks.
#[derive(Debug)]
pub struct World {
    store: Store,
    systems: SystemManager<Store>,
}

impl World {
    /// Creates a world for `schema`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid config, duplicate
    /// schema names, or more than 32 component types.
    pub fn new(schema: &Schema, config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let store = Store::new(schema, config.capacity, config.query_cache_capacity)?;
        debug!(
            components = schema.len(),
            capacity = config.capacity,
            query_cache_capacity = config.query_cache_capacity,
            "world created"
        );
        Ok(Self {
            store,
            systems: SystemManager::new(),
        })
    }

    /// Creates a world with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`World::new`].
    pub fn with_schema(schema: &Schema) -> Result<Self> {
        Self::new(schema, &WorldConfig::default())
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the underlying store mutably.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    // ========== Entities ==========

    /// Creates an empty entity.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` when the world is full.
    pub fn create(&mut self) -> Result<EntityId> {
        self.store.create()
    }

    /// Creates an entity and attaches several components at once.
    ///
    /// If any component fails, the entity is destroyed and the error is
    /// returned, so no half-built entity is left behind.
    ///
    /// # Errors
    ///
    /// Returns the creation error or the first failing `add`.
    pub fn spawn<'a>(
        &mut self,
        components: impl IntoIterator<Item = (&'a ComponentHandle, ComponentData)>,
    ) -> Result<EntityId> {
        let id = self.store.create()?;
        for (handle, data) in components {
            if let Err(error) = self.store.add(id, handle, Some(&data)) {
                self.store.destroy(id)?;
                return Err(error.with_context(ErrorContext::new().with_operation("spawn")));
            }
        }
        Ok(id)
    }

    /// Destroys an entity and all of its components.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the entity is not live.
    pub fn destroy(&mut self, id: EntityId) -> Result<()> {
        self.store.destroy(id)
    }

    /// Checks whether an entity is live.
    #[must_use]
    pub fn is_valid(&self, id: EntityId) -> bool {
        self.store.is_valid(id)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Returns the live entities in ascending index order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.store.active_ids()
    }

    // ========== Components ==========

    /// Attaches a component.
    ///
    /// # Errors
    ///
    /// See [`Store::add`].
    pub fn add(
        &mut self,
        id: EntityId,
        handle: &ComponentHandle,
        data: Option<&ComponentData>,
    ) -> Result<()> {
        self.store.add(id, handle, data)
    }

    /// Adds or overwrites a component.
    ///
    /// # Errors
    ///
    /// See [`Store::set`].
    pub fn set(
        &mut self,
        id: EntityId,
        handle: &ComponentHandle,
        data: Option<&ComponentData>,
    ) -> Result<()> {
        self.store.set(id, handle, data)
    }

    /// Detaches a component.
    ///
    /// # Errors
    ///
    /// See [`Store::remove`].
    pub fn remove(&mut self, id: EntityId, handle: &ComponentHandle) -> Result<()> {
        self.store.remove(id, handle)
    }

    /// Detaches every component of a live entity.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the entity is not live.
    pub fn remove_all(&mut self, id: EntityId) -> Result<()> {
        self.store.remove_all(id)
    }

    /// Checks whether an entity carries a component.
    #[must_use]
    pub fn has(&self, id: EntityId, handle: &ComponentHandle) -> bool {
        self.store.has(id, handle)
    }

    /// Reads every field of a component.
    ///
    /// # Errors
    ///
    /// See [`Store::get`].
    pub fn get(&self, id: EntityId, handle: &ComponentHandle) -> Result<ComponentData> {
        self.store.get(id, handle)
    }

    /// Finds every live entity carrying at least the given components.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for an empty handle list.
    pub fn query<'a>(
        &mut self,
        handles: impl IntoIterator<Item = &'a ComponentHandle>,
    ) -> Result<Rc<QueryResult>> {
        self.store.query(handles)
    }

    /// Looks up a component handle by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent` if the schema has no such type.
    pub fn handle(&self, name: &str) -> Result<ComponentHandle> {
        self.store.handle(name)
    }

    /// Returns the declared component names in bit order.
    #[must_use]
    pub fn component_names(&self) -> Vec<&str> {
        self.store.component_names()
    }

    /// Returns the schema of a component type.
    ///
    /// # Errors
    ///
    /// Returns `ForeignHandle` for a handle from another world.
    pub fn schema(&self, handle: &ComponentHandle) -> Result<&ComponentSchema> {
        self.store.schema(handle)
    }

    /// Returns the query cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.store.cache_stats()
    }

    // ========== Systems ==========

    /// Registers a system; higher priorities run first.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::register`].
    pub fn register<S: System<Store> + 'static>(&mut self, system: S, priority: i32) -> Result<()> {
        self.systems.register(system, priority)
    }

    /// Unregisters a system by name.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::unregister`].
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        self.systems.unregister(name)
    }

    /// Checks whether a system is registered.
    #[must_use]
    pub fn has_system(&self, name: &str) -> bool {
        self.systems.has_system(name)
    }

    /// Returns the registered system names in execution order.
    #[must_use]
    pub fn system_names(&self) -> Vec<String> {
        self.systems.names()
    }

    /// Runs every registered system once.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::run_all`].
    pub fn run_all(&mut self, delta_time: f64) -> Result<()> {
        self.systems.run_all(&mut self.store, delta_time)
    }

    /// Advances the simulation by one step. Same as [`World::run_all`].
    ///
    /// # Errors
    ///
    /// See [`SystemManager::run_all`].
    pub fn tick(&mut self, delta_time: f64) -> Result<()> {
        self.run_all(delta_time)
    }

    /// Tears down every system and clears the registry.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::teardown_all`].
    pub fn teardown_all(&mut self) -> Result<()> {
        self.systems.teardown_all()
    }
}
