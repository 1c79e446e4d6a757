//! Component storage: typed columns per component type, the membership
//! bitset, and the query cache.
//!
//! Every component type declared in the [`Schema`] gets one column per
//! field, pre-sized to the entity capacity. Membership lives in the
//! [`BitsetManager`]; columns alone never decide whether an entity carries
//! a component.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use stratum_foundation::{EntityId, Error, ErrorKind, Result, Value};
use tracing::debug;

use crate::bitset::{BitsetManager, ComponentMask};
use crate::cache::{CacheStats, QueryCache};
use crate::column::AnyColumn;
use crate::entity::EntityManager;
use crate::query::{ComponentColumns, QueryResult};
use crate::schema::{ComponentData, ComponentHandle, ComponentSchema, InstanceId, Schema};

/// Columns and schema for a single component type.
#[derive(Debug)]
struct ComponentStorage {
    handle: ComponentHandle,
    schema: ComponentSchema,
    /// One column per schema field, in schema order.
    columns: Vec<AnyColumn>,
}

impl ComponentStorage {
    /// Builds the full value list to write: schema defaults overlaid with
    /// the supplied fields. Nothing is written here, so a bad field leaves
    /// storage untouched.
    fn resolve(&self, data: Option<&ComponentData>) -> Result<Vec<Value>> {
        let mut values: Vec<Value> = self
            .schema
            .fields
            .iter()
            .map(|f| f.default.clone())
            .collect();

        let Some(data) = data else {
            return Ok(values);
        };

        for (name, value) in data.iter() {
            let index = self.schema.field_index(name).ok_or_else(|| {
                Error::new(ErrorKind::UnknownField {
                    component: self.handle.name().to_string(),
                    field: name.to_string(),
                })
            })?;
            let expected = self.schema.fields[index].ty();
            values[index] = value
                .coerce_to(expected)
                .ok_or_else(|| Error::type_mismatch(name, expected, value.value_type()))?;
        }

        Ok(values)
    }

    fn write(&self, entity: EntityId, values: Vec<Value>) -> Result<()> {
        for ((field, column), value) in self.schema.fields.iter().zip(&self.columns).zip(values) {
            column.write(entity, &field.name, value)?;
        }
        Ok(())
    }

    fn reset(&self, entity: EntityId) {
        for column in &self.columns {
            column.reset(entity);
        }
    }

    fn read(&self, entity: EntityId) -> ComponentData {
        self.schema
            .fields
            .iter()
            .zip(&self.columns)
            .map(|(field, column)| (field.name.clone(), column.read(entity)))
            .collect()
    }
}

/// Owns every component column, the per-entity bitset and the query cache.
///
/// Operations that depend on entity liveness take the [`EntityManager`] by
/// reference; the two are paired in [`crate::Store`].
#[derive(Debug)]
pub struct ComponentManager {
    instance: InstanceId,
    capacity: usize,
    /// Indexed by bit position.
    storages: Vec<ComponentStorage>,
    by_name: HashMap<Arc<str>, u8>,
    bitset: BitsetManager,
    cache: QueryCache<Rc<QueryResult>>,
}

impl ComponentManager {
    /// Creates storage for every component type in `schema`.
    ///
    /// Bits are assigned in declaration order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the schema has duplicate names or
    /// declares more component types than a mask can hold.
    pub fn new(schema: &Schema, capacity: usize, cache_capacity: usize) -> Result<Self> {
        schema.validate()?;
        let bitset = BitsetManager::new(schema.len(), capacity)?;
        let instance = InstanceId::next();

        let mut storages = Vec::with_capacity(schema.len());
        let mut by_name = HashMap::with_capacity(schema.len());
        for (position, component) in schema.components().iter().enumerate() {
            // The bitset already rejected more than 32 types.
            #[allow(clippy::cast_possible_truncation)]
            let bit = position as u8;
            let handle = ComponentHandle::new(component.name.clone(), bit, instance);
            let columns = component
                .fields
                .iter()
                .map(|field| AnyColumn::zeroed(field.ty(), capacity))
                .collect();
            by_name.insert(component.name.clone(), bit);
            storages.push(ComponentStorage {
                handle,
                schema: component.clone(),
                columns,
            });
        }

        debug!(
            components = storages.len(),
            capacity, cache_capacity, "component storage initialized"
        );

        Ok(Self {
            instance,
            capacity,
            storages,
            by_name,
            bitset,
            cache: QueryCache::new(cache_capacity),
        })
    }

    /// Returns the instance that issued this manager's handles.
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Returns the entity capacity every column was sized to.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Looks up the handle of a component type by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent` if the schema declares no such type.
    pub fn handle(&self, name: &str) -> Result<ComponentHandle> {
        self.by_name
            .get(name)
            .map(|bit| self.storages[usize::from(*bit)].handle.clone())
            .ok_or_else(|| Error::new(ErrorKind::UnknownComponent(name.to_string())))
    }

    /// Iterates every handle in bit order.
    pub fn handles(&self) -> impl Iterator<Item = &ComponentHandle> {
        self.storages.iter().map(|s| &s.handle)
    }

    /// Returns the declared component names in bit order.
    #[must_use]
    pub fn component_names(&self) -> Vec<&str> {
        self.storages.iter().map(|s| s.handle.name()).collect()
    }

    /// Returns the schema of a component type.
    ///
    /// # Errors
    ///
    /// Returns `ForeignHandle` if the handle was issued by another instance.
    pub fn schema(&self, handle: &ComponentHandle) -> Result<&ComponentSchema> {
        Ok(&self.storage(handle)?.schema)
    }

    /// Attaches a component, merging `data` over the schema defaults.
    ///
    /// # Errors
    ///
    /// Fails with `StaleEntity`, `DuplicateComponent`, `UnknownField` or
    /// `TypeMismatch`. Nothing is written on failure.
    pub fn add(
        &mut self,
        entities: &EntityManager,
        entity: EntityId,
        handle: &ComponentHandle,
        data: Option<&ComponentData>,
    ) -> Result<()> {
        let storage = self.storage(handle)?;
        entities.validate(entity)?;
        if self.bitset.has(entity, handle.bit()) {
            return Err(Error::duplicate_component(entity, handle.name()));
        }
        let values = storage.resolve(data)?;
        storage.write(entity, values)?;
        self.attach(entity, handle.bit());
        Ok(())
    }

    /// Adds or overwrites a component.
    ///
    /// Fields are merged over the schema defaults exactly as in
    /// [`ComponentManager::add`]. Overwriting an existing component does
    /// not change the entity's composition, so no cached query is dropped.
    ///
    /// # Errors
    ///
    /// Fails with `StaleEntity`, `UnknownField` or `TypeMismatch`.
    pub fn set(
        &mut self,
        entities: &EntityManager,
        entity: EntityId,
        handle: &ComponentHandle,
        data: Option<&ComponentData>,
    ) -> Result<()> {
        let storage = self.storage(handle)?;
        entities.validate(entity)?;
        let values = storage.resolve(data)?;
        storage.write(entity, values)?;
        if !self.bitset.has(entity, handle.bit()) {
            self.attach(entity, handle.bit());
        }
        Ok(())
    }

    /// Detaches a component and zeroes its fields.
    ///
    /// # Errors
    ///
    /// Fails with `StaleEntity` or `MissingComponent`.
    pub fn remove(
        &mut self,
        entities: &EntityManager,
        entity: EntityId,
        handle: &ComponentHandle,
    ) -> Result<()> {
        let storage = self.storage(handle)?;
        entities.validate(entity)?;
        if !self.bitset.has(entity, handle.bit()) {
            return Err(Error::missing_component(entity, handle.name()));
        }
        storage.reset(entity);
        self.bitset.remove(entity, handle.bit());
        self.cache.invalidate(ComponentMask::bit(handle.bit()));
        Ok(())
    }

    /// Detaches every component of an entity in one pass.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the entity is not live.
    pub fn remove_all(&mut self, entities: &EntityManager, entity: EntityId) -> Result<()> {
        entities.validate(entity)?;
        let mask = self.bitset.mask_of(entity);
        if mask.is_empty() {
            return Ok(());
        }
        self.cache.invalidate(mask);
        for bit in mask.positions() {
            self.storages[usize::from(bit)].reset(entity);
        }
        self.bitset.clear(entity);
        Ok(())
    }

    /// Checks whether an entity carries a component.
    ///
    /// Foreign handles and out-of-range entities report `false`.
    #[must_use]
    pub fn has(&self, entity: EntityId, handle: &ComponentHandle) -> bool {
        self.storage(handle).is_ok()
            && entity.index() < self.capacity
            && self.bitset.has(entity, handle.bit())
    }

    /// Returns the mask of components an entity carries.
    #[must_use]
    pub fn mask_of(&self, entity: EntityId) -> ComponentMask {
        if entity.index() < self.capacity {
            self.bitset.mask_of(entity)
        } else {
            ComponentMask::EMPTY
        }
    }

    /// Reads every field of a component.
    ///
    /// # Errors
    ///
    /// Fails with `StaleEntity` or `MissingComponent`.
    pub fn get(
        &self,
        entities: &EntityManager,
        entity: EntityId,
        handle: &ComponentHandle,
    ) -> Result<ComponentData> {
        let storage = self.storage(handle)?;
        entities.validate(entity)?;
        if !self.bitset.has(entity, handle.bit()) {
            return Err(Error::missing_component(entity, handle.name()));
        }
        Ok(storage.read(entity))
    }

    /// Finds every active entity carrying at least the requested components.
    ///
    /// Repeating a query with no composition change in between returns the
    /// same shared result without rescanning.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if no handle is given, or `ForeignHandle` for
    /// a handle issued by another instance.
    pub fn query<'a>(
        &mut self,
        entities: &EntityManager,
        handles: impl IntoIterator<Item = &'a ComponentHandle>,
    ) -> Result<Rc<QueryResult>> {
        let mut requested: Vec<&ComponentHandle> = Vec::new();
        let mut mask = ComponentMask::EMPTY;
        for handle in handles {
            self.storage(handle)?;
            if !mask.contains(handle.bit()) {
                mask = mask.with(handle.bit());
                requested.push(handle);
            }
        }
        if requested.is_empty() {
            return Err(Error::invalid_query("a query needs at least one component"));
        }

        if let Some(hit) = self.cache.get(mask) {
            return Ok(hit);
        }

        let matched: Vec<EntityId> = entities
            .iter()
            .filter(|e| self.bitset.matches_mask(*e, mask))
            .collect();
        let components = requested
            .into_iter()
            .map(|handle| {
                let storage = &self.storages[usize::from(handle.bit())];
                let fields = storage
                    .schema
                    .fields
                    .iter()
                    .zip(&storage.columns)
                    .map(|(field, column)| (field.name.clone(), column.clone()))
                    .collect();
                ComponentColumns::new(storage.handle.clone(), fields)
            })
            .collect();

        let result = Rc::new(QueryResult::new(mask, matched, components));
        self.cache.insert(mask, Rc::clone(&result));
        Ok(result)
    }

    /// Returns the query cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns the number of cached query results.
    #[must_use]
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    fn attach(&mut self, entity: EntityId, bit: u8) {
        self.bitset.add(entity, bit);
        self.cache.invalidate(ComponentMask::bit(bit));
    }

    fn storage(&self, handle: &ComponentHandle) -> Result<&ComponentStorage> {
        if handle.instance() != self.instance {
            return Err(Error::foreign_handle(handle.name()));
        }
        self.storages
            .get(usize::from(handle.bit()))
            .ok_or_else(|| Error::foreign_handle(handle.name()))
    }
}
