//! Entity and component storage for Stratum.
//!
//! This crate provides:
//! - [`EntityManager`] - Fixed-capacity entity allocation with index reuse
//! - [`BitsetManager`] - Per-entity component membership masks
//! - [`ComponentManager`] - Column-oriented component storage and queries
//! - [`QueryCache`] - LRU memoization of query results with selective invalidation
//! - [`Store`] - Entities and components paired under one value

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bitset;
pub mod cache;
pub mod column;
pub mod component;
pub mod entity;
pub mod query;
pub mod schema;
pub mod store;

pub use bitset::{BitsetManager, ComponentMask, MAX_COMPONENTS};
pub use cache::{CacheStats, QueryCache};
pub use column::{AnyColumn, Column, ColumnType};
pub use component::ComponentManager;
pub use entity::EntityManager;
pub use query::{ComponentColumns, QueryResult};
pub use schema::{ComponentData, ComponentHandle, ComponentSchema, FieldSchema, InstanceId, Schema};
pub use store::Store;
