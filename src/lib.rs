//! Stratum - Entity-Component-System data engine
//!
//! This crate re-exports all layers of the Stratum engine for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: stratum_engine      — System scheduling, World façade, configuration
//! Layer 1: stratum_storage     — Entities, bitsets, column storage, query cache
//! Layer 0: stratum_foundation  — Core types (EntityId, Value, Error)
//! ```

pub use stratum_engine as engine;
pub use stratum_foundation as foundation;
pub use stratum_storage as storage;
