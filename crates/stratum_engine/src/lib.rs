//! Systems, scheduling, and the world façade for Stratum.
//!
//! This crate provides:
//! - [`System`] - Named per-tick logic with setup and teardown hooks
//! - [`SystemManager`] - Priority-ordered registry with snapshot passes
//! - [`World`] - Storage and systems behind one API
//! - [`WorldConfig`] - Construction-time sizing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod scheduler;
pub mod system;
pub mod world;

pub use config::{DEFAULT_CAPACITY, DEFAULT_QUERY_CACHE_CAPACITY, WorldConfig};
pub use scheduler::SystemManager;
pub use system::{FnSystem, System, SystemContext};
pub use world::World;
