//! Core types, values, and errors for Stratum.
//!
//! This crate provides:
//! - [`EntityId`] - Index-based entity identifiers
//! - [`Value`] - Scalar values stored in component fields
//! - [`FieldType`] - Runtime type tags for schema validation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod types;
pub mod value;

pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind, TeardownFailure};
pub use types::FieldType;
pub use value::Value;

/// Result type alias using Stratum's Error type.
pub type Result<T> = std::result::Result<T, Error>;
