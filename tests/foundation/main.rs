//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, FieldType, EntityId, and Error.

mod errors;
mod values;
