//! Integration tests for Layer 2: Engine
//!
//! Tests for system scheduling and the world façade.

mod world;
