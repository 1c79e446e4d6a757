//! Integration tests for Value and FieldType
//!
//! Tests value construction, type tags, zero-equivalents, and coercion into
//! schema field types.

use std::collections::HashSet;
use std::sync::Arc;

use stratum_foundation::{EntityId, FieldType, Value};

// =============================================================================
// Value Construction
// =============================================================================

#[test]
fn value_from_primitives() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(7), Value::Int(7));
    assert_eq!(Value::from(7i64), Value::Int(7));
    assert_eq!(Value::from(1.5), Value::Float(1.5));
    assert_eq!(Value::from("hi"), Value::Text(Arc::from("hi")));
    assert_eq!(Value::from(String::from("hi")), Value::from("hi"));
}

#[test]
fn value_type_tags() {
    assert_eq!(Value::from(false).value_type(), FieldType::Bool);
    assert_eq!(Value::from(0).value_type(), FieldType::Int);
    assert_eq!(Value::from(0.0).value_type(), FieldType::Float);
    assert_eq!(Value::from("").value_type(), FieldType::Text);
}

#[test]
fn value_accessors() {
    assert_eq!(Value::Int(3).as_int(), Some(3));
    assert_eq!(Value::Int(3).as_float(), None);
    assert_eq!(Value::Int(3).as_number(), Some(3.0));
    assert_eq!(Value::Float(2.5).as_number(), Some(2.5));
    assert_eq!(Value::Bool(true).as_bool(), Some(true));
    assert_eq!(Value::from("abc").as_str(), Some("abc"));
    assert_eq!(Value::Bool(true).as_str(), None);
}

#[test]
fn value_display() {
    assert_eq!(format!("{}", Value::Int(42)), "42");
    assert_eq!(format!("{}", Value::Bool(false)), "false");
    assert_eq!(format!("{}", Value::from("x")), "x");
}

// =============================================================================
// Zero-equivalents
// =============================================================================

#[test]
fn zero_of_each_type() {
    assert_eq!(Value::zero_of(FieldType::Int), Value::Int(0));
    assert_eq!(Value::zero_of(FieldType::Float), Value::Float(0.0));
    assert_eq!(Value::zero_of(FieldType::Bool), Value::Bool(false));
    assert_eq!(Value::zero_of(FieldType::Text), Value::from(""));
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn int_widens_to_float() {
    assert_eq!(Value::Int(2).coerce_to(FieldType::Float), Some(Value::Float(2.0)));
}

#[test]
fn float_does_not_narrow_to_int() {
    assert_eq!(Value::Float(2.0).coerce_to(FieldType::Int), None);
}

#[test]
fn mismatched_types_do_not_coerce() {
    assert_eq!(Value::from("2").coerce_to(FieldType::Int), None);
    assert_eq!(Value::Bool(true).coerce_to(FieldType::Int), None);
    assert_eq!(Value::Int(1).coerce_to(FieldType::Bool), None);
}

#[test]
fn field_type_accepts() {
    assert!(FieldType::Float.accepts(FieldType::Int));
    assert!(!FieldType::Int.accepts(FieldType::Float));
    assert!(FieldType::Text.accepts(FieldType::Text));
    assert!(FieldType::Int.is_numeric());
    assert!(!FieldType::Bool.is_numeric());
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn nan_equals_itself() {
    let nan = Value::Float(f64::NAN);
    assert_eq!(nan, nan.clone());
}

#[test]
fn int_and_float_are_distinct_values() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

// =============================================================================
// EntityId
// =============================================================================

#[test]
fn entity_ids_hash_by_index() {
    let ids: HashSet<EntityId> = [0, 1, 1, 2].into_iter().map(EntityId::new).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(EntityId::new(9).index(), 9);
    assert_eq!(usize::from(EntityId::new(4)), 4);
}
