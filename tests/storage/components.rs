//! Integration tests for component storage
//!
//! Tests add/set/remove/get, field merging and type checking, and the
//! schema-level limits.

use stratum_foundation::{ErrorKind, Value};
use stratum_storage::{ComponentData, ComponentSchema, Schema, Store};

use crate::{game_schema, game_store};

// =============================================================================
// Add / Get
// =============================================================================

#[test]
fn add_partial_data_fills_defaults() {
    let mut store = game_store();
    let health = store.handle("Health").unwrap();
    let e = store.create().unwrap();

    store
        .add(e, &health, Some(&ComponentData::new().with("current", 40)))
        .unwrap();

    let got = store.get(e, &health).unwrap();
    assert_eq!(got.get("current"), Some(&Value::Int(40)));
    assert_eq!(got.get("max"), Some(&Value::Int(100)));
    assert_eq!(got.len(), 2);
}

#[test]
fn add_text_and_bool_fields() {
    let mut store = game_store();
    let name = store.handle("Name").unwrap();
    let frozen = store.handle("Frozen").unwrap();
    let e = store.create().unwrap();

    store
        .add(e, &name, Some(&ComponentData::new().with("label", "goblin")))
        .unwrap();
    store
        .add(e, &frozen, Some(&ComponentData::new().with("on", true)))
        .unwrap();

    assert_eq!(store.get(e, &name).unwrap().get("label"), Some(&Value::from("goblin")));
    assert_eq!(store.get(e, &frozen).unwrap().get("on"), Some(&Value::Bool(true)));
}

#[test]
fn add_duplicate_fails() {
    let mut store = game_store();
    let position = store.handle("Position").unwrap();
    let e = store.create().unwrap();
    store.add(e, &position, None).unwrap();

    let err = store.add(e, &position, None).unwrap_err();
    assert!(err.is_duplicate());
}

#[test]
fn add_to_destroyed_entity_fails() {
    let mut store = game_store();
    let position = store.handle("Position").unwrap();
    let e = store.create().unwrap();
    store.destroy(e).unwrap();

    assert!(store.add(e, &position, None).unwrap_err().is_stale_entity());
}

#[test]
fn type_mismatch_rejects_whole_record() {
    let mut store = game_store();
    let health = store.handle("Health").unwrap();
    let e = store.create().unwrap();
    let data = ComponentData::new().with("current", 5).with("max", "lots");

    let err = store.add(e, &health, Some(&data)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    assert!(!store.has(e, &health));
}

#[test]
fn float_into_int_field_is_mismatch() {
    let mut store = game_store();
    let health = store.handle("Health").unwrap();
    let e = store.create().unwrap();

    let err = store
        .add(e, &health, Some(&ComponentData::new().with("current", 1.5)))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

// =============================================================================
// Set
// =============================================================================

#[test]
fn set_creates_then_overwrites() {
    let mut store = game_store();
    let position = store.handle("Position").unwrap();
    let e = store.create().unwrap();

    store
        .set(e, &position, Some(&ComponentData::new().with("x", 1.0)))
        .unwrap();
    store
        .set(e, &position, Some(&ComponentData::new().with("x", 2.0).with("y", 3.0)))
        .unwrap();

    let got = store.get(e, &position).unwrap();
    assert_eq!(got.get("x"), Some(&Value::Float(2.0)));
    assert_eq!(got.get("y"), Some(&Value::Float(3.0)));
}

// =============================================================================
// Remove
// =============================================================================

#[test]
fn remove_then_get_is_missing() {
    let mut store = game_store();
    let position = store.handle("Position").unwrap();
    let health = store.handle("Health").unwrap();
    let e = store.create().unwrap();
    store.add(e, &position, None).unwrap();
    store.add(e, &health, None).unwrap();

    store.remove(e, &health).unwrap();

    assert!(!store.has(e, &health));
    assert!(store.has(e, &position));
    assert!(store.get(e, &health).unwrap_err().is_missing());
    assert!(store.remove(e, &health).unwrap_err().is_missing());
}

#[test]
fn re_add_after_remove_starts_from_defaults() {
    let mut store = game_store();
    let health = store.handle("Health").unwrap();
    let e = store.create().unwrap();
    store
        .add(e, &health, Some(&ComponentData::new().with("current", 1)))
        .unwrap();
    store.remove(e, &health).unwrap();
    store.add(e, &health, None).unwrap();

    assert_eq!(store.get(e, &health).unwrap().get("current"), Some(&Value::Int(100)));
}

#[test]
fn remove_all_detaches_everything() {
    let mut store = game_store();
    let handles: Vec<_> = ["Position", "Velocity", "Health"]
        .into_iter()
        .map(|n| store.handle(n).unwrap())
        .collect();
    let e = store.create().unwrap();
    for handle in &handles {
        store.add(e, handle, None).unwrap();
    }

    store.remove_all(e).unwrap();

    assert!(store.is_valid(e));
    assert!(handles.iter().all(|h| !store.has(e, h)));
}

// =============================================================================
// Schema & Handles
// =============================================================================

#[test]
fn thirty_three_component_types_is_configuration_error() {
    let schema: Schema = (0..33)
        .map(|i| ComponentSchema::new(format!("C{i}")).with_field("v", 0))
        .collect();
    let err = Store::new(&schema, 10, 8).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn handles_from_another_store_are_foreign() {
    let mut store = game_store();
    let other = game_store();
    let foreign = other.handle("Position").unwrap();
    let e = store.create().unwrap();

    let err = store.add(e, &foreign, None).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignHandle { .. }));
    assert!(store.query([&foreign]).is_err());
    assert!(!store.has(e, &foreign));
}

#[test]
fn unknown_component_name() {
    let store = game_store();
    assert!(matches!(
        store.handle("Mana").unwrap_err().kind,
        ErrorKind::UnknownComponent(_)
    ));
}

#[test]
fn component_names_and_schema() {
    let store = Store::new(&game_schema(), 4, 0).unwrap();
    assert_eq!(
        store.component_names(),
        vec!["Position", "Velocity", "Health", "Name", "Frozen"]
    );
    let health = store.handle("Health").unwrap();
    assert_eq!(store.schema(&health).unwrap().fields.len(), 2);
}
