//! Integration tests for entity lifecycle
//!
//! Tests creation, destruction, index reuse, capacity, and stale references.

use stratum_foundation::{EntityId, ErrorKind};
use stratum_storage::{Schema, Store};

use crate::game_store;

// =============================================================================
// Creation
// =============================================================================

#[test]
fn create_assigns_sequential_indices() {
    let mut store = game_store();
    let ids: Vec<_> = (0..3).map(|_| store.create().unwrap()).collect();

    assert_eq!(ids, vec![EntityId::new(0), EntityId::new(1), EntityId::new(2)]);
    assert_eq!(store.count(), 3);
    assert!(ids.iter().all(|e| store.is_valid(*e)));
}

#[test]
fn create_beyond_capacity_fails() {
    let mut store = game_store();
    for _ in 0..10 {
        store.create().unwrap();
    }

    let err = store.create().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CapacityExceeded { capacity: 10 }));
    assert_eq!(store.count(), 10);
}

#[test]
fn zero_capacity_is_configuration_error() {
    let err = Store::new(&Schema::new(), 0, 8).unwrap_err();
    assert!(err.is_configuration());
}

// =============================================================================
// Destruction
// =============================================================================

#[test]
fn destroy_invalidates_and_frees_slot() {
    let mut store = game_store();
    let ids: Vec<_> = (0..10).map(|_| store.create().unwrap()).collect();

    store.destroy(ids[4]).unwrap();
    assert!(!store.is_valid(ids[4]));
    assert_eq!(store.count(), 9);

    let again = store.create().unwrap();
    assert_eq!(again, ids[4]);
}

#[test]
fn destroy_twice_is_stale() {
    let mut store = game_store();
    let e = store.create().unwrap();
    store.destroy(e).unwrap();

    let err = store.destroy(e).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaleEntity(id) if id == e));
}

#[test]
fn destroy_never_created_is_stale() {
    let mut store = game_store();
    assert!(store.destroy(EntityId::new(7)).unwrap_err().is_stale_entity());
    assert!(store.destroy(EntityId::new(500)).unwrap_err().is_stale_entity());
}

#[test]
fn freed_indices_are_reused_most_recent_first() {
    let mut store = game_store();
    let a = store.create().unwrap();
    let b = store.create().unwrap();
    let _c = store.create().unwrap();
    store.destroy(a).unwrap();
    store.destroy(b).unwrap();

    assert_eq!(store.create().unwrap(), b);
    assert_eq!(store.create().unwrap(), a);
}

#[test]
fn active_ids_are_in_index_order() {
    let mut store = game_store();
    let ids: Vec<_> = (0..5).map(|_| store.create().unwrap()).collect();
    store.destroy(ids[1]).unwrap();
    store.destroy(ids[3]).unwrap();

    assert_eq!(store.active_ids(), vec![ids[0], ids[2], ids[4]]);
}
