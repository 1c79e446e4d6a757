//! Integration tests for Error types
//!
//! Tests error construction, display, classification, and context.

use stratum_foundation::{EntityId, Error, ErrorContext, ErrorKind, FieldType, TeardownFailure};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_configuration() {
    let err = Error::configuration("too many component types");
    assert!(err.is_configuration());
    assert!(format!("{err}").contains("too many component types"));
}

#[test]
fn error_capacity_exceeded() {
    let err = Error::capacity_exceeded(10);
    assert!(matches!(err.kind, ErrorKind::CapacityExceeded { capacity: 10 }));
    assert!(format!("{err}").contains("10"));
}

#[test]
fn error_stale_entity() {
    let err = Error::stale_entity(EntityId::new(42));
    assert!(err.is_stale_entity());
    assert!(format!("{err}").contains("42"));
}

#[test]
fn error_type_mismatch_names_field_and_types() {
    let err = Error::type_mismatch("hp", FieldType::Int, FieldType::Text);
    let msg = format!("{err}");
    assert!(msg.contains("hp"));
    assert!(msg.contains("int"));
    assert!(msg.contains("text"));
}

#[test]
fn error_invalid_query() {
    let err = Error::invalid_query("no components");
    assert!(matches!(err.kind, ErrorKind::InvalidQuery(_)));
}

#[test]
fn error_foreign_handle() {
    let err = Error::foreign_handle("Position");
    assert!(matches!(err.kind, ErrorKind::ForeignHandle { .. }));
    assert!(format!("{err}").contains("Position"));
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn duplicate_class_covers_components_and_systems() {
    assert!(Error::duplicate_component(EntityId::new(0), "Position").is_duplicate());
    assert!(Error::new(ErrorKind::SystemAlreadyRegistered("physics".into())).is_duplicate());
    assert!(!Error::configuration("x").is_duplicate());
}

#[test]
fn missing_class_covers_components_and_systems() {
    assert!(Error::missing_component(EntityId::new(0), "Health").is_missing());
    assert!(Error::new(ErrorKind::SystemNotRegistered("physics".into())).is_missing());
    assert!(!Error::stale_entity(EntityId::new(0)).is_missing());
}

// =============================================================================
// Context & Aggregation
// =============================================================================

#[test]
fn context_attaches_operation_and_system() {
    let err = Error::system("physics", "diverged")
        .with_context(ErrorContext::new().with_operation("update").with_system("physics"));
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(format!("{ctx}"), "in update (system physics)");
}

#[test]
fn teardown_failure_lists_every_system() {
    let err = Error::new(ErrorKind::TeardownFailed(vec![
        TeardownFailure {
            system: "audio".into(),
            error: Box::new(Error::system("audio", "device busy")),
        },
        TeardownFailure {
            system: "net".into(),
            error: Box::new(Error::system("net", "socket closed")),
        },
    ]));
    let msg = format!("{err}");
    assert!(msg.contains("2 system"));
    assert!(msg.contains("audio"));
    assert!(msg.contains("net"));
}
