//! Error types for the Stratum engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every failure is synchronous; operations validate before they mutate,
//! so an `Err` never leaves partially written state behind.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;
use crate::types::FieldType;

/// The main error type for Stratum operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration(message.into()))
    }

    /// Creates a capacity exceeded error.
    #[must_use]
    pub fn capacity_exceeded(capacity: usize) -> Self {
        Self::new(ErrorKind::CapacityExceeded { capacity })
    }

    /// Creates a stale entity reference error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates a duplicate component error.
    #[must_use]
    pub fn duplicate_component(entity: EntityId, component: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateComponent {
            entity,
            component: component.into(),
        })
    }

    /// Creates a missing component error.
    #[must_use]
    pub fn missing_component(entity: EntityId, component: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingComponent {
            entity,
            component: component.into(),
        })
    }

    /// Creates a type mismatch error for a component field.
    #[must_use]
    pub fn type_mismatch(field: impl Into<String>, expected: FieldType, actual: FieldType) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        })
    }

    /// Creates an invalid query error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidQuery(message.into()))
    }

    /// Creates a foreign handle error.
    #[must_use]
    pub fn foreign_handle(component: impl Into<String>) -> Self {
        Self::new(ErrorKind::ForeignHandle {
            component: component.into(),
        })
    }

    /// Creates an error reported by a system's own logic.
    #[must_use]
    pub fn system(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SystemFailed {
            system: system.into(),
            message: message.into(),
        })
    }

    /// Returns true for configuration errors.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration(_))
    }

    /// Returns true for stale entity references.
    #[must_use]
    pub const fn is_stale_entity(&self) -> bool {
        matches!(self.kind, ErrorKind::StaleEntity(_))
    }

    /// Returns true for "already present" failures: a duplicate component
    /// or a system registered twice.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::DuplicateComponent { .. } | ErrorKind::SystemAlreadyRegistered(_)
        )
    }

    /// Returns true for "not present" failures: a missing component
    /// or an unknown system.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MissingComponent { .. } | ErrorKind::SystemNotRegistered(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Invalid construction parameters (schema, capacity, cache size).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Entity creation beyond the fixed capacity.
    #[error("entity capacity exceeded (capacity {capacity})")]
    CapacityExceeded {
        /// The configured capacity.
        capacity: usize,
    },

    /// Entity is inactive, never created, or already destroyed.
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Component is already attached to the entity.
    #[error("component {component} already present on {entity}")]
    DuplicateComponent {
        /// The entity that already carries the component.
        entity: EntityId,
        /// The component name.
        component: String,
    },

    /// Component is not attached to the entity.
    #[error("component {component} not present on {entity}")]
    MissingComponent {
        /// The entity that was addressed.
        entity: EntityId,
        /// The component name.
        component: String,
    },

    /// A supplied field value's type disagrees with its schema default.
    #[error("type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The field that was written or read.
        field: String,
        /// The schema type.
        expected: FieldType,
        /// The type that was supplied.
        actual: FieldType,
    },

    /// A partial record names a field the schema does not declare.
    #[error("unknown field {field} on component {component}")]
    UnknownField {
        /// The component name.
        component: String,
        /// The undeclared field name.
        field: String,
    },

    /// No component with this name is declared in the schema.
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// The query request is malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The handle was issued by a different engine instance.
    #[error("component handle {component} belongs to another engine instance")]
    ForeignHandle {
        /// The component name carried by the handle.
        component: String,
    },

    /// A system with this name is already registered.
    #[error("system already registered: {0}")]
    SystemAlreadyRegistered(String),

    /// No system with this name is registered.
    #[error("system not registered: {0}")]
    SystemNotRegistered(String),

    /// A system's own logic failed.
    #[error("system {system} failed: {message}")]
    SystemFailed {
        /// The system name.
        system: String,
        /// Description of the failure.
        message: String,
    },

    /// One or more teardown hooks failed during bulk teardown.
    #[error("{}", TeardownSummary(.0))]
    TeardownFailed(Vec<TeardownFailure>),
}

/// One failed teardown hook, reported as part of [`ErrorKind::TeardownFailed`].
#[derive(Debug)]
pub struct TeardownFailure {
    /// The system whose teardown failed.
    pub system: String,
    /// The error its hook returned.
    pub error: Box<Error>,
}

struct TeardownSummary<'a>(&'a [TeardownFailure]);

impl fmt::Display for TeardownSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "teardown failed for {} system(s)", self.0.len())?;
        for (i, failure) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", failure.system, failure.error)?;
        }
        Ok(())
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The engine operation that failed (e.g. `spawn`).
    pub operation: Option<String>,
    /// The system that was running, if any.
    pub system: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the running system.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operation, &self.system) {
            (Some(op), Some(sys)) => write!(f, "in {op} (system {sys})"),
            (Some(op), None) => write!(f, "in {op}"),
            (None, Some(sys)) => write!(f, "in system {sys}"),
            (None, None) => Ok(()),
        }
    }
}
