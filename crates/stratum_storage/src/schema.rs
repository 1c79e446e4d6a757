//! Schema definitions for components.
//!
//! A schema declares, once and up front, every component type and the
//! fields it carries. Each field's default value fixes the field's type
//! for the lifetime of the engine.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use stratum_foundation::{Error, FieldType, Result, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Schema definition for a component type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentSchema {
    /// Component name (e.g., `Position`, `Health`).
    pub name: Arc<str>,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl ComponentSchema {
    /// Creates a new component schema with no fields.
    ///
    /// A component with no fields acts as a tag: presence only.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field; its type is taken from `default`.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<Arc<str>>, default: impl Into<Value>) -> Self {
        self.fields.push(FieldSchema::new(name, default));
        self
    }

    /// Returns the field schema by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Returns the position of a field by name.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }

    /// Returns a record holding every field's default.
    #[must_use]
    pub fn defaults(&self) -> ComponentData {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }
}

/// Schema definition for a component field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSchema {
    /// Field name.
    pub name: Arc<str>,
    /// Value written when a record omits this field.
    pub default: Value,
}

impl FieldSchema {
    /// Creates a field whose type is fixed by `default`.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
        }
    }

    /// Returns the field's type.
    #[must_use]
    pub fn ty(&self) -> FieldType {
        self.default.value_type()
    }
}

/// The full set of component types known to one engine.
///
/// Bit positions are assigned in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    components: Vec<ComponentSchema>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component type.
    #[must_use]
    pub fn with_component(mut self, component: ComponentSchema) -> Self {
        self.components.push(component);
        self
    }

    /// Returns the declared component types in order.
    #[must_use]
    pub fn components(&self) -> &[ComponentSchema] {
        &self.components
    }

    /// Returns the number of component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component types are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Checks that component names are unique and field names are unique
    /// within each component.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first duplicate.
    pub fn validate(&self) -> Result<()> {
        for (i, component) in self.components.iter().enumerate() {
            if self.components[..i].iter().any(|c| c.name == component.name) {
                return Err(Error::configuration(format!(
                    "duplicate component type: {}",
                    component.name
                )));
            }
            for (j, field) in component.fields.iter().enumerate() {
                if component.fields[..j].iter().any(|f| f.name == field.name) {
                    return Err(Error::configuration(format!(
                        "duplicate field {} on component {}",
                        field.name, component.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl FromIterator<ComponentSchema> for Schema {
    fn from_iter<I: IntoIterator<Item = ComponentSchema>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

/// A (possibly partial) component record: field name to value.
///
/// Used as input to `add`/`set`, where omitted fields take their schema
/// default, and as the output of `get`, where every field is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentData {
    fields: BTreeMap<Arc<str>, Value>,
}

impl ComponentData {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field value.
    #[must_use]
    pub fn with(mut self, field: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value, returning the previous one.
    pub fn insert(&mut self, field: impl Into<Arc<str>>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Gets a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (&**k, v))
    }
}

impl<K: Into<Arc<str>>, V: Into<Value>> FromIterator<(K, V)> for ComponentData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Identifies one engine instance, so handles can be checked for ownership.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocates a process-unique instance id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque reference to a component type: its name and assigned bit.
///
/// Valid only against the engine instance that issued it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    name: Arc<str>,
    bit: u8,
    instance: InstanceId,
}

impl ComponentHandle {
    pub(crate) fn new(name: Arc<str>, bit: u8, instance: InstanceId) -> Self {
        Self {
            name,
            bit,
            instance,
        }
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the assigned bit position.
    #[must_use]
    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// Returns the issuing engine instance.
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentHandle({}#{})", self.name, self.bit)
    }
}

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
