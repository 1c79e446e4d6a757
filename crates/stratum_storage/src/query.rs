//! Query results: matching entities paired with live column references.

use std::sync::Arc;

use stratum_foundation::{EntityId, Error, ErrorKind, Result};

use crate::bitset::ComponentMask;
use crate::column::{AnyColumn, Column, ColumnType};
use crate::schema::ComponentHandle;

/// The columns of one component type, in schema field order.
#[derive(Clone, Debug)]
pub struct ComponentColumns {
    handle: ComponentHandle,
    fields: Vec<(Arc<str>, AnyColumn)>,
}

impl ComponentColumns {
    pub(crate) fn new(handle: ComponentHandle, fields: Vec<(Arc<str>, AnyColumn)>) -> Self {
        Self { handle, fields }
    }

    /// Returns the component this column set belongs to.
    #[must_use]
    pub fn handle(&self) -> &ComponentHandle {
        &self.handle
    }

    /// Returns the untyped column of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&AnyColumn> {
        self.fields
            .iter()
            .find(|(field, _)| &**field == name)
            .map(|(_, column)| column)
    }

    /// Returns the typed column of a field.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if the component has no such field, or a type
    /// mismatch if the field is not stored as `T`.
    pub fn column<T: ColumnType>(&self, name: &str) -> Result<Column<T>> {
        let column = self.field(name).ok_or_else(|| {
            Error::new(ErrorKind::UnknownField {
                component: self.handle.name().to_string(),
                field: name.to_string(),
            })
        })?;
        T::downcast(column)
            .cloned()
            .ok_or_else(|| Error::type_mismatch(name, T::FIELD_TYPE, column.field_type()))
    }

    /// Iterates `(field name, column)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnyColumn)> {
        self.fields.iter().map(|(name, column)| (&**name, column))
    }
}

/// The result of a query: every active entity carrying at least the
/// requested components, plus direct references to their columns.
///
/// Entities are listed in ascending index order. The entity list is a
/// snapshot taken at query time; the columns are live storage, so values
/// read after a later structural change may already have been zeroed.
#[derive(Debug)]
pub struct QueryResult {
    mask: ComponentMask,
    entities: Vec<EntityId>,
    components: Vec<ComponentColumns>,
}

impl QueryResult {
    pub(crate) fn new(
        mask: ComponentMask,
        entities: Vec<EntityId>,
        components: Vec<ComponentColumns>,
    ) -> Self {
        Self {
            mask,
            entities,
            components,
        }
    }

    /// Returns the requirement mask this result was computed for.
    #[must_use]
    pub fn mask(&self) -> ComponentMask {
        self.mask
    }

    /// Returns the matching entities in ascending index order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Returns the number of matching entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entity matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the column set of a requested component.
    ///
    /// # Errors
    ///
    /// Returns an invalid query error if the component was not part of
    /// this query.
    pub fn columns(&self, handle: &ComponentHandle) -> Result<&ComponentColumns> {
        self.components
            .iter()
            .find(|c| c.handle == *handle)
            .ok_or_else(|| {
                Error::invalid_query(format!("component {handle} is not part of this query"))
            })
    }

    /// Returns the typed column of a requested component's field.
    ///
    /// # Errors
    ///
    /// Fails if the component was not queried, the field does not exist,
    /// or the field is not stored as `T`.
    pub fn column<T: ColumnType>(
        &self,
        handle: &ComponentHandle,
        field: &str,
    ) -> Result<Column<T>> {
        self.columns(handle)?.column(field)
    }

    /// Iterates the column sets in request order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentColumns> {
        self.components.iter()
    }
}
