//! Column-oriented field storage.
//!
//! Each component field is stored as one typed column, pre-sized to the
//! entity capacity and indexed directly by entity index. Columns are
//! shared references: query results hand out clones of the reference,
//! never copies of the data, so writes through a query land in live
//! storage.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use stratum_foundation::{EntityId, Error, FieldType, Result, Value};

/// A shared, interior-mutable typed column.
///
/// Cloning a `Column` clones the reference. Element access borrows the
/// column only for the duration of the call; holding a guard from
/// [`Column::borrow_mut`] across an engine call that writes the same
/// column panics, as with any `RefCell`.
pub struct Column<T>(Rc<RefCell<Vec<T>>>);

impl<T: Clone> Column<T> {
    /// Creates a column of `len` slots filled with `zero`.
    #[must_use]
    pub fn filled(len: usize, zero: T) -> Self {
        Self(Rc::new(RefCell::new(vec![zero; len])))
    }

    /// Reads the slot of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity index is outside the column.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> T {
        self.0.borrow()[entity.index()].clone()
    }

    /// Writes the slot of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity index is outside the column.
    pub fn set(&self, entity: EntityId, value: T) {
        self.0.borrow_mut()[entity.index()] = value;
    }

    /// Updates the slot of `entity` in place.
    ///
    /// # Panics
    ///
    /// Panics if the entity index is outside the column.
    pub fn update(&self, entity: EntityId, f: impl FnOnce(&mut T)) {
        f(&mut self.0.borrow_mut()[entity.index()]);
    }
}

impl<T> Column<T> {
    /// Borrows the whole column for reading.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, [T]> {
        Ref::map(self.0.borrow(), Vec::as_slice)
    }

    /// Borrows the whole column for writing.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, [T]> {
        RefMut::map(self.0.borrow_mut(), Vec::as_mut_slice)
    }

    /// Returns the number of slots (the entity capacity).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if the column has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if two handles refer to the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column(len={})", self.len())
    }
}

/// A column of any supported field type.
#[derive(Clone, Debug)]
pub enum AnyColumn {
    /// Integer column.
    Int(Column<i64>),
    /// Float column.
    Float(Column<f64>),
    /// Boolean column.
    Bool(Column<bool>),
    /// Text column.
    Text(Column<Arc<str>>),
}

impl AnyColumn {
    /// Creates a zero-filled column of `len` slots for a field type.
    #[must_use]
    pub fn zeroed(ty: FieldType, len: usize) -> Self {
        match ty {
            FieldType::Int => Self::Int(Column::filled(len, 0)),
            FieldType::Float => Self::Float(Column::filled(len, 0.0)),
            FieldType::Bool => Self::Bool(Column::filled(len, false)),
            FieldType::Text => Self::Text(Column::filled(len, Arc::from(""))),
        }
    }

    /// Returns the column's field type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Int(_) => FieldType::Int,
            Self::Float(_) => FieldType::Float,
            Self::Bool(_) => FieldType::Bool,
            Self::Text(_) => FieldType::Text,
        }
    }

    /// Reads the slot of `entity` as a `Value`.
    #[must_use]
    pub fn read(&self, entity: EntityId) -> Value {
        match self {
            Self::Int(c) => Value::Int(c.get(entity)),
            Self::Float(c) => Value::Float(c.get(entity)),
            Self::Bool(c) => Value::Bool(c.get(entity)),
            Self::Text(c) => Value::Text(c.get(entity)),
        }
    }

    /// Writes a value that has already been coerced to this column's type.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if the value's type differs from the column's.
    pub fn write(&self, entity: EntityId, field: &str, value: Value) -> Result<()> {
        match (self, value) {
            (Self::Int(c), Value::Int(n)) => c.set(entity, n),
            (Self::Float(c), Value::Float(n)) => c.set(entity, n),
            (Self::Bool(c), Value::Bool(b)) => c.set(entity, b),
            (Self::Text(c), Value::Text(s)) => c.set(entity, s),
            (column, value) => {
                return Err(Error::type_mismatch(
                    field,
                    column.field_type(),
                    value.value_type(),
                ));
            }
        }
        Ok(())
    }

    /// Resets the slot of `entity` to the zero-equivalent.
    pub fn reset(&self, entity: EntityId) {
        match self {
            Self::Int(c) => c.set(entity, 0),
            Self::Float(c) => c.set(entity, 0.0),
            Self::Bool(c) => c.set(entity, false),
            Self::Text(c) => c.set(entity, Arc::from("")),
        }
    }

    /// Checks if two columns refer to the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.ptr_eq(b),
            (Self::Float(a), Self::Float(b)) => a.ptr_eq(b),
            (Self::Bool(a), Self::Bool(b)) => a.ptr_eq(b),
            (Self::Text(a), Self::Text(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Rust types that back a column, for typed extraction from an [`AnyColumn`].
pub trait ColumnType: Clone + Sized {
    /// The field type stored in columns of this Rust type.
    const FIELD_TYPE: FieldType;

    /// Returns the typed column if `column` stores this type.
    fn downcast(column: &AnyColumn) -> Option<&Column<Self>>;
}

impl ColumnType for i64 {
    const FIELD_TYPE: FieldType = FieldType::Int;

    fn downcast(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::Int(c) => Some(c),
            _ => None,
        }
    }
}

impl ColumnType for f64 {
    const FIELD_TYPE: FieldType = FieldType::Float;

    fn downcast(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::Float(c) => Some(c),
            _ => None,
        }
    }
}

impl ColumnType for bool {
    const FIELD_TYPE: FieldType = FieldType::Bool;

    fn downcast(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::Bool(c) => Some(c),
            _ => None,
        }
    }
}

impl ColumnType for Arc<str> {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn downcast(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::Text(c) => Some(c),
            _ => None,
        }
    }
}
