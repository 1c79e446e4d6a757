//! Type descriptors for schema validation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Runtime type tag of a component field.
///
/// A field's type is fixed by the runtime type of its schema default and is
/// checked on every write.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Boolean.
    Bool,
    /// Immutable text.
    Text,
}

impl FieldType {
    /// Checks if a value of type `actual` may be written to a field of this type.
    ///
    /// Types must match exactly, except that `Float` accepts `Int`
    /// (numeric promotion; the value is widened on write).
    #[must_use]
    pub const fn accepts(self, actual: FieldType) -> bool {
        matches!(
            (self, actual),
            (Self::Int | Self::Float, Self::Int)
                | (Self::Float, Self::Float)
                | (Self::Bool, Self::Bool)
                | (Self::Text, Self::Text)
        )
    }

    /// Returns true for `Int` and `Float`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
