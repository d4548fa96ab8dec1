//! Declared field data types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::id::RecordClass;
use crate::value::Value;

/// The data type a field definition declares for its values.
///
/// Option lists for [`Choice`](Self::Choice) fields and target-type
/// constraints for reference fields live on the field definition itself;
/// the kind only drives the structural check.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldKind {
    /// Free text.
    Text,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Boolean flag.
    Bool,
    /// Calendar date.
    Date,
    /// One option out of an enumerated list.
    Choice,
    /// Reference to an entity record.
    EntityRef,
    /// Reference to a location record.
    LocationRef,
}

impl FieldKind {
    /// Returns a short name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Choice => "choice",
            Self::EntityRef => "entity reference",
            Self::LocationRef => "location reference",
        }
    }

    /// Checks whether a value is structurally acceptable for this kind.
    ///
    /// `Nil` is accepted by every kind (required-ness is a registry concern).
    /// `Float` fields accept integers, and `Choice` fields accept text
    /// (option membership is checked by the field definition).
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        if value.is_nil() {
            return true;
        }
        matches!(
            (self, value),
            (Self::Text, Value::Text(_))
                | (Self::Int, Value::Int(_))
                | (Self::Float, Value::Float(_) | Value::Int(_))
                | (Self::Bool, Value::Bool(_))
                | (Self::Date, Value::Date(_))
                | (Self::Choice, Value::Choice(_) | Value::Text(_))
                | (Self::EntityRef, Value::EntityRef(_))
                | (Self::LocationRef, Value::LocationRef(_))
        )
    }

    /// The record class a reference kind points at, if this is one.
    #[must_use]
    pub const fn ref_class(self) -> Option<RecordClass> {
        match self {
            Self::EntityRef => Some(RecordClass::Entity),
            Self::LocationRef => Some(RecordClass::Location),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
