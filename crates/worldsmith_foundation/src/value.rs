//! Field payload values.
//!
//! A [`Value`] is what an entity or location stores for one of its type's
//! fields. Values are cheaply cloneable; strings are shared via `Arc<str>`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::id::{RecordClass, RecordId};

/// A single field value in a record payload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Absence of a value. Accepted by every field kind; required fields
    /// reject it at validation time.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Free text.
    Text(Arc<str>),
    /// Calendar date.
    Date(NaiveDate),
    /// Selected option of an enumerated field.
    Choice(Arc<str>),
    /// Reference to an entity record.
    EntityRef(RecordId),
    /// Reference to a location record.
    LocationRef(RecordId),
}

impl Value {
    /// Creates a text value.
    #[must_use]
    pub fn text(s: impl Into<Arc<str>>) -> Self {
        Self::Text(s.into())
    }

    /// Creates a choice value.
    #[must_use]
    pub fn choice(s: impl Into<Arc<str>>) -> Self {
        Self::Choice(s.into())
    }

    /// Returns a short name for the value's runtime kind, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Choice(_) => "choice",
            Self::EntityRef(_) => "entity reference",
            Self::LocationRef(_) => "location reference",
        }
    }

    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Attempts to extract a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract a float. Integers promote.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to extract string content from a text or choice value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a date.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Attempts to extract a record reference along with its class.
    #[must_use]
    pub const fn as_record_ref(&self) -> Option<(RecordClass, RecordId)> {
        match self {
            Self::EntityRef(id) => Some((RecordClass::Entity, *id)),
            Self::LocationRef(id) => Some((RecordClass::Location, *id)),
            _ => None,
        }
    }

    /// Loose equality for rule conditions.
    ///
    /// Integers and floats compare numerically across variants, and text
    /// compares equal to a choice with the same content. Everything else
    /// falls back to strict equality.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => *i as f64 == *f,
            (Self::Text(a) | Self::Choice(a), Self::Text(b) | Self::Choice(b)) => a == b,
            _ => self == other,
        }
    }

    /// Ordering for rule conditions.
    ///
    /// Numbers (with promotion), dates, and strings order; mixed or
    /// unorderable kinds return `None`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Text(a) | Self::Choice(a), Self::Text(b) | Self::Choice(b)) => {
                Some(a.as_ref().cmp(b.as_ref()))
            }
            _ => {
                let a = self.as_float()?;
                let b = other.as_float()?;
                a.partial_cmp(&b)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Date(d) => write!(f, "{d}"),
            Self::Choice(s) => write!(f, "{s}"),
            Self::EntityRef(id) | Self::LocationRef(id) => write!(f, "{id}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(Arc::from(s.as_str()))
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}
