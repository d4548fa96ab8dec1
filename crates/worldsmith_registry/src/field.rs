//! Field definitions for entity and location types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::{Error, ErrorKind, FieldKind, Result, TypeId, Value};

/// A dynamically configured field on an entity or location type.
///
/// Fields declare a data kind plus the attributes the type editor exposes:
/// an option list for choice fields, a target-type constraint for reference
/// fields, required/visible flags, and a sort order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDef {
    /// Stable field key, unique within the type.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Declared data kind.
    pub kind: FieldKind,
    /// Valid options for `Choice` fields.
    pub options: Vec<String>,
    /// Target type constraint for reference fields.
    pub reference_target: Option<TypeId>,
    /// Whether the field must be present and non-nil.
    pub required: bool,
    /// Whether the field is exposed under partial record visibility.
    pub visible: bool,
    /// Position in the type's field list.
    pub sort_order: u32,
}

impl FieldDef {
    /// Creates a field with the given key and kind.
    ///
    /// The label defaults to the key; the field starts optional, visible,
    /// and with sort order 0.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            kind,
            options: Vec::new(),
            reference_target: None,
            required: false,
            visible: true,
            sort_order: 0,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Excludes the field from partial-visibility views.
    #[must_use]
    pub fn hidden_in_partial(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Sets the option list for a `Choice` field.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Constrains a reference field to instances of one type.
    #[must_use]
    pub fn with_target(mut self, target: TypeId) -> Self {
        self.reference_target = Some(target);
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Validates a single value against this definition.
    ///
    /// Checks the structural kind and, for choice fields, option
    /// membership. Required-ness and reference targets are checked by the
    /// layers that have the payload and the record store respectively.
    ///
    /// # Errors
    ///
    /// Returns an error if the value's kind does not match or the choice is
    /// not in the option list.
    pub fn check(&self, value: &Value) -> Result<()> {
        if !self.kind.accepts(value) {
            return Err(Error::field_type_mismatch(
                self.key.clone(),
                self.kind,
                value.kind_name(),
            ));
        }

        if self.kind == FieldKind::Choice && !value.is_nil() {
            let Some(choice) = value.as_str() else {
                return Err(Error::field_type_mismatch(
                    self.key.clone(),
                    self.kind,
                    value.kind_name(),
                ));
            };
            if !self.options.iter().any(|o| o == choice) {
                return Err(Error::new(ErrorKind::UnknownChoice {
                    field: self.key.clone(),
                    value: choice.to_string(),
                }));
            }
        }

        Ok(())
    }
}
