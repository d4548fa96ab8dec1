//! Type definitions and the registry that validates payloads against them.

use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::{Error, ErrorKind, FieldKind, RecordClass, Result, TypeId, Value};

use crate::field::FieldDef;
use crate::rules::{FieldRule, RuleAction, RuleOutcome, evaluate_rules};

/// The schema-less payload a record stores: field key to value.
pub type Payload = BTreeMap<String, Value>;

/// An entity or location type: a named bundle of field definitions and
/// display rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeDef {
    /// Registry-assigned identifier. Zero until registered.
    pub id: TypeId,
    /// The record family this type describes.
    pub class: RecordClass,
    /// Stable key, unique within the class.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Optional description shown in type editors.
    pub description: Option<String>,
    /// Field definitions, kept sorted by sort order then key.
    fields: Vec<FieldDef>,
    /// Display rules, evaluated in declaration order.
    rules: Vec<FieldRule>,
}

impl TypeDef {
    /// Creates a type definition draft.
    #[must_use]
    pub fn new(class: RecordClass, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TypeId::new(0),
            class,
            key: key.into(),
            name: name.into(),
            description: None,
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field definition.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.insert_field(field);
        self
    }

    /// Adds a display rule.
    #[must_use]
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The field definitions, sorted by sort order then key.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field definition by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// The display rules.
    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Evaluates this type's display rules against a payload.
    #[must_use]
    pub fn rule_outcome(&self, payload: &Payload) -> RuleOutcome {
        evaluate_rules(&self.rules, payload)
    }

    /// The fields displayed for a payload after rules are applied.
    #[must_use]
    pub fn effective_fields(&self, payload: &Payload) -> Vec<&FieldDef> {
        let outcome = self.rule_outcome(payload);
        self.fields
            .iter()
            .filter(|f| !outcome.is_hidden(&f.key))
            .collect()
    }

    /// Validates a payload against this type.
    ///
    /// Every payload key must name a defined field and its value must pass
    /// the field's structural check. Required fields must be present and
    /// non-nil, where "required" accounts for display rules: a rule-hidden
    /// field is exempt, a rule-required field is not.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self, payload: &Payload) -> Result<()> {
        for (key, value) in payload {
            let Some(field) = self.field(key) else {
                return Err(Error::new(ErrorKind::UnknownField {
                    type_key: self.key.clone(),
                    field: key.clone(),
                }));
            };
            field.check(value)?;
        }

        let outcome = self.rule_outcome(payload);
        for field in &self.fields {
            if outcome.is_hidden(&field.key) {
                continue;
            }
            let required = field.required || outcome.is_required(&field.key);
            if required && !payload.get(&field.key).is_some_and(|v| !v.is_nil()) {
                return Err(Error::new(ErrorKind::MissingField {
                    type_key: self.key.clone(),
                    field: field.key.clone(),
                }));
            }
        }

        Ok(())
    }

    fn insert_field(&mut self, field: FieldDef) {
        let pos = self
            .fields
            .partition_point(|f| {
                (f.sort_order, f.key.as_str()) <= (field.sort_order, field.key.as_str())
            });
        self.fields.insert(pos, field);
    }
}

/// Registers entity and location types and resolves them by id or key.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeRegistry {
    /// Registered types by id.
    types: BTreeMap<TypeId, TypeDef>,
    /// Key index per class.
    by_key: HashMap<(RecordClass, String), TypeId>,
    /// Next id to assign.
    next_id: u64,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type definition and assigns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is taken for the class, a field key is
    /// duplicated, a choice field has no options, or a reference field's
    /// target is unregistered or of the wrong class.
    pub fn register(&mut self, mut def: TypeDef) -> Result<TypeId> {
        if self.by_key.contains_key(&(def.class, def.key.clone())) {
            return Err(Error::new(ErrorKind::DuplicateType {
                class: def.class,
                key: def.key.clone(),
            }));
        }

        for (i, field) in def.fields.iter().enumerate() {
            if def.fields[..i].iter().any(|f| f.key == field.key) {
                return Err(Error::new(ErrorKind::DuplicateField {
                    type_key: def.key.clone(),
                    field: field.key.clone(),
                }));
            }
            self.check_field(&field.key, field)?;
        }
        for rule in &def.rules {
            Self::check_rule_targets(&def, rule)?;
        }

        let id = TypeId::new(self.next_id);
        self.next_id += 1;
        def.id = id;
        self.by_key.insert((def.class, def.key.clone()), id);
        self.types.insert(id, def);
        Ok(id)
    }

    /// Looks up a type by id.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(&id)
    }

    /// Looks up a type by id, erroring when absent.
    ///
    /// # Errors
    ///
    /// Returns an unknown-type error.
    pub fn require(&self, id: TypeId) -> Result<&TypeDef> {
        self.get(id).ok_or_else(|| Error::unknown_type(id))
    }

    /// Resolves a type id from its class and key.
    #[must_use]
    pub fn by_key(&self, class: RecordClass, key: &str) -> Option<TypeId> {
        self.by_key.get(&(class, key.to_string())).copied()
    }

    /// Iterates all registered types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Iterates the registered types of one class in id order.
    pub fn iter_class(&self, class: RecordClass) -> impl Iterator<Item = &TypeDef> {
        self.types.values().filter(move |t| t.class == class)
    }

    /// Adds a field to a registered type.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is unknown, the field key is taken, or
    /// the field definition itself is invalid.
    pub fn add_field(&mut self, type_id: TypeId, field: FieldDef) -> Result<()> {
        let existing = self.require(type_id)?;
        if existing.field(&field.key).is_some() {
            return Err(Error::new(ErrorKind::DuplicateField {
                type_key: existing.key.clone(),
                field: field.key.clone(),
            }));
        }
        self.check_field(&field.key, &field)?;

        let def = self
            .types
            .get_mut(&type_id)
            .ok_or_else(|| Error::unknown_type(type_id))?;
        def.insert_field(field);
        Ok(())
    }

    /// Removes a field from a registered type.
    ///
    /// Rules that reference the removed field stay in place; their
    /// conditions simply stop matching and their actions become no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the type or field is unknown.
    pub fn remove_field(&mut self, type_id: TypeId, key: &str) -> Result<()> {
        let def = self
            .types
            .get_mut(&type_id)
            .ok_or_else(|| Error::unknown_type(type_id))?;
        let Some(pos) = def.fields.iter().position(|f| f.key == key) else {
            return Err(Error::new(ErrorKind::UnknownField {
                type_key: def.key.clone(),
                field: key.to_string(),
            }));
        };
        def.fields.remove(pos);
        Ok(())
    }

    /// Adds a display rule to a registered type.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is unknown or the rule targets a field
    /// the type does not define.
    pub fn add_rule(&mut self, type_id: TypeId, rule: FieldRule) -> Result<()> {
        let def = self.require(type_id)?;
        Self::check_rule_targets(def, &rule)?;

        let def = self
            .types
            .get_mut(&type_id)
            .ok_or_else(|| Error::unknown_type(type_id))?;
        def.rules.push(rule);
        Ok(())
    }

    /// Validates a payload against a registered type.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is unknown or the payload fails
    /// validation.
    pub fn validate_payload(&self, type_id: TypeId, payload: &Payload) -> Result<()> {
        self.require(type_id)?.validate(payload)
    }

    fn check_field(&self, key: &str, field: &FieldDef) -> Result<()> {
        if field.kind == FieldKind::Choice && field.options.is_empty() {
            return Err(Error::new(ErrorKind::MissingOptions {
                field: key.to_string(),
            }));
        }

        if let (Some(ref_class), Some(target)) = (field.kind.ref_class(), field.reference_target) {
            let target_def = self.require(target)?;
            if target_def.class != ref_class {
                return Err(Error::new(ErrorKind::ClassMismatch {
                    expected: ref_class,
                    actual: target_def.class,
                }));
            }
        }

        Ok(())
    }

    fn check_rule_targets(def: &TypeDef, rule: &FieldRule) -> Result<()> {
        let unknown = rule
            .conditions
            .iter()
            .map(|c| c.field.as_str())
            .chain(rule.actions.iter().map(RuleAction::field))
            .find(|key| def.field(key).is_none());

        if let Some(key) = unknown {
            return Err(Error::new(ErrorKind::UnknownField {
                type_key: def.key.clone(),
                field: key.to_string(),
            }));
        }
        Ok(())
    }
}
