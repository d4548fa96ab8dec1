//! Relationship type definitions and the endpoint matcher.
//!
//! Relationship types are named, directional link definitions between
//! entity types. Each carries allow-lists for the "from" and "to" roles;
//! an empty list means any entity type is acceptable in that role.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::{Error, ErrorKind, Result, TypeId};

/// A named, directional link definition between entity types.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationshipType {
    /// Stable key, unique across relationship types.
    pub key: String,
    /// Forward label (e.g. "parent of").
    pub name: String,
    /// Label when the edge is read from the target side (e.g. "child of").
    pub reverse_name: Option<String>,
    /// Entity types allowed in the "from" role. Empty means any.
    pub from_types: Vec<TypeId>,
    /// Entity types allowed in the "to" role. Empty means any.
    pub to_types: Vec<TypeId>,
}

impl RelationshipType {
    /// Creates a relationship type accepting any entity types.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            reverse_name: None,
            from_types: Vec::new(),
            to_types: Vec::new(),
        }
    }

    /// Sets the reverse label.
    #[must_use]
    pub fn with_reverse_name(mut self, name: impl Into<String>) -> Self {
        self.reverse_name = Some(name.into());
        self
    }

    /// Restricts the "from" role to the given entity type (additive).
    #[must_use]
    pub fn allow_from(mut self, type_id: TypeId) -> Self {
        self.from_types.push(type_id);
        self
    }

    /// Restricts the "to" role to the given entity type (additive).
    #[must_use]
    pub fn allow_to(mut self, type_id: TypeId) -> Self {
        self.to_types.push(type_id);
        self
    }

    /// The label to display for the given direction.
    #[must_use]
    pub fn label(&self, forward: bool) -> &str {
        if forward {
            &self.name
        } else {
            self.reverse_name.as_deref().unwrap_or(&self.name)
        }
    }

    /// Checks whether this relationship admits the endpoint type pair.
    #[must_use]
    pub fn allows(&self, from: TypeId, to: TypeId) -> bool {
        let from_ok = self.from_types.is_empty() || self.from_types.contains(&from);
        let to_ok = self.to_types.is_empty() || self.to_types.contains(&to);
        from_ok && to_ok
    }
}

/// Stores relationship type definitions, keyed by relationship key.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationshipRegistry {
    types: BTreeMap<String, RelationshipType>,
}

impl RelationshipRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a relationship type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is already defined.
    pub fn define(&mut self, rel: RelationshipType) -> Result<()> {
        if self.types.contains_key(&rel.key) {
            return Err(Error::new(ErrorKind::DuplicateRelationship(rel.key)));
        }
        self.types.insert(rel.key.clone(), rel);
        Ok(())
    }

    /// Looks up a relationship type by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RelationshipType> {
        self.types.get(key)
    }

    /// Looks up a relationship type by key, erroring when absent.
    ///
    /// # Errors
    ///
    /// Returns an unknown-relationship error.
    pub fn require(&self, key: &str) -> Result<&RelationshipType> {
        self.get(key)
            .ok_or_else(|| Error::new(ErrorKind::UnknownRelationship(key.to_string())))
    }

    /// Iterates all relationship types in key order.
    pub fn iter(&self) -> impl Iterator<Item = &RelationshipType> {
        self.types.values()
    }

    /// The relationship types valid between the two entity types, in key
    /// order. This is what a link editor offers for a concrete pair of
    /// records.
    #[must_use]
    pub fn valid_between(&self, from: TypeId, to: TypeId) -> Vec<&RelationshipType> {
        self.types.values().filter(|r| r.allows(from, to)).collect()
    }
}
