//! Type/field registry, display rules, and relationship types for Worldsmith.
//!
//! This crate provides:
//! - [`FieldDef`] - Dynamically configured field definitions
//! - [`TypeDef`] / [`TypeRegistry`] - Entity and location type registration
//!   and payload validation
//! - [`FieldRule`] - Conditional show/hide/require rules over field values
//! - [`RelationshipType`] / [`RelationshipRegistry`] - Directional link
//!   definitions with endpoint type constraints

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod field;
pub mod relationship;
pub mod rules;
pub mod typedef;

pub use field::FieldDef;
pub use relationship::{RelationshipRegistry, RelationshipType};
pub use rules::{Condition, ConditionOp, FieldRule, MatchMode, RuleAction, RuleOutcome};
pub use typedef::{Payload, TypeDef, TypeRegistry};
