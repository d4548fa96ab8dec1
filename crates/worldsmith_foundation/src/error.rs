//! Error types for Worldsmith operations.
//!
//! Uses `thiserror` for ergonomic error definition.

use thiserror::Error;

use crate::id::{CampaignId, CharacterId, NoteId, RecordClass, RecordId, TypeId, UserId};
use crate::kind::FieldKind;

/// Convenience result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Worldsmith operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The operation that failed, when known.
    pub operation: Option<&'static str>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            operation: None,
        }
    }

    /// Tags this error with the operation that produced it.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Creates a record-not-found error.
    #[must_use]
    pub fn record_not_found(id: RecordId) -> Self {
        Self::new(ErrorKind::RecordNotFound(id))
    }

    /// Creates a stale record reference error.
    #[must_use]
    pub fn stale_record(id: RecordId) -> Self {
        Self::new(ErrorKind::StaleRecord(id))
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(id: TypeId) -> Self {
        Self::new(ErrorKind::UnknownType(id))
    }

    /// Creates a field type mismatch error.
    #[must_use]
    pub fn field_type_mismatch(
        field: impl Into<String>,
        expected: FieldKind,
        actual: &'static str,
    ) -> Self {
        Self::new(ErrorKind::FieldTypeMismatch {
            field: field.into(),
            expected,
            actual,
        })
    }

    /// Creates a write-access-denied error.
    #[must_use]
    pub fn access_denied(user: UserId, record: RecordId) -> Self {
        Self::new(ErrorKind::AccessDenied { user, record })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A type with this key is already registered for the class.
    #[error("duplicate {class} type: {key}")]
    DuplicateType {
        /// Record class of the colliding type.
        class: RecordClass,
        /// The colliding type key.
        key: String,
    },

    /// Type id does not resolve to a registered type.
    #[error("unknown type: {0}")]
    UnknownType(TypeId),

    /// The type already defines a field with this key.
    #[error("duplicate field on {type_key}: {field}")]
    DuplicateField {
        /// Key of the type being modified.
        type_key: String,
        /// The colliding field key.
        field: String,
    },

    /// Payload carries a key the type does not define.
    #[error("unknown field on {type_key}: {field}")]
    UnknownField {
        /// Key of the type validated against.
        type_key: String,
        /// The unknown field key.
        field: String,
    },

    /// A required field is absent or nil.
    #[error("missing required field on {type_key}: {field}")]
    MissingField {
        /// Key of the type validated against.
        type_key: String,
        /// The missing field key.
        field: String,
    },

    /// Value does not match the field's declared kind.
    #[error("field {field}: expected {expected}, got {actual}")]
    FieldTypeMismatch {
        /// The field key.
        field: String,
        /// The declared kind.
        expected: FieldKind,
        /// Short name of the supplied value's kind.
        actual: &'static str,
    },

    /// Choice value is not in the field's option list.
    #[error("field {field}: unknown option {value:?}")]
    UnknownChoice {
        /// The field key.
        field: String,
        /// The rejected option.
        value: String,
    },

    /// A choice field was declared without options.
    #[error("field {field}: choice field declared without options")]
    MissingOptions {
        /// The field key.
        field: String,
    },

    /// A reference value points at a record of the wrong type.
    #[error("field {field}: reference must target type {expected}, record has type {actual}")]
    ReferenceTargetMismatch {
        /// The field key.
        field: String,
        /// The target type the field constrains to.
        expected: TypeId,
        /// The referenced record's actual type.
        actual: TypeId,
    },

    /// Record was not found in storage.
    #[error("record not found: {0:?}")]
    RecordNotFound(RecordId),

    /// Record reference is stale (generation mismatch).
    #[error("stale record reference: {0:?}")]
    StaleRecord(RecordId),

    /// Record belongs to the other class.
    #[error("class mismatch: expected {expected}, got {actual}")]
    ClassMismatch {
        /// The class the operation requires.
        expected: RecordClass,
        /// The record's actual class.
        actual: RecordClass,
    },

    /// A relationship type with this key is already defined.
    #[error("duplicate relationship type: {0}")]
    DuplicateRelationship(String),

    /// Relationship key does not resolve to a defined relationship type.
    #[error("unknown relationship type: {0}")]
    UnknownRelationship(String),

    /// The relationship type does not allow this pair of endpoint types.
    #[error("relationship {relationship} does not allow {from} -> {to}")]
    EndpointRejected {
        /// The relationship type key.
        relationship: String,
        /// Type of the source record.
        from: TypeId,
        /// Type of the target record.
        to: TypeId,
    },

    /// Campaign was not found.
    #[error("campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    /// Character was not found in the campaign.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// Note was not found.
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),

    /// The user is not a member of the campaign.
    #[error("user {user} is not a member of campaign {campaign}")]
    NotAMember {
        /// The campaign.
        campaign: CampaignId,
        /// The non-member user.
        user: UserId,
    },

    /// The operation requires the campaign's game master.
    #[error("user {user} is not a game master of campaign {campaign}")]
    NotGameMaster {
        /// The campaign.
        campaign: CampaignId,
        /// The user lacking the role.
        user: UserId,
    },

    /// The user may not write to the record.
    #[error("user {user} may not modify {record}")]
    AccessDenied {
        /// The denied user.
        user: UserId,
        /// The protected record.
        record: RecordId,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File I/O failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
