// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during schema or entity validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entity type name is empty or invalid.
    InvalidEntityType(String),
    /// An entity type with this name is already registered.
    DuplicateEntityType(String),
    /// No registered schema exists for this entity type.
    UnknownEntityType(String),
    /// A field name appears more than once in a schema.
    DuplicateField {
        /// The entity type being validated.
        entity_type: String,
        /// The duplicated field name.
        field: String,
    },
    /// A schema declares no primary-key field.
    MissingPrimaryKey(String),
    /// A schema declares more than one primary-key field.
    MultiplePrimaryKeys(String),
    /// The primary-key field is not usable as an instance identifier.
    InvalidPrimaryKey {
        /// The entity type being validated.
        entity_type: String,
        /// The offending field name.
        field: String,
        /// Why the field cannot serve as a primary key.
        reason: String,
    },
    /// A foreign-key field names no target entity type.
    InvalidForeignKey {
        /// The entity type being validated.
        entity_type: String,
        /// The offending field name.
        field: String,
    },
    /// The auto-timestamp marker is only meaningful on plain value fields.
    InvalidAutoTimestamp {
        /// The entity type being validated.
        entity_type: String,
        /// The offending field name.
        field: String,
    },
    /// A tracked relation is malformed (empty name or target, or a name
    /// clashing with a field).
    InvalidRelation {
        /// The entity type being validated.
        entity_type: String,
        /// The offending relation name.
        relation: String,
    },
    /// A relation name appears more than once in a schema.
    DuplicateRelation {
        /// The entity type being validated.
        entity_type: String,
        /// The duplicated relation name.
        relation: String,
    },
    /// The schema declares no tracked relation with this name.
    UnknownRelation {
        /// The entity type.
        entity_type: String,
        /// The requested relation name.
        relation: String,
    },
    /// An entity carries a field the schema does not declare.
    UnknownField {
        /// The entity type.
        entity_type: String,
        /// The unexpected field name.
        field: String,
    },
    /// An entity is missing a field the schema declares.
    MissingField {
        /// The entity type.
        entity_type: String,
        /// The missing field name.
        field: String,
    },
    /// A field value's variant is incompatible with its declared kind.
    FieldKindMismatch {
        /// The entity type.
        entity_type: String,
        /// The field name.
        field: String,
        /// What the schema allows.
        expected: &'static str,
        /// What the entity carried.
        actual: &'static str,
    },
    /// An entity was checked against a schema for a different type.
    EntityTypeMismatch {
        /// The schema's entity type.
        expected: String,
        /// The entity's type.
        actual: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntityType(msg) => write!(f, "Invalid entity type: {msg}"),
            Self::DuplicateEntityType(name) => {
                write!(f, "Entity type '{name}' is already registered")
            }
            Self::UnknownEntityType(name) => {
                write!(f, "Entity type '{name}' is not registered")
            }
            Self::DuplicateField { entity_type, field } => {
                write!(f, "Field '{field}' appears twice on '{entity_type}'")
            }
            Self::MissingPrimaryKey(entity_type) => {
                write!(f, "Entity type '{entity_type}' has no primary-key field")
            }
            Self::MultiplePrimaryKeys(entity_type) => {
                write!(
                    f,
                    "Entity type '{entity_type}' declares more than one primary-key field"
                )
            }
            Self::InvalidPrimaryKey {
                entity_type,
                field,
                reason,
            } => {
                write!(
                    f,
                    "Field '{field}' cannot be the primary key of '{entity_type}': {reason}"
                )
            }
            Self::InvalidForeignKey { entity_type, field } => {
                write!(
                    f,
                    "Foreign-key field '{field}' on '{entity_type}' names no target type"
                )
            }
            Self::InvalidAutoTimestamp { entity_type, field } => {
                write!(
                    f,
                    "Field '{field}' on '{entity_type}' cannot combine auto-timestamp with a foreign key"
                )
            }
            Self::InvalidRelation {
                entity_type,
                relation,
            } => {
                write!(f, "Relation '{relation}' on '{entity_type}' is malformed")
            }
            Self::DuplicateRelation {
                entity_type,
                relation,
            } => {
                write!(f, "Relation '{relation}' appears twice on '{entity_type}'")
            }
            Self::UnknownRelation {
                entity_type,
                relation,
            } => {
                write!(
                    f,
                    "Entity type '{entity_type}' tracks no relation named '{relation}'"
                )
            }
            Self::UnknownField { entity_type, field } => {
                write!(f, "Entity type '{entity_type}' declares no field '{field}'")
            }
            Self::MissingField { entity_type, field } => {
                write!(f, "Entity of type '{entity_type}' is missing field '{field}'")
            }
            Self::FieldKindMismatch {
                entity_type,
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Field '{field}' on '{entity_type}' expects {expected} but carried {actual}"
                )
            }
            Self::EntityTypeMismatch { expected, actual } => {
                write!(
                    f,
                    "Entity of type '{actual}' checked against schema for '{expected}'"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
