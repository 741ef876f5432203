// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::validate_schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of a tracked field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A plain value column.
    Value,
    /// A reference to another entity type, stored as a raw identifier.
    ForeignKey {
        /// The referenced entity type name.
        target: String,
    },
}

/// Definition of a single field on a tracked entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// The field name.
    pub name: String,
    /// Whether the field holds a plain value or a foreign-key reference.
    pub kind: FieldKind,
    /// Whether this field identifies the instance.
    pub primary_key: bool,
    /// Whether the live column carries a uniqueness constraint.
    pub unique: bool,
    /// Whether the live column is an automatically maintained timestamp.
    ///
    /// Historical copies strip this behavior: a copied timestamp is frozen
    /// at capture time and never auto-updated afterwards.
    pub auto_timestamp: bool,
}

impl FieldDef {
    /// Creates a plain value field.
    #[must_use]
    pub fn value(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Value,
            primary_key: false,
            unique: false,
            auto_timestamp: false,
        }
    }

    /// Creates the primary-key field.
    #[must_use]
    pub fn primary_key(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Value,
            primary_key: true,
            unique: true,
            auto_timestamp: false,
        }
    }

    /// Creates a unique value field.
    #[must_use]
    pub fn unique(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Value,
            primary_key: false,
            unique: true,
            auto_timestamp: false,
        }
    }

    /// Creates an automatically maintained timestamp field.
    #[must_use]
    pub fn auto_timestamp(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Value,
            primary_key: false,
            unique: false,
            auto_timestamp: true,
        }
    }

    /// Creates a foreign-key field referencing `target`.
    #[must_use]
    pub fn foreign_key(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::ForeignKey {
                target: target.to_string(),
            },
            primary_key: false,
            unique: false,
            auto_timestamp: false,
        }
    }

    /// Returns `true` if this field is a foreign-key reference.
    #[must_use]
    pub const fn is_foreign_key(&self) -> bool {
        matches!(self.kind, FieldKind::ForeignKey { .. })
    }
}

/// A single field value on a live or reconstructed entity.
///
/// Foreign keys are carried as [`FieldValue::Reference`] — a raw identifier
/// of the target instance, never a live pointer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// A 64-bit integer.
    Integer(i64),
    /// A text value.
    Text(String),
    /// A boolean value.
    Boolean(bool),
    /// A timestamp rendered as sortable text.
    Timestamp(String),
    /// A raw foreign-key identifier.
    Reference(i64),
    /// An absent value.
    Null,
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The variant name, used in kind-mismatch diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
            Self::Timestamp(_) => "timestamp",
            Self::Reference(_) => "reference",
            Self::Null => "null",
        }
    }
}

/// A many-to-many relation explicitly opted into history tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    /// The relation name on the source entity type.
    pub name: String,
    /// The target entity type name.
    pub target: String,
}

impl RelationDef {
    /// Creates a tracked relation definition.
    #[must_use]
    pub fn new(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
        }
    }
}

/// The schema of a tracked entity type: an ordered set of named, typed
/// fields plus the many-to-many relations opted into history tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    entity_type: String,
    fields: Vec<FieldDef>,
    relations: Vec<RelationDef>,
}

impl EntitySchema {
    /// Creates a schema with no tracked relations.
    #[must_use]
    pub fn new(entity_type: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            fields,
            relations: Vec::new(),
        }
    }

    /// Creates a schema with tracked many-to-many relations.
    #[must_use]
    pub fn with_relations(
        entity_type: &str,
        fields: Vec<FieldDef>,
        relations: Vec<RelationDef>,
    ) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            fields,
            relations,
        }
    }

    /// The entity type name.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The ordered field definitions.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// The tracked many-to-many relations.
    #[must_use]
    pub fn relations(&self) -> &[RelationDef] {
        &self.relations
    }

    /// Looks up a field definition by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Looks up a tracked relation by name.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    /// Returns the primary-key field definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema declares no primary key.
    pub fn primary_key_field(&self) -> Result<&FieldDef, DomainError> {
        self.fields
            .iter()
            .find(|field| field.primary_key)
            .ok_or_else(|| DomainError::MissingPrimaryKey(self.entity_type.clone()))
    }
}

/// A live-shaped entity value object: an entity type name plus a map of
/// field values.
///
/// Entities are plain values. Reconstructed snapshots and live rows share
/// this shape; nothing here points back into storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    entity_type: String,
    values: BTreeMap<String, FieldValue>,
}

impl Entity {
    /// Creates an entity value object.
    #[must_use]
    pub fn new(entity_type: &str, values: BTreeMap<String, FieldValue>) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            values,
        }
    }

    /// The entity type name.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// All field values.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Looks up a single field value.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Extracts the instance identifier according to `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema declares no primary key, the entity
    /// is missing the primary-key field, or the value is not an integer.
    pub fn primary_key(&self, schema: &EntitySchema) -> Result<i64, DomainError> {
        let pk_field: &FieldDef = schema.primary_key_field()?;
        let value: &FieldValue =
            self.values
                .get(&pk_field.name)
                .ok_or_else(|| DomainError::MissingField {
                    entity_type: self.entity_type.clone(),
                    field: pk_field.name.clone(),
                })?;
        match value {
            FieldValue::Integer(pk) => Ok(*pk),
            other => Err(DomainError::InvalidPrimaryKey {
                entity_type: self.entity_type.clone(),
                field: pk_field.name.clone(),
                reason: format!("expected an integer value, found {}", other.variant_name()),
            }),
        }
    }
}

/// The set of tracked entity types.
///
/// Registration validates the schema; lookups answer "is this type
/// tracked" for the capture hooks and the relation-graph walk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaRegistry {
    schemas: Vec<EntitySchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schemas: Vec::new(),
        }
    }

    /// Registers a tracked entity type.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is invalid or the type is already
    /// registered.
    pub fn register(&mut self, schema: EntitySchema) -> Result<(), DomainError> {
        validate_schema(&schema)?;
        if self.is_tracked(schema.entity_type()) {
            return Err(DomainError::DuplicateEntityType(
                schema.entity_type().to_string(),
            ));
        }
        self.schemas.push(schema);
        Ok(())
    }

    /// Returns `true` if a schema is registered for `entity_type`.
    #[must_use]
    pub fn is_tracked(&self, entity_type: &str) -> bool {
        self.schemas
            .iter()
            .any(|schema| schema.entity_type() == entity_type)
    }

    /// Looks up the schema for `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is not registered.
    pub fn schema(&self, entity_type: &str) -> Result<&EntitySchema, DomainError> {
        self.schemas
            .iter()
            .find(|schema| schema.entity_type() == entity_type)
            .ok_or_else(|| DomainError::UnknownEntityType(entity_type.to_string()))
    }

    /// All registered schemas.
    #[must_use]
    pub fn schemas(&self) -> &[EntitySchema] {
        &self.schemas
    }
}
