// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema and entity validation.
//!
//! Validation is strict and total: a schema or entity either satisfies
//! every rule or the first violation is surfaced as a typed error. The
//! capture path relies on this to guarantee that no partial historical
//! record can ever be derived from malformed input.

use crate::error::DomainError;
use crate::types::{Entity, EntitySchema, FieldDef, FieldKind, FieldValue};

/// Validates a tracked entity type schema.
///
/// Rules:
/// - the entity type name is non-empty
/// - field names are non-empty and unique
/// - exactly one field is the primary key, and it is a plain integer value
///   field (never a foreign key)
/// - foreign-key fields name a non-empty target type
/// - the auto-timestamp marker appears only on plain value fields
/// - relation names are non-empty, unique, distinct from field names, and
///   name a non-empty target type
///
/// # Errors
///
/// Returns the first rule violation found.
pub fn validate_schema(schema: &EntitySchema) -> Result<(), DomainError> {
    let entity_type: &str = schema.entity_type();
    if entity_type.trim().is_empty() {
        return Err(DomainError::InvalidEntityType(String::from(
            "entity type name must not be empty",
        )));
    }

    let mut primary_keys: usize = 0;
    for (index, field) in schema.fields().iter().enumerate() {
        if field.name.trim().is_empty() {
            return Err(DomainError::InvalidEntityType(format!(
                "field {index} on '{entity_type}' has an empty name"
            )));
        }
        if schema
            .fields()
            .iter()
            .take(index)
            .any(|earlier| earlier.name == field.name)
        {
            return Err(DomainError::DuplicateField {
                entity_type: entity_type.to_string(),
                field: field.name.clone(),
            });
        }
        match &field.kind {
            FieldKind::Value => {}
            FieldKind::ForeignKey { target } => {
                if target.trim().is_empty() {
                    return Err(DomainError::InvalidForeignKey {
                        entity_type: entity_type.to_string(),
                        field: field.name.clone(),
                    });
                }
                if field.primary_key {
                    return Err(DomainError::InvalidPrimaryKey {
                        entity_type: entity_type.to_string(),
                        field: field.name.clone(),
                        reason: String::from("a foreign key cannot identify the instance"),
                    });
                }
                if field.auto_timestamp {
                    return Err(DomainError::InvalidAutoTimestamp {
                        entity_type: entity_type.to_string(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        if field.primary_key {
            primary_keys += 1;
        }
    }

    if primary_keys == 0 {
        return Err(DomainError::MissingPrimaryKey(entity_type.to_string()));
    }
    if primary_keys > 1 {
        return Err(DomainError::MultiplePrimaryKeys(entity_type.to_string()));
    }

    for (index, relation) in schema.relations().iter().enumerate() {
        if relation.name.trim().is_empty() || relation.target.trim().is_empty() {
            return Err(DomainError::InvalidRelation {
                entity_type: entity_type.to_string(),
                relation: relation.name.clone(),
            });
        }
        if schema.field(&relation.name).is_some() {
            return Err(DomainError::InvalidRelation {
                entity_type: entity_type.to_string(),
                relation: relation.name.clone(),
            });
        }
        if schema
            .relations()
            .iter()
            .take(index)
            .any(|earlier| earlier.name == relation.name)
        {
            return Err(DomainError::DuplicateRelation {
                entity_type: entity_type.to_string(),
                relation: relation.name.clone(),
            });
        }
    }

    Ok(())
}

/// Validates an entity value object against its schema.
///
/// Every schema field must be present with a value compatible with its
/// kind; fields unknown to the schema are rejected.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_entity(schema: &EntitySchema, entity: &Entity) -> Result<(), DomainError> {
    if schema.entity_type() != entity.entity_type() {
        return Err(DomainError::EntityTypeMismatch {
            expected: schema.entity_type().to_string(),
            actual: entity.entity_type().to_string(),
        });
    }

    for field in schema.fields() {
        let value: &FieldValue =
            entity
                .value(&field.name)
                .ok_or_else(|| DomainError::MissingField {
                    entity_type: schema.entity_type().to_string(),
                    field: field.name.clone(),
                })?;
        validate_field_value(schema, field, value)?;
    }

    for name in entity.values().keys() {
        if schema.field(name).is_none() {
            return Err(DomainError::UnknownField {
                entity_type: schema.entity_type().to_string(),
                field: name.clone(),
            });
        }
    }

    Ok(())
}

/// Checks a single value against its field definition.
fn validate_field_value(
    schema: &EntitySchema,
    field: &FieldDef,
    value: &FieldValue,
) -> Result<(), DomainError> {
    match &field.kind {
        FieldKind::Value => {
            if matches!(value, FieldValue::Reference(_)) {
                return Err(DomainError::FieldKindMismatch {
                    entity_type: schema.entity_type().to_string(),
                    field: field.name.clone(),
                    expected: "a plain value",
                    actual: value.variant_name(),
                });
            }
            if field.primary_key && !matches!(value, FieldValue::Integer(_)) {
                return Err(DomainError::InvalidPrimaryKey {
                    entity_type: schema.entity_type().to_string(),
                    field: field.name.clone(),
                    reason: format!("expected an integer value, found {}", value.variant_name()),
                });
            }
        }
        FieldKind::ForeignKey { .. } => {
            if !matches!(value, FieldValue::Reference(_) | FieldValue::Null) {
                return Err(DomainError::FieldKindMismatch {
                    entity_type: schema.entity_type().to_string(),
                    field: field.name.clone(),
                    expected: "a raw reference or null",
                    actual: value.variant_name(),
                });
            }
        }
    }
    Ok(())
}
