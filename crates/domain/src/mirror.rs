// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The schema-mirroring contract.
//!
//! For each tracked entity type, the historical record's shape is derived
//! from the live schema:
//!
//! - bookkeeping columns (`history_id`, `history_date`, `history_type`,
//!   `changed_by`) come first
//! - identifier fields (primary key, unique) become plain **indexed,
//!   non-unique** value columns — a history table holds many rows per
//!   instance, so uniqueness can no longer be guaranteed, but lookups by
//!   instance stay fast
//! - foreign keys become raw identifier columns named `<field>_id`,
//!   nullable because the referenced row may never have existed in history
//! - auto-timestamp semantics are stripped; a copied timestamp is frozen
//!   at capture time

use crate::error::DomainError;
use crate::types::{Entity, EntitySchema, FieldDef, FieldKind, FieldValue};
use crate::validation::validate_entity;
use std::collections::BTreeMap;

/// One column of a derived historical record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalColumn {
    /// The column name.
    pub name: String,
    /// Whether the column should be indexed for instance lookups.
    pub indexed: bool,
    /// Whether the column accepts null.
    pub nullable: bool,
}

impl HistoricalColumn {
    fn new(name: &str, indexed: bool, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            indexed,
            nullable,
        }
    }
}

/// The name a field carries in a historical record.
///
/// Foreign keys are stored under `<field>_id` to make explicit that the
/// copy holds a raw identifier, not a live reference.
#[must_use]
pub fn mirrored_field_name(field: &FieldDef) -> String {
    if field.is_foreign_key() {
        format!("{}_id", field.name)
    } else {
        field.name.clone()
    }
}

/// Derives the historical record shape for a tracked entity type.
#[must_use]
pub fn mirrored_columns(schema: &EntitySchema) -> Vec<HistoricalColumn> {
    let mut columns: Vec<HistoricalColumn> = vec![
        HistoricalColumn::new("history_id", true, false),
        HistoricalColumn::new("history_date", true, false),
        HistoricalColumn::new("history_type", false, false),
        HistoricalColumn::new("changed_by", false, true),
    ];

    for field in schema.fields() {
        let indexed: bool = field.primary_key || field.unique;
        let nullable: bool = field.is_foreign_key();
        columns.push(HistoricalColumn {
            name: mirrored_field_name(field),
            indexed,
            nullable,
        });
    }

    columns
}

/// Copies every current field value of an entity into a historical field
/// map, resolving foreign keys to their raw identifiers under the
/// mirrored `<field>_id` names.
///
/// The entity is validated first; either every field is copied or the
/// error is surfaced with nothing copied. There are no partial records.
///
/// # Errors
///
/// Returns an error if the entity does not satisfy the schema.
pub fn copy_field_values(
    schema: &EntitySchema,
    entity: &Entity,
) -> Result<BTreeMap<String, FieldValue>, DomainError> {
    validate_entity(schema, entity)?;

    let mut copied: BTreeMap<String, FieldValue> = BTreeMap::new();
    for field in schema.fields() {
        let value: FieldValue = entity
            .value(&field.name)
            .cloned()
            .ok_or_else(|| DomainError::MissingField {
                entity_type: schema.entity_type().to_string(),
                field: field.name.clone(),
            })?;
        match &field.kind {
            FieldKind::Value => {
                copied.insert(field.name.clone(), value);
            }
            FieldKind::ForeignKey { .. } => {
                copied.insert(mirrored_field_name(field), value);
            }
        }
    }

    Ok(copied)
}
