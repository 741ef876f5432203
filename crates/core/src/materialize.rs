// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Snapshot materialization.
//!
//! The record store selects records; the functions here interpret them.
//! A "snapshot" is a derived, transient reconstruction — a live-shaped
//! [`Entity`] borrowing its field values from exactly one historical
//! record. Nothing here ever writes to the store.

use crate::error::HistoryError;
use retrace_domain::{Entity, EntitySchema, FieldValue, mirrored_field_name};
use retrace_history::{ChangeKind, HistoricalRecord, LinkChangeKind, LinkRecord};
use std::collections::BTreeMap;

/// Reconstructs a live-shaped entity from one historical record.
///
/// Mirrored `<field>_id` columns map back onto the schema's foreign-key
/// fields as raw references; everything else maps by name.
///
/// # Errors
///
/// Returns an error if the record's values do not cover the schema
/// (a schema mismatch between capture time and now).
pub fn entity_from_record(
    schema: &EntitySchema,
    record: &HistoricalRecord,
) -> Result<Entity, HistoryError> {
    let mut values: BTreeMap<String, FieldValue> = BTreeMap::new();
    for field in schema.fields() {
        let mirrored: String = mirrored_field_name(field);
        let value: FieldValue = record.values.get(&mirrored).cloned().ok_or_else(|| {
            HistoryError::DomainViolation(retrace_domain::DomainError::MissingField {
                entity_type: schema.entity_type().to_string(),
                field: mirrored.clone(),
            })
        })?;
        values.insert(field.name.clone(), value);
    }
    Ok(Entity::new(schema.entity_type(), values))
}

/// Reconstructs the most recent historical state of an instance.
///
/// `newest` is the single most recent record for the instance by
/// `(history_date, history_id)` descending, or `None` if the instance
/// has no history at all.
///
/// # Errors
///
/// Fails with [`HistoryError::NotFound`] if no record exists.
pub fn most_recent(
    schema: &EntitySchema,
    pk: i64,
    newest: Option<&HistoricalRecord>,
) -> Result<Entity, HistoryError> {
    let record: &HistoricalRecord = newest.ok_or_else(|| HistoryError::NotFound {
        entity_type: schema.entity_type().to_string(),
        pk,
    })?;
    entity_from_record(schema, record)
}

/// Reconstructs the state of an instance as of a point in time.
///
/// `candidate` is the most recent record at or before the requested
/// timestamp, or `None` if no record existed yet.
///
/// # Errors
///
/// Fails with [`HistoryError::NotFound`] if the instance did not yet
/// exist, and with [`HistoryError::AlreadyDeleted`] if the selected
/// record marks a deletion — the instance had been removed by that
/// timestamp, per the history as recorded.
pub fn as_of(
    schema: &EntitySchema,
    pk: i64,
    candidate: Option<&HistoricalRecord>,
) -> Result<Entity, HistoryError> {
    let record: &HistoricalRecord = candidate.ok_or_else(|| HistoryError::NotFound {
        entity_type: schema.entity_type().to_string(),
        pk,
    })?;
    if record.change_kind == ChangeKind::Deleted {
        return Err(HistoryError::AlreadyDeleted {
            entity_type: schema.entity_type().to_string(),
            pk,
            deleted_at: record.history_date.clone(),
        });
    }
    entity_from_record(schema, record)
}

/// Computes relation membership as of a point in time.
///
/// `records` must hold every link record of one `(relation, source)`
/// pair at or before the timestamp, ordered oldest first (ascending
/// `(history_date, record_id)`). For each target, the most recent record
/// wins: the target is a member if that record added the link, excluded
/// if it removed the link or no record exists.
///
/// Returns the member target identifiers in ascending order.
#[must_use]
pub fn link_membership_as_of(records: &[LinkRecord]) -> Vec<i64> {
    let mut latest: BTreeMap<i64, LinkChangeKind> = BTreeMap::new();
    for record in records {
        latest.insert(record.target_pk, record.change_kind);
    }
    latest
        .into_iter()
        .filter(|(_, kind)| *kind == LinkChangeKind::Added)
        .map(|(target_pk, _)| target_pk)
        .collect()
}
