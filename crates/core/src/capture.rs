// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Change capture.
//!
//! Every tracked mutation flows through [`apply`]: the command is
//! validated against the registry and the live context, and the result
//! carries both the canonical mutation and the historical records to
//! append. Capture never performs storage work itself; it decides, the
//! store executes — atomically, so a failed append fails the whole
//! mutation.

use crate::command::Command;
use crate::error::HistoryError;
use crate::state::{LiveContext, LiveEffect, TransitionResult};
use crate::validate_relation_tracked;
use retrace_domain::{Entity, EntitySchema, FieldValue, SchemaRegistry, copy_field_values};
use retrace_history::{Actor, ChangeKind, HistoricalRecord, LinkChangeKind, LinkRecord};
use std::collections::BTreeMap;

/// Applies a command to the live context, producing the live effect and
/// the records to append.
///
/// # Arguments
///
/// * `registry` - The tracked entity type registry
/// * `live` - The relevant live state, read before the mutation
/// * `command` - The mutation to capture
/// * `actor` - The optional "changed by" identity
/// * `captured_at` - The capture timestamp for every record produced
///
/// # Errors
///
/// Returns an error if the command violates schema rules or the live
/// context (creating an existing instance, updating or deleting a
/// missing one, duplicating or removing an absent link). On error,
/// nothing has been captured.
pub fn apply(
    registry: &SchemaRegistry,
    live: &LiveContext,
    command: Command,
    actor: Option<Actor>,
    captured_at: &str,
) -> Result<TransitionResult, HistoryError> {
    match command {
        Command::CreateEntity { entity } => {
            let schema: &EntitySchema = registry.schema(entity.entity_type())?;
            let pk: i64 = entity.primary_key(schema)?;
            if live.entity_before.is_some() {
                return Err(HistoryError::AlreadyExists {
                    entity_type: entity.entity_type().to_string(),
                    pk,
                });
            }

            let record: HistoricalRecord =
                snapshot_record(schema, &entity, ChangeKind::Created, actor, captured_at)?;

            Ok(TransitionResult {
                effect: LiveEffect::UpsertEntity { entity, pk },
                records: vec![record],
                link_records: Vec::new(),
            })
        }
        Command::UpdateEntity {
            entity,
            record_history,
        } => {
            let schema: &EntitySchema = registry.schema(entity.entity_type())?;
            let pk: i64 = entity.primary_key(schema)?;
            if live.entity_before.is_none() {
                return Err(HistoryError::NotFound {
                    entity_type: entity.entity_type().to_string(),
                    pk,
                });
            }

            // The escape hatch is consumed by this single save: the update
            // happens either way, only the record is suppressed.
            let records: Vec<HistoricalRecord> = if record_history {
                vec![snapshot_record(
                    schema,
                    &entity,
                    ChangeKind::Changed,
                    actor,
                    captured_at,
                )?]
            } else {
                Vec::new()
            };

            Ok(TransitionResult {
                effect: LiveEffect::UpsertEntity { entity, pk },
                records,
                link_records: Vec::new(),
            })
        }
        Command::DeleteEntity { entity_type, pk } => {
            let schema: &EntitySchema = registry.schema(&entity_type)?;
            let before: &Entity =
                live.entity_before
                    .as_ref()
                    .ok_or_else(|| HistoryError::NotFound {
                        entity_type: entity_type.clone(),
                        pk,
                    })?;

            // The record carries the field values as they existed at the
            // moment of deletion.
            let record: HistoricalRecord =
                snapshot_record(schema, before, ChangeKind::Deleted, actor, captured_at)?;

            Ok(TransitionResult {
                effect: LiveEffect::DeleteEntity { entity_type, pk },
                records: vec![record],
                link_records: Vec::new(),
            })
        }
        Command::AddLink {
            relation,
            source_type,
            source_pk,
            target_pk,
        } => {
            let target_type: String =
                validate_relation_tracked(registry, &source_type, &relation)?
                    .target
                    .clone();
            if live.linked_targets.contains(&target_pk) {
                return Err(HistoryError::AlreadyLinked {
                    relation,
                    source_pk,
                    target_pk,
                });
            }

            let link_record: LinkRecord = link_record(
                &relation,
                &source_type,
                source_pk,
                &target_type,
                target_pk,
                LinkChangeKind::Added,
                actor,
                captured_at,
            );

            Ok(TransitionResult {
                effect: LiveEffect::AddLink {
                    relation,
                    source_type,
                    source_pk,
                    target_type,
                    target_pk,
                },
                records: Vec::new(),
                link_records: vec![link_record],
            })
        }
        Command::RemoveLink {
            relation,
            source_type,
            source_pk,
            target_pk,
        } => {
            let target_type: String =
                validate_relation_tracked(registry, &source_type, &relation)?
                    .target
                    .clone();
            if !live.linked_targets.contains(&target_pk) {
                return Err(HistoryError::NotLinked {
                    relation,
                    source_pk,
                    target_pk,
                });
            }

            let link_record: LinkRecord = link_record(
                &relation,
                &source_type,
                source_pk,
                &target_type,
                target_pk,
                LinkChangeKind::Removed,
                actor,
                captured_at,
            );

            Ok(TransitionResult {
                effect: LiveEffect::RemoveLink {
                    relation,
                    source_type,
                    source_pk,
                    target_type,
                    target_pk,
                },
                records: Vec::new(),
                link_records: vec![link_record],
            })
        }
        Command::ClearRelation {
            relation,
            source_type,
            source_pk,
        } => {
            let target_type: String =
                validate_relation_tracked(registry, &source_type, &relation)?
                    .target
                    .clone();

            // One removal record per currently linked target, computed
            // from the membership as it stood before the clear.
            let link_records: Vec<LinkRecord> = live
                .linked_targets
                .iter()
                .map(|target_pk| {
                    link_record(
                        &relation,
                        &source_type,
                        source_pk,
                        &target_type,
                        *target_pk,
                        LinkChangeKind::Removed,
                        actor.clone(),
                        captured_at,
                    )
                })
                .collect();

            Ok(TransitionResult {
                effect: LiveEffect::ClearRelation {
                    relation,
                    source_type,
                    source_pk,
                },
                records: Vec::new(),
                link_records,
            })
        }
    }
}

/// Copies an entity into an unpersisted historical record.
fn snapshot_record(
    schema: &EntitySchema,
    entity: &Entity,
    change_kind: ChangeKind,
    actor: Option<Actor>,
    captured_at: &str,
) -> Result<HistoricalRecord, HistoryError> {
    let pk: i64 = entity.primary_key(schema)?;
    let values: BTreeMap<String, FieldValue> = copy_field_values(schema, entity)?;
    Ok(HistoricalRecord::new(
        captured_at.to_string(),
        change_kind,
        actor,
        schema.entity_type().to_string(),
        pk,
        values,
    ))
}

#[allow(clippy::too_many_arguments)]
fn link_record(
    relation: &str,
    source_type: &str,
    source_pk: i64,
    target_type: &str,
    target_pk: i64,
    change_kind: LinkChangeKind,
    actor: Option<Actor>,
    captured_at: &str,
) -> LinkRecord {
    LinkRecord {
        record_id: None,
        history_date: captured_at.to_string(),
        change_kind,
        changed_by: actor,
        relation: relation.to_string(),
        source_type: source_type.to_string(),
        source_pk,
        target_type: target_type.to_string(),
        target_pk,
    }
}
