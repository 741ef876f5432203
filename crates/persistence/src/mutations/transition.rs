// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Atomic transition orchestration.
//!
//! A captured transition is one unit of work: the canonical live
//! mutation and every record append run inside a single transaction.
//! If any append fails, the whole mutation rolls back — the history log
//! never falls behind the live state, and a gap in history is treated as
//! a failed write, not a warning.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use retrace::{LiveEffect, TransitionResult};
use tracing::info;

use crate::data_models::fields_to_json;
use crate::error::PersistenceError;
use crate::mutations::entities::{
    clear_links_mysql, clear_links_sqlite, delete_entity_mysql, delete_entity_sqlite,
    delete_link_mysql, delete_link_sqlite, insert_link_mysql, insert_link_sqlite,
    upsert_entity_mysql, upsert_entity_sqlite,
};
use crate::mutations::records::{
    append_link_record_mysql, append_link_record_sqlite, append_record_mysql,
    append_record_sqlite,
};

/// The ids assigned to the records appended by one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// Assigned `history_id`s, in append order.
    pub history_ids: Vec<i64>,
    /// Assigned link record ids, in append order.
    pub link_record_ids: Vec<i64>,
}

/// Persists a captured transition atomically (`SQLite` version).
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The capture result to persist
///
/// # Errors
///
/// Returns an error if any write fails; the transaction is rolled back
/// and neither the live mutation nor any record survives.
pub fn persist_transition_sqlite(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction::<TransitionOutcome, PersistenceError, _>(|conn| {
        apply_effect_sqlite(conn, &result.effect)?;

        let mut history_ids: Vec<i64> = Vec::with_capacity(result.records.len());
        for record in &result.records {
            history_ids.push(append_record_sqlite(conn, record)?);
        }

        let mut link_record_ids: Vec<i64> = Vec::with_capacity(result.link_records.len());
        for record in &result.link_records {
            link_record_ids.push(append_link_record_sqlite(conn, record)?);
        }

        info!(
            record_count = history_ids.len(),
            link_record_count = link_record_ids.len(),
            "Persisted transition"
        );

        Ok(TransitionOutcome {
            history_ids,
            link_record_ids,
        })
    })
}

/// Persists a captured transition atomically (`MySQL` version).
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The capture result to persist
///
/// # Errors
///
/// Returns an error if any write fails; the transaction is rolled back
/// and neither the live mutation nor any record survives.
pub fn persist_transition_mysql(
    conn: &mut MysqlConnection,
    result: &TransitionResult,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction::<TransitionOutcome, PersistenceError, _>(|conn| {
        apply_effect_mysql(conn, &result.effect)?;

        let mut history_ids: Vec<i64> = Vec::with_capacity(result.records.len());
        for record in &result.records {
            history_ids.push(append_record_mysql(conn, record)?);
        }

        let mut link_record_ids: Vec<i64> = Vec::with_capacity(result.link_records.len());
        for record in &result.link_records {
            link_record_ids.push(append_link_record_mysql(conn, record)?);
        }

        info!(
            record_count = history_ids.len(),
            link_record_count = link_record_ids.len(),
            "Persisted transition"
        );

        Ok(TransitionOutcome {
            history_ids,
            link_record_ids,
        })
    })
}

/// Applies the canonical live mutation (`SQLite` version).
fn apply_effect_sqlite(
    conn: &mut SqliteConnection,
    effect: &LiveEffect,
) -> Result<(), PersistenceError> {
    match effect {
        LiveEffect::UpsertEntity { entity, pk } => {
            let fields_json: String = fields_to_json(entity.values())?;
            upsert_entity_sqlite(conn, entity.entity_type(), *pk, &fields_json)
        }
        LiveEffect::DeleteEntity { entity_type, pk } => {
            delete_entity_sqlite(conn, entity_type, *pk)
        }
        LiveEffect::AddLink {
            relation,
            source_type,
            source_pk,
            target_type,
            target_pk,
        } => insert_link_sqlite(
            conn,
            relation,
            source_type,
            *source_pk,
            target_type,
            *target_pk,
        ),
        LiveEffect::RemoveLink {
            relation,
            source_type,
            source_pk,
            target_pk,
            ..
        } => delete_link_sqlite(conn, relation, source_type, *source_pk, *target_pk),
        LiveEffect::ClearRelation {
            relation,
            source_type,
            source_pk,
        } => clear_links_sqlite(conn, relation, source_type, *source_pk),
    }
}

/// Applies the canonical live mutation (`MySQL` version).
fn apply_effect_mysql(
    conn: &mut MysqlConnection,
    effect: &LiveEffect,
) -> Result<(), PersistenceError> {
    match effect {
        LiveEffect::UpsertEntity { entity, pk } => {
            let fields_json: String = fields_to_json(entity.values())?;
            upsert_entity_mysql(conn, entity.entity_type(), *pk, &fields_json)
        }
        LiveEffect::DeleteEntity { entity_type, pk } => {
            delete_entity_mysql(conn, entity_type, *pk)
        }
        LiveEffect::AddLink {
            relation,
            source_type,
            source_pk,
            target_type,
            target_pk,
        } => insert_link_mysql(
            conn,
            relation,
            source_type,
            *source_pk,
            target_type,
            *target_pk,
        ),
        LiveEffect::RemoveLink {
            relation,
            source_type,
            source_pk,
            target_pk,
            ..
        } => delete_link_mysql(conn, relation, source_type, *source_pk, *target_pk),
        LiveEffect::ClearRelation {
            relation,
            source_type,
            source_pk,
        } => clear_links_mysql(conn, relation, source_type, *source_pk),
    }
}
