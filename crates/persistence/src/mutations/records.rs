// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appending historical and link records.
//!
//! Appends are the only writes the log ever sees. The store-assigned
//! auto-increment id is read back on the same connection and becomes the
//! record's `history_id` — the tie-breaker that keeps same-timestamp
//! records totally ordered.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use retrace_history::{HistoricalRecord, LinkRecord};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{actor_to_json, fields_to_json};
use crate::diesel_schema;
use crate::error::PersistenceError;

backend_fn! {
/// Appends one historical record and returns its assigned `history_id`.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails; nothing is
/// written in that case.
pub fn append_record(conn: &mut _, record: &HistoricalRecord) -> Result<i64, PersistenceError> {
    let changed_by_json: Option<String> = actor_to_json(record.changed_by.as_ref())?;
    let fields_json: String = fields_to_json(&record.values)?;

    diesel::insert_into(diesel_schema::historical_records::table)
        .values((
            diesel_schema::historical_records::entity_type.eq(&record.entity_type),
            diesel_schema::historical_records::entity_pk.eq(record.entity_pk),
            diesel_schema::historical_records::history_date.eq(&record.history_date),
            diesel_schema::historical_records::history_type.eq(record.change_kind.code()),
            diesel_schema::historical_records::changed_by_json.eq(changed_by_json),
            diesel_schema::historical_records::fields_json.eq(fields_json),
        ))
        .execute(conn)?;

    let history_id: i64 = conn.last_insert_id()?;

    debug!(
        history_id,
        entity_type = record.entity_type.as_str(),
        entity_pk = record.entity_pk,
        change_kind = %record.change_kind,
        "Appended historical record"
    );

    Ok(history_id)
}
}

backend_fn! {
/// Appends one link record and returns its assigned id.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails; nothing is
/// written in that case.
pub fn append_link_record(conn: &mut _, record: &LinkRecord) -> Result<i64, PersistenceError> {
    let changed_by_json: Option<String> = actor_to_json(record.changed_by.as_ref())?;

    diesel::insert_into(diesel_schema::link_records::table)
        .values((
            diesel_schema::link_records::relation.eq(&record.relation),
            diesel_schema::link_records::source_type.eq(&record.source_type),
            diesel_schema::link_records::source_pk.eq(record.source_pk),
            diesel_schema::link_records::target_type.eq(&record.target_type),
            diesel_schema::link_records::target_pk.eq(record.target_pk),
            diesel_schema::link_records::history_date.eq(&record.history_date),
            diesel_schema::link_records::history_type.eq(record.change_kind.code()),
            diesel_schema::link_records::changed_by_json.eq(changed_by_json),
        ))
        .execute(conn)?;

    let record_id: i64 = conn.last_insert_id()?;

    debug!(
        record_id,
        relation = record.relation.as_str(),
        source_pk = record.source_pk,
        target_pk = record.target_pk,
        change_kind = %record.change_kind,
        "Appended link record"
    );

    Ok(record_id)
}
}
