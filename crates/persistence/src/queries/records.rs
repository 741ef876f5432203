// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Historical and link record selection.
//!
//! The as-of queries select with `history_date <= t` on the fixed-width
//! timestamp text and order by `(history_date, history_id)` — the total
//! order the record store guarantees per instance. The query shape is
//! built per call; no shared query infrastructure is patched.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use retrace_history::{ChangeKind, HistoricalRecord, LinkChangeKind, LinkRecord};
use tracing::debug;

use crate::data_models::{actor_from_json, fields_from_json};
use crate::diesel_schema::{historical_records, link_records};
use crate::error::PersistenceError;

/// Diesel Queryable struct for historical record rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = historical_records)]
struct HistoricalRecordRow {
    history_id: i64,
    entity_type: String,
    entity_pk: i64,
    history_date: String,
    history_type: String,
    changed_by_json: Option<String>,
    fields_json: String,
}

impl HistoricalRecordRow {
    fn into_record(self) -> Result<HistoricalRecord, PersistenceError> {
        let change_kind: ChangeKind = ChangeKind::parse(&self.history_type)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        Ok(HistoricalRecord {
            history_id: Some(self.history_id),
            history_date: self.history_date,
            change_kind,
            changed_by: actor_from_json(self.changed_by_json.as_deref())?,
            entity_type: self.entity_type,
            entity_pk: self.entity_pk,
            values: fields_from_json(&self.fields_json)?,
        })
    }
}

/// Diesel Queryable struct for link record rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = link_records)]
struct LinkRecordRow {
    link_record_id: i64,
    relation: String,
    source_type: String,
    source_pk: i64,
    target_type: String,
    target_pk: i64,
    history_date: String,
    history_type: String,
    changed_by_json: Option<String>,
}

impl LinkRecordRow {
    fn into_record(self) -> Result<LinkRecord, PersistenceError> {
        let change_kind: LinkChangeKind = LinkChangeKind::parse(&self.history_type)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        Ok(LinkRecord {
            record_id: Some(self.link_record_id),
            history_date: self.history_date,
            change_kind,
            changed_by: actor_from_json(self.changed_by_json.as_deref())?,
            relation: self.relation,
            source_type: self.source_type,
            source_pk: self.source_pk,
            target_type: self.target_type,
            target_pk: self.target_pk,
        })
    }
}

backend_fn! {
/// Retrieves all records for one instance, newest first.
///
/// # Errors
///
/// Returns an error if rows cannot be loaded or deserialized.
pub fn instance_history(
    conn: &mut _,
    entity_type: &str,
    pk: i64,
) -> Result<Vec<HistoricalRecord>, PersistenceError> {
    let rows = historical_records::table
        .filter(historical_records::entity_type.eq(entity_type))
        .filter(historical_records::entity_pk.eq(pk))
        .order((
            historical_records::history_date.desc(),
            historical_records::history_id.desc(),
        ))
        .select(HistoricalRecordRow::as_select())
        .load::<HistoricalRecordRow>(conn)?;

    rows.into_iter().map(HistoricalRecordRow::into_record).collect()
}
}

backend_fn! {
/// Retrieves all records across all instances of a type, newest first.
///
/// # Errors
///
/// Returns an error if rows cannot be loaded or deserialized.
pub fn type_history(
    conn: &mut _,
    entity_type: &str,
) -> Result<Vec<HistoricalRecord>, PersistenceError> {
    debug!(entity_type, "Retrieving type-wide history");

    let rows = historical_records::table
        .filter(historical_records::entity_type.eq(entity_type))
        .order((
            historical_records::history_date.desc(),
            historical_records::history_id.desc(),
        ))
        .select(HistoricalRecordRow::as_select())
        .load::<HistoricalRecordRow>(conn)?;

    rows.into_iter().map(HistoricalRecordRow::into_record).collect()
}
}

backend_fn! {
/// Retrieves the single most recent record for one instance.
///
/// # Errors
///
/// Returns an error if the row cannot be loaded or deserialized.
pub fn newest_record(
    conn: &mut _,
    entity_type: &str,
    pk: i64,
) -> Result<Option<HistoricalRecord>, PersistenceError> {
    let row: Option<HistoricalRecordRow> = historical_records::table
        .filter(historical_records::entity_type.eq(entity_type))
        .filter(historical_records::entity_pk.eq(pk))
        .order((
            historical_records::history_date.desc(),
            historical_records::history_id.desc(),
        ))
        .select(HistoricalRecordRow::as_select())
        .first::<HistoricalRecordRow>(conn)
        .optional()?;

    row.map(HistoricalRecordRow::into_record).transpose()
}
}

backend_fn! {
/// Retrieves the most recent record at or before a timestamp.
///
/// # Errors
///
/// Returns an error if the row cannot be loaded or deserialized.
pub fn newest_record_at_or_before(
    conn: &mut _,
    entity_type: &str,
    pk: i64,
    timestamp: &str,
) -> Result<Option<HistoricalRecord>, PersistenceError> {
    let row: Option<HistoricalRecordRow> = historical_records::table
        .filter(historical_records::entity_type.eq(entity_type))
        .filter(historical_records::entity_pk.eq(pk))
        .filter(historical_records::history_date.le(timestamp))
        .order((
            historical_records::history_date.desc(),
            historical_records::history_id.desc(),
        ))
        .select(HistoricalRecordRow::as_select())
        .first::<HistoricalRecordRow>(conn)
        .optional()?;

    row.map(HistoricalRecordRow::into_record).transpose()
}
}

backend_fn! {
/// Retrieves a record by its `history_id`, for record-addressed
/// workflows such as UI-driven reverts.
///
/// # Errors
///
/// Returns `RecordNotFound` if no such record exists.
pub fn get_record(
    conn: &mut _,
    history_id: i64,
) -> Result<HistoricalRecord, PersistenceError> {
    let row: Option<HistoricalRecordRow> = historical_records::table
        .filter(historical_records::history_id.eq(history_id))
        .select(HistoricalRecordRow::as_select())
        .first::<HistoricalRecordRow>(conn)
        .optional()?;

    row.map_or(
        Err(PersistenceError::RecordNotFound(history_id)),
        HistoricalRecordRow::into_record,
    )
}
}

backend_fn! {
/// Retrieves all link records of one `(relation, source)` pair, newest
/// first.
///
/// # Errors
///
/// Returns an error if rows cannot be loaded or deserialized.
pub fn link_history(
    conn: &mut _,
    relation: &str,
    source_type: &str,
    source_pk: i64,
) -> Result<Vec<LinkRecord>, PersistenceError> {
    let rows = link_records::table
        .filter(link_records::relation.eq(relation))
        .filter(link_records::source_type.eq(source_type))
        .filter(link_records::source_pk.eq(source_pk))
        .order((
            link_records::history_date.desc(),
            link_records::link_record_id.desc(),
        ))
        .select(LinkRecordRow::as_select())
        .load::<LinkRecordRow>(conn)?;

    rows.into_iter().map(LinkRecordRow::into_record).collect()
}
}

backend_fn! {
/// Retrieves the link records of one `(relation, source)` pair at or
/// before a timestamp, oldest first — the input order the membership
/// fold expects.
///
/// # Errors
///
/// Returns an error if rows cannot be loaded or deserialized.
pub fn link_records_at_or_before(
    conn: &mut _,
    relation: &str,
    source_type: &str,
    source_pk: i64,
    timestamp: &str,
) -> Result<Vec<LinkRecord>, PersistenceError> {
    let rows = link_records::table
        .filter(link_records::relation.eq(relation))
        .filter(link_records::source_type.eq(source_type))
        .filter(link_records::source_pk.eq(source_pk))
        .filter(link_records::history_date.le(timestamp))
        .order((
            link_records::history_date.asc(),
            link_records::link_record_id.asc(),
        ))
        .select(LinkRecordRow::as_select())
        .load::<LinkRecordRow>(conn)?;

    rows.into_iter().map(LinkRecordRow::into_record).collect()
}
}
