// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live entity and relation membership reads.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use retrace_domain::{Entity, RelationDef};
use retrace_history::LinkRecord;
use tracing::debug;

use crate::data_models::fields_from_json;
use crate::diesel_schema::{entities, links};
use crate::error::PersistenceError;
use crate::queries::records::{
    link_records_at_or_before_mysql, link_records_at_or_before_sqlite,
};

backend_fn! {
/// Retrieves one live entity, if it exists.
///
/// # Errors
///
/// Returns an error if the row cannot be loaded or deserialized.
pub fn current_entity(
    conn: &mut _,
    entity_type: &str,
    pk: i64,
) -> Result<Option<Entity>, PersistenceError> {
    let fields_json: Option<String> = entities::table
        .filter(entities::entity_type.eq(entity_type))
        .filter(entities::entity_pk.eq(pk))
        .select(entities::fields_json)
        .first::<String>(conn)
        .optional()?;

    fields_json
        .map(|json| Ok(Entity::new(entity_type, fields_from_json(&json)?)))
        .transpose()
}
}

backend_fn! {
/// Retrieves the currently linked target identifiers of one
/// `(relation, source)` pair, ascending.
///
/// # Errors
///
/// Returns an error if rows cannot be loaded.
pub fn linked_target_pks(
    conn: &mut _,
    relation: &str,
    source_type: &str,
    source_pk: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(links::table
        .filter(links::relation.eq(relation))
        .filter(links::source_type.eq(source_type))
        .filter(links::source_pk.eq(source_pk))
        .order(links::target_pk.asc())
        .select(links::target_pk)
        .load::<i64>(conn)?)
}
}

/// Retrieves the live target entities whose relation membership held at
/// a timestamp (`SQLite` version).
///
/// Membership comes from the link record log; the entities themselves
/// come from the live store. A target deleted since the timestamp has no
/// live row and is excluded — a documented limitation of the
/// reconstruction, not an error.
///
/// # Errors
///
/// Returns an error if rows cannot be loaded or deserialized.
pub fn live_linked_as_of_sqlite(
    conn: &mut SqliteConnection,
    relation: &RelationDef,
    source_type: &str,
    source_pk: i64,
    timestamp: &str,
) -> Result<Vec<Entity>, PersistenceError> {
    let records: Vec<LinkRecord> =
        link_records_at_or_before_sqlite(conn, &relation.name, source_type, source_pk, timestamp)?;
    let member_pks: Vec<i64> = retrace::link_membership_as_of(&records);

    let mut members: Vec<Entity> = Vec::with_capacity(member_pks.len());
    for pk in member_pks {
        if let Some(entity) = current_entity_sqlite(conn, &relation.target, pk)? {
            members.push(entity);
        }
    }

    debug!(
        relation = relation.name.as_str(),
        source_pk,
        timestamp,
        member_count = members.len(),
        "Resolved relation membership"
    );

    Ok(members)
}

/// Retrieves the live target entities whose relation membership held at
/// a timestamp (`MySQL` version).
///
/// Membership comes from the link record log; the entities themselves
/// come from the live store. A target deleted since the timestamp has no
/// live row and is excluded — a documented limitation of the
/// reconstruction, not an error.
///
/// # Errors
///
/// Returns an error if rows cannot be loaded or deserialized.
pub fn live_linked_as_of_mysql(
    conn: &mut MysqlConnection,
    relation: &RelationDef,
    source_type: &str,
    source_pk: i64,
    timestamp: &str,
) -> Result<Vec<Entity>, PersistenceError> {
    let records: Vec<LinkRecord> =
        link_records_at_or_before_mysql(conn, &relation.name, source_type, source_pk, timestamp)?;
    let member_pks: Vec<i64> = retrace::link_membership_as_of(&records);

    let mut members: Vec<Entity> = Vec::with_capacity(member_pks.len());
    for pk in member_pks {
        if let Some(entity) = current_entity_mysql(conn, &relation.target, pk)? {
            members.push(entity);
        }
    }

    debug!(
        relation = relation.name.as_str(),
        source_pk,
        timestamp,
        member_count = members.len(),
        "Resolved relation membership"
    );

    Ok(members)
}
