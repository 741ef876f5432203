// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical live entity and link mutations.
//!
//! These functions maintain the live side of the store. They are always
//! invoked inside the transaction opened by `persist_transition`, never
//! on their own, so the live state and the history log move together.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::diesel_schema;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts or replaces one live entity row.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_entity(
    conn: &mut _,
    entity_type: &str,
    entity_pk: i64,
    fields_json: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        diesel_schema::entities::table
            .filter(diesel_schema::entities::entity_type.eq(entity_type))
            .filter(diesel_schema::entities::entity_pk.eq(entity_pk)),
    )
    .set(diesel_schema::entities::fields_json.eq(fields_json))
    .execute(conn)?;

    if updated == 0 {
        diesel::insert_into(diesel_schema::entities::table)
            .values((
                diesel_schema::entities::entity_type.eq(entity_type),
                diesel_schema::entities::entity_pk.eq(entity_pk),
                diesel_schema::entities::fields_json.eq(fields_json),
            ))
            .execute(conn)?;
    }

    debug!(entity_type, entity_pk, "Upserted live entity");
    Ok(())
}
}

backend_fn! {
/// Removes one live entity row, along with any live link rows that
/// reference it as source or target.
///
/// The dangling links are removed without link records: the entity's own
/// deletion record is the history of this mutation, and the membership
/// log keeps its pre-deletion truth.
///
/// # Errors
///
/// Returns an error if a delete fails.
pub fn delete_entity(
    conn: &mut _,
    entity_type: &str,
    entity_pk: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(
        diesel_schema::entities::table
            .filter(diesel_schema::entities::entity_type.eq(entity_type))
            .filter(diesel_schema::entities::entity_pk.eq(entity_pk)),
    )
    .execute(conn)?;

    diesel::delete(
        diesel_schema::links::table
            .filter(diesel_schema::links::source_type.eq(entity_type))
            .filter(diesel_schema::links::source_pk.eq(entity_pk)),
    )
    .execute(conn)?;

    diesel::delete(
        diesel_schema::links::table
            .filter(diesel_schema::links::target_type.eq(entity_type))
            .filter(diesel_schema::links::target_pk.eq(entity_pk)),
    )
    .execute(conn)?;

    debug!(entity_type, entity_pk, "Deleted live entity");
    Ok(())
}
}

backend_fn! {
/// Inserts one live link row.
///
/// # Errors
///
/// Returns an error if the insert fails (including the unique-pair
/// constraint).
pub fn insert_link(
    conn: &mut _,
    relation: &str,
    source_type: &str,
    source_pk: i64,
    target_type: &str,
    target_pk: i64,
) -> Result<(), PersistenceError> {
    diesel::insert_into(diesel_schema::links::table)
        .values((
            diesel_schema::links::relation.eq(relation),
            diesel_schema::links::source_type.eq(source_type),
            diesel_schema::links::source_pk.eq(source_pk),
            diesel_schema::links::target_type.eq(target_type),
            diesel_schema::links::target_pk.eq(target_pk),
        ))
        .execute(conn)?;

    debug!(relation, source_pk, target_pk, "Inserted live link");
    Ok(())
}
}

backend_fn! {
/// Removes one live link row.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_link(
    conn: &mut _,
    relation: &str,
    source_type: &str,
    source_pk: i64,
    target_pk: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(
        diesel_schema::links::table
            .filter(diesel_schema::links::relation.eq(relation))
            .filter(diesel_schema::links::source_type.eq(source_type))
            .filter(diesel_schema::links::source_pk.eq(source_pk))
            .filter(diesel_schema::links::target_pk.eq(target_pk)),
    )
    .execute(conn)?;

    debug!(relation, source_pk, target_pk, "Deleted live link");
    Ok(())
}
}

backend_fn! {
/// Removes every live link row of one relation for one source instance.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn clear_links(
    conn: &mut _,
    relation: &str,
    source_type: &str,
    source_pk: i64,
) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(
        diesel_schema::links::table
            .filter(diesel_schema::links::relation.eq(relation))
            .filter(diesel_schema::links::source_type.eq(source_type))
            .filter(diesel_schema::links::source_pk.eq(source_pk)),
    )
    .execute(conn)?;

    debug!(relation, source_pk, removed, "Cleared live links");
    Ok(())
}
}
