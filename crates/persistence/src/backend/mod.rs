// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Queries and mutations in this crate are backend-agnostic Diesel DSL.
//! What cannot be expressed that way lives here, and only here:
//!
//! - connection initialization and migration execution
//! - backend configuration (`PRAGMA` statements, engine checks)
//! - retrieving the auto-increment id of the last inserted row
//!
//! `SQLite` is the default backend for development and standard tests.
//! `MySQL`/`MariaDB` support is compiled in unconditionally and validated
//! via opt-in tests orchestrated by `cargo xtask test-mariadb`.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Backend operations with no backend-agnostic Diesel DSL equivalent.
///
/// Implemented for both connection types so that generated monomorphic
/// functions can share one body.
pub trait PersistenceBackend: Connection {
    /// Retrieves the auto-increment id assigned to the last inserted row.
    ///
    /// The record store relies on this id as the `(history_date,
    /// history_id)` tie-breaker, so it must come from the same
    /// connection that performed the insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// A startup-time check; the live `links` rows depend on it.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is not active.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError> {
        sqlite::last_insert_id(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError> {
        mysql::last_insert_id(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }
}
