// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB backend validation.
//!
//! These tests are `#[ignore]`d and never run under plain `cargo test`.
//! `cargo xtask test-mariadb` provisions a `MariaDB` container, exports
//! `DATABASE_URL`, and runs them explicitly. They fail fast when the
//! infrastructure is missing rather than skipping silently.

use crate::Persistence;
use crate::tests::{
    T1, T1_5, T2, create_entity_at, create_test_registry, order_entity, update_entity_at,
};
use retrace_domain::{Entity, FieldValue, SchemaRegistry};
use retrace_history::{ChangeKind, HistoricalRecord, HistoryScope};

fn mysql_persistence() -> Persistence {
    let database_url: String =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for backend validation");
    Persistence::new_with_mysql(&database_url).expect("MariaDB must be reachable")
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mysql_capture_and_query_round_trip() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = mysql_persistence();

    create_entity_at(&mut persistence, &registry, order_entity(901, "new", None), T1);

    let records: Vec<HistoricalRecord> = persistence
        .history(&HistoryScope::for_instance("Order", 901))
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].change_kind, ChangeKind::Created);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mysql_as_of_reconstruction() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = mysql_persistence();

    create_entity_at(&mut persistence, &registry, order_entity(902, "new", None), T1);
    update_entity_at(&mut persistence, &registry, order_entity(902, "shipped", None), T2);

    let snapshot: Entity = persistence
        .as_of(&registry, &HistoryScope::for_instance("Order", 902), T1_5)
        .unwrap();
    assert_eq!(
        snapshot.value("status"),
        Some(&FieldValue::Text(String::from("new")))
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mysql_foreign_key_enforcement_is_active() {
    let mut persistence: Persistence = mysql_persistence();
    persistence.verify_foreign_key_enforcement().unwrap();
}
