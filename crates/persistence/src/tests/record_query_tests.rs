// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::Persistence;
use crate::tests::{
    T1, T2, T3, create_entity_at, create_test_registry, order_entity, update_entity_at,
};
use retrace_domain::SchemaRegistry;
use retrace_history::{ChangeKind, HistoricalRecord, HistoryScope};

#[test]
fn test_instance_history_is_newest_first() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    create_entity_at(&mut persistence, &registry, order_entity(1, "new", None), T1);
    update_entity_at(&mut persistence, &registry, order_entity(1, "paid", None), T2);
    update_entity_at(&mut persistence, &registry, order_entity(1, "shipped", None), T3);

    let records: Vec<HistoricalRecord> = persistence
        .history(&HistoryScope::for_instance("Order", 1))
        .unwrap();
    let dates: Vec<&str> = records.iter().map(|r| r.history_date.as_str()).collect();
    assert_eq!(dates, vec![T3, T2, T1]);
}

#[test]
fn test_same_timestamp_records_order_by_history_id() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    create_entity_at(&mut persistence, &registry, order_entity(1, "new", None), T1);
    // Two updates captured at the identical instant: the storage-assigned
    // history_id is the only thing keeping them ordered.
    update_entity_at(&mut persistence, &registry, order_entity(1, "paid", None), T2);
    update_entity_at(&mut persistence, &registry, order_entity(1, "shipped", None), T2);

    let records: Vec<HistoricalRecord> = persistence
        .history(&HistoryScope::for_instance("Order", 1))
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].history_date, T2);
    assert_eq!(records[1].history_date, T2);
    assert!(records[0].history_id.unwrap() > records[1].history_id.unwrap());
    assert_eq!(
        records[0].values.get("status"),
        Some(&retrace_domain::FieldValue::Text(String::from("shipped")))
    );
}

#[test]
fn test_type_history_spans_instances_newest_first() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    create_entity_at(&mut persistence, &registry, order_entity(1, "new", None), T1);
    create_entity_at(&mut persistence, &registry, order_entity(2, "new", None), T2);
    update_entity_at(&mut persistence, &registry, order_entity(1, "shipped", None), T3);

    let records: Vec<HistoricalRecord> = persistence
        .history(&HistoryScope::for_type("Order"))
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].entity_pk, 1);
    assert_eq!(records[0].change_kind, ChangeKind::Changed);
    assert_eq!(records[1].entity_pk, 2);
    assert_eq!(records[2].entity_pk, 1);
}

#[test]
fn test_type_history_does_not_leak_other_types() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    create_entity_at(&mut persistence, &registry, order_entity(1, "new", None), T1);
    create_entity_at(
        &mut persistence,
        &registry,
        crate::tests::tag_entity(10, "urgent"),
        T1,
    );

    let records: Vec<HistoricalRecord> = persistence
        .history(&HistoryScope::for_type("Order"))
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| r.entity_type == "Order"));
}

#[test]
fn test_get_record_by_id_round_trips() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    create_entity_at(&mut persistence, &registry, order_entity(1, "new", None), T1);

    let records: Vec<HistoricalRecord> = persistence
        .history(&HistoryScope::for_instance("Order", 1))
        .unwrap();
    let history_id: i64 = records[0].history_id.unwrap();

    let fetched: HistoricalRecord = persistence.get_record(history_id).unwrap();
    assert_eq!(fetched, records[0]);
}

#[test]
fn test_get_record_of_unknown_id_fails() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<HistoricalRecord, PersistenceError> = persistence.get_record(12345);
    assert_eq!(
        result.unwrap_err(),
        PersistenceError::RecordNotFound(12345)
    );
}

#[test]
fn test_history_of_unknown_instance_is_empty() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let records: Vec<HistoricalRecord> = persistence
        .history(&HistoryScope::for_instance("Order", 42))
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_reads_do_not_mutate_the_store() {
    let registry: SchemaRegistry = create_test_registry();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    create_entity_at(&mut persistence, &registry, order_entity(1, "new", None), T1);
    let scope: HistoryScope = HistoryScope::for_instance("Order", 1);

    let before: Vec<HistoricalRecord> = persistence.history(&scope).unwrap();

    let _ = persistence.most_recent(&registry, &scope).unwrap();
    let _ = persistence.as_of(&registry, &scope, T2).unwrap();
    let _ = persistence.history(&scope).unwrap();

    let after: Vec<HistoricalRecord> = persistence.history(&scope).unwrap();
    assert_eq!(before, after);
}
