// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::HistoryError;
use crate::materialize::{as_of, entity_from_record, link_membership_as_of, most_recent};
use crate::tests::{T1, T2, create_test_registry, order_entity};
use retrace_domain::{Entity, EntitySchema, FieldValue, SchemaRegistry, copy_field_values};
use retrace_history::{ChangeKind, HistoricalRecord, LinkChangeKind, LinkRecord};

fn order_record(
    registry: &SchemaRegistry,
    entity: &Entity,
    change_kind: ChangeKind,
    history_date: &str,
) -> HistoricalRecord {
    let schema: &EntitySchema = registry.schema("Order").unwrap();
    HistoricalRecord::new(
        history_date.to_string(),
        change_kind,
        None,
        String::from("Order"),
        entity.primary_key(schema).unwrap(),
        copy_field_values(schema, entity).unwrap(),
    )
}

fn link_record(target_pk: i64, change_kind: LinkChangeKind, history_date: &str) -> LinkRecord {
    LinkRecord {
        record_id: None,
        history_date: history_date.to_string(),
        change_kind,
        changed_by: None,
        relation: String::from("tags"),
        source_type: String::from("Order"),
        source_pk: 1,
        target_type: String::from("Tag"),
        target_pk,
    }
}

#[test]
fn test_reconstruction_maps_mirrored_columns_back_onto_fields() {
    let registry: SchemaRegistry = create_test_registry();
    let entity: Entity = order_entity(1, "new", Some(7));
    let record: HistoricalRecord = order_record(&registry, &entity, ChangeKind::Created, T1);

    let schema: &EntitySchema = registry.schema("Order").unwrap();
    let rebuilt: Entity = entity_from_record(schema, &record).unwrap();

    assert_eq!(rebuilt, entity);
    assert_eq!(rebuilt.value("customer"), Some(&FieldValue::Reference(7)));
}

#[test]
fn test_reconstruction_rejects_records_not_covering_the_schema() {
    let registry: SchemaRegistry = create_test_registry();
    let schema: &EntitySchema = registry.schema("Order").unwrap();
    let record: HistoricalRecord = HistoricalRecord::new(
        T1.to_string(),
        ChangeKind::Created,
        None,
        String::from("Order"),
        1,
        std::collections::BTreeMap::new(),
    );

    let result = entity_from_record(schema, &record);
    assert!(matches!(
        result.unwrap_err(),
        HistoryError::DomainViolation(retrace_domain::DomainError::MissingField { .. })
    ));
}

#[test]
fn test_most_recent_without_any_record_fails_not_found() {
    let registry: SchemaRegistry = create_test_registry();
    let schema: &EntitySchema = registry.schema("Order").unwrap();

    let result = most_recent(schema, 1, None);
    assert_eq!(
        result.unwrap_err(),
        HistoryError::NotFound {
            entity_type: String::from("Order"),
            pk: 1,
        }
    );
}

#[test]
fn test_most_recent_reconstructs_any_change_kind() {
    let registry: SchemaRegistry = create_test_registry();
    let schema: &EntitySchema = registry.schema("Order").unwrap();
    let entity: Entity = order_entity(1, "shipped", None);
    let record: HistoricalRecord = order_record(&registry, &entity, ChangeKind::Changed, T2);

    let rebuilt: Entity = most_recent(schema, 1, Some(&record)).unwrap();
    assert_eq!(rebuilt.value("status"), Some(&FieldValue::Text(String::from("shipped"))));
}

#[test]
fn test_as_of_without_candidate_fails_not_found() {
    let registry: SchemaRegistry = create_test_registry();
    let schema: &EntitySchema = registry.schema("Order").unwrap();

    let result = as_of(schema, 1, None);
    assert!(matches!(result.unwrap_err(), HistoryError::NotFound { .. }));
}

#[test]
fn test_as_of_over_deletion_record_fails_already_deleted() {
    let registry: SchemaRegistry = create_test_registry();
    let schema: &EntitySchema = registry.schema("Order").unwrap();
    let entity: Entity = order_entity(1, "shipped", None);
    let record: HistoricalRecord = order_record(&registry, &entity, ChangeKind::Deleted, T2);

    let result = as_of(schema, 1, Some(&record));
    assert_eq!(
        result.unwrap_err(),
        HistoryError::AlreadyDeleted {
            entity_type: String::from("Order"),
            pk: 1,
            deleted_at: T2.to_string(),
        }
    );
}

#[test]
fn test_as_of_reconstructs_the_candidate_values() {
    let registry: SchemaRegistry = create_test_registry();
    let schema: &EntitySchema = registry.schema("Order").unwrap();
    let entity: Entity = order_entity(1, "new", Some(3));
    let record: HistoricalRecord = order_record(&registry, &entity, ChangeKind::Created, T1);

    let rebuilt: Entity = as_of(schema, 1, Some(&record)).unwrap();
    assert_eq!(rebuilt, entity);
}

#[test]
fn test_membership_includes_targets_whose_latest_record_added_them() {
    let records: Vec<LinkRecord> = vec![
        link_record(10, LinkChangeKind::Added, T1),
        link_record(11, LinkChangeKind::Added, T1),
    ];

    assert_eq!(link_membership_as_of(&records), vec![10, 11]);
}

#[test]
fn test_membership_excludes_targets_removed_after_adding() {
    let records: Vec<LinkRecord> = vec![
        link_record(10, LinkChangeKind::Added, T1),
        link_record(10, LinkChangeKind::Removed, T2),
    ];

    assert!(link_membership_as_of(&records).is_empty());
}

#[test]
fn test_membership_includes_targets_relinked_after_removal() {
    let records: Vec<LinkRecord> = vec![
        link_record(10, LinkChangeKind::Added, T1),
        link_record(10, LinkChangeKind::Removed, T1),
        link_record(10, LinkChangeKind::Added, T2),
    ];

    assert_eq!(link_membership_as_of(&records), vec![10]);
}

#[test]
fn test_membership_of_no_records_is_empty() {
    assert!(link_membership_as_of(&[]).is_empty());
}
