// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod materialize_tests;

use retrace_domain::{Entity, EntitySchema, FieldDef, FieldValue, RelationDef, SchemaRegistry};
use retrace_history::Actor;
use std::collections::BTreeMap;

pub const T1: &str = "2026-03-01 09:00:00.000000";
pub const T2: &str = "2026-03-01 10:00:00.000000";

/// Registry with an `Order` referencing `Customer` (which references back
/// via `last_order`), an untracked-target `note` field, and a tracked
/// `tags` relation to `Tag`.
pub fn create_test_registry() -> SchemaRegistry {
    let mut registry: SchemaRegistry = SchemaRegistry::new();
    registry
        .register(EntitySchema::with_relations(
            "Order",
            vec![
                FieldDef::primary_key("id"),
                FieldDef::value("status"),
                FieldDef::foreign_key("customer", "Customer"),
                FieldDef::foreign_key("warehouse", "Warehouse"),
            ],
            vec![RelationDef::new("tags", "Tag")],
        ))
        .unwrap();
    registry
        .register(EntitySchema::new(
            "Customer",
            vec![
                FieldDef::primary_key("id"),
                FieldDef::value("name"),
                FieldDef::foreign_key("last_order", "Order"),
            ],
        ))
        .unwrap();
    registry
        .register(EntitySchema::new(
            "Tag",
            vec![FieldDef::primary_key("id"), FieldDef::value("label")],
        ))
        .unwrap();
    registry
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("system"))
}

pub fn order_entity(pk: i64, status: &str, customer: Option<i64>) -> Entity {
    let mut values: BTreeMap<String, FieldValue> = BTreeMap::new();
    values.insert(String::from("id"), FieldValue::Integer(pk));
    values.insert(String::from("status"), FieldValue::Text(status.to_string()));
    values.insert(
        String::from("customer"),
        customer.map_or(FieldValue::Null, FieldValue::Reference),
    );
    values.insert(String::from("warehouse"), FieldValue::Null);
    Entity::new("Order", values)
}

pub fn customer_entity(pk: i64, name: &str, last_order: Option<i64>) -> Entity {
    let mut values: BTreeMap<String, FieldValue> = BTreeMap::new();
    values.insert(String::from("id"), FieldValue::Integer(pk));
    values.insert(String::from("name"), FieldValue::Text(name.to_string()));
    values.insert(
        String::from("last_order"),
        last_order.map_or(FieldValue::Null, FieldValue::Reference),
    );
    Entity::new("Customer", values)
}

pub fn tag_entity(pk: i64, label: &str) -> Entity {
    let mut values: BTreeMap<String, FieldValue> = BTreeMap::new();
    values.insert(String::from("id"), FieldValue::Integer(pk));
    values.insert(String::from("label"), FieldValue::Text(label.to_string()));
    Entity::new("Tag", values)
}
