// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use crate::types::{Entity, EntitySchema, FieldDef, FieldValue, RelationDef};
use std::collections::BTreeMap;

/// Schema for a small order entity: integer primary key, a status text
/// field, a foreign key to `Customer`, and a tracked `tags` relation.
pub fn order_schema() -> EntitySchema {
    EntitySchema::with_relations(
        "Order",
        vec![
            FieldDef::primary_key("id"),
            FieldDef::value("status"),
            FieldDef::foreign_key("customer", "Customer"),
        ],
        vec![RelationDef::new("tags", "Tag")],
    )
}

pub fn customer_schema() -> EntitySchema {
    EntitySchema::new(
        "Customer",
        vec![FieldDef::primary_key("id"), FieldDef::value("name")],
    )
}

pub fn order_entity(pk: i64, status: &str, customer: Option<i64>) -> Entity {
    let mut values: BTreeMap<String, FieldValue> = BTreeMap::new();
    values.insert(String::from("id"), FieldValue::Integer(pk));
    values.insert(String::from("status"), FieldValue::Text(status.to_string()));
    values.insert(
        String::from("customer"),
        customer.map_or(FieldValue::Null, FieldValue::Reference),
    );
    Entity::new("Order", values)
}
