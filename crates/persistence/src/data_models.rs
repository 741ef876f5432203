// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use retrace_domain::FieldValue;
use retrace_history::Actor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable representation of an Actor for the `changed_by_json`
/// columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializes an optional actor for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn actor_to_json(actor: Option<&Actor>) -> Result<Option<String>, PersistenceError> {
    actor
        .map(|actor| {
            let data: ActorData = ActorData {
                id: actor.id.clone(),
                actor_type: actor.actor_type.clone(),
            };
            Ok(serde_json::to_string(&data)?)
        })
        .transpose()
}

/// Deserializes an optional stored actor.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn actor_from_json(json: Option<&str>) -> Result<Option<Actor>, PersistenceError> {
    json.map(|json| {
        let data: ActorData = serde_json::from_str(json)?;
        Ok(Actor::new(data.id, data.actor_type))
    })
    .transpose()
}

/// Serializes a field-value map for a `fields_json` column.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn fields_to_json(values: &BTreeMap<String, FieldValue>) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(values)?)
}

/// Deserializes a stored field-value map.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn fields_from_json(json: &str) -> Result<BTreeMap<String, FieldValue>, PersistenceError> {
    Ok(serde_json::from_str(json)?)
}
