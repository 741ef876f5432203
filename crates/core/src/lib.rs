// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod capture;
mod command;
mod error;
mod materialize;
mod state;
mod view;

#[cfg(test)]
mod tests;

use retrace_domain::{DomainError, RelationDef, SchemaRegistry};

// Re-export public types and functions
pub use capture::apply;
pub use command::Command;
pub use error::HistoryError;
pub use materialize::{as_of, entity_from_record, link_membership_as_of, most_recent};
pub use state::{LiveContext, LiveEffect, TransitionResult};
pub use view::{AsOfView, FieldAccess, RelationResolver};

/// Validates that an entity type is tracked by the registry.
///
/// This is a read-only validation that produces no records.
///
/// # Errors
///
/// Returns `DomainError::UnknownEntityType` if no schema is registered.
pub fn validate_tracked(registry: &SchemaRegistry, entity_type: &str) -> Result<(), DomainError> {
    registry.schema(entity_type).map(|_| ())
}

/// Validates that a relation is tracked on an entity type and returns its
/// definition.
///
/// # Errors
///
/// Returns an error if the entity type is not registered or the relation
/// is not opted into history tracking.
pub fn validate_relation_tracked<'a>(
    registry: &'a SchemaRegistry,
    entity_type: &str,
    relation: &str,
) -> Result<&'a RelationDef, DomainError> {
    let schema = registry.schema(entity_type)?;
    schema
        .relation(relation)
        .ok_or_else(|| DomainError::UnknownRelation {
            entity_type: entity_type.to_string(),
            relation: relation.to_string(),
        })
}
