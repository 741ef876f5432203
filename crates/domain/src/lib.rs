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

mod error;
mod mirror;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use mirror::{HistoricalColumn, copy_field_values, mirrored_columns, mirrored_field_name};
pub use types::{Entity, EntitySchema, FieldDef, FieldKind, FieldValue, RelationDef, SchemaRegistry};
pub use validation::{validate_entity, validate_schema};
