// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use retrace_domain::Entity;

/// A command represents mutation intent as data only.
///
/// Commands are the only way to request a tracked mutation; the capture
/// component turns each one into a live effect plus the historical
/// records it must append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bring a new instance into existence.
    CreateEntity {
        /// The full field values of the new instance.
        entity: Entity,
    },
    /// Replace an existing instance's field values.
    UpdateEntity {
        /// The full field values after the update.
        entity: Entity,
        /// Whether to append a `Changed` record for this save.
        ///
        /// `false` is the administrative-correction escape hatch: the
        /// save happens without a history record. It must be requested
        /// explicitly on every call; there is no standing mode.
        record_history: bool,
    },
    /// Remove an instance.
    DeleteEntity {
        /// The tracked entity type.
        entity_type: String,
        /// The instance identifier.
        pk: i64,
    },
    /// Add a link on a tracked many-to-many relation.
    AddLink {
        /// The tracked relation name.
        relation: String,
        /// The source entity type.
        source_type: String,
        /// The source instance identifier.
        source_pk: i64,
        /// The target instance identifier.
        target_pk: i64,
    },
    /// Remove a link on a tracked many-to-many relation.
    RemoveLink {
        /// The tracked relation name.
        relation: String,
        /// The source entity type.
        source_type: String,
        /// The source instance identifier.
        source_pk: i64,
        /// The target instance identifier.
        target_pk: i64,
    },
    /// Remove every link of a tracked relation for one source instance.
    ClearRelation {
        /// The tracked relation name.
        relation: String,
        /// The source entity type.
        source_type: String,
        /// The source instance identifier.
        source_pk: i64,
    },
}
