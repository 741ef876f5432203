// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use retrace_domain::Entity;
use retrace_history::{HistoricalRecord, LinkRecord};

/// The slice of live state that change capture must read *before* the
/// mutation takes effect.
///
/// Capture is a pure function; whoever executes commands loads this
/// context from the live store first. `entity_before` feeds the
/// pre-deletion snapshot and the existence checks; `linked_targets` is
/// the pre-removal membership that relation-clearing records are
/// computed from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveContext {
    /// The instance's current live state, if it exists.
    pub entity_before: Option<Entity>,
    /// The currently linked target identifiers of the addressed relation.
    pub linked_targets: Vec<i64>,
}

impl LiveContext {
    /// A context with no live state (for creations).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entity_before: None,
            linked_targets: Vec::new(),
        }
    }

    /// A context carrying the instance's current state.
    #[must_use]
    pub const fn for_entity(entity_before: Option<Entity>) -> Self {
        Self {
            entity_before,
            linked_targets: Vec::new(),
        }
    }

    /// A context carrying the current membership of one relation.
    #[must_use]
    pub const fn for_links(linked_targets: Vec<i64>) -> Self {
        Self {
            entity_before: None,
            linked_targets,
        }
    }
}

/// The canonical mutation a successful capture asks the live store to
/// perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEffect {
    /// Insert or replace the instance's live row.
    UpsertEntity {
        /// The full field values to store.
        entity: Entity,
        /// The instance identifier.
        pk: i64,
    },
    /// Remove the instance's live row.
    DeleteEntity {
        /// The tracked entity type.
        entity_type: String,
        /// The instance identifier.
        pk: i64,
    },
    /// Insert one live link row.
    AddLink {
        /// The tracked relation name.
        relation: String,
        /// The source entity type.
        source_type: String,
        /// The source instance identifier.
        source_pk: i64,
        /// The target entity type.
        target_type: String,
        /// The target instance identifier.
        target_pk: i64,
    },
    /// Remove one live link row.
    RemoveLink {
        /// The tracked relation name.
        relation: String,
        /// The source entity type.
        source_type: String,
        /// The source instance identifier.
        source_pk: i64,
        /// The target entity type.
        target_type: String,
        /// The target instance identifier.
        target_pk: i64,
    },
    /// Remove every live link row of one relation for one source.
    ClearRelation {
        /// The tracked relation name.
        relation: String,
        /// The source entity type.
        source_type: String,
        /// The source instance identifier.
        source_pk: i64,
    },
}

/// The result of a successful change capture.
///
/// Transitions are atomic: the live effect and every record here are
/// applied in the same unit of work, or not at all. The history log
/// never falls behind the live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The canonical mutation to perform.
    pub effect: LiveEffect,
    /// Entity-level records to append.
    pub records: Vec<HistoricalRecord>,
    /// Relation-link records to append.
    pub link_records: Vec<LinkRecord>,
}
