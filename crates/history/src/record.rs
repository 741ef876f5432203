// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use retrace_domain::FieldValue;
use std::collections::BTreeMap;

/// The entity performing a tracked mutation.
///
/// An actor is any identifiable entity that initiates a change: a user,
/// a system process, or an automated trigger. Mutations without an actor
/// context record no actor at all, never a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "user", "system", "scheduler").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// The kind of an entity-level state transition.
///
/// Stored as single-character codes in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The instance came into existence.
    Created,
    /// The instance's field values changed.
    Changed,
    /// The instance was removed.
    Deleted,
}

impl ChangeKind {
    /// The storage code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Created => "+",
            Self::Changed => "~",
            Self::Deleted => "-",
        }
    }

    /// Parses a storage code.
    ///
    /// # Errors
    ///
    /// Returns an error for codes that are not `+`, `~`, or `-`.
    pub fn parse(code: &str) -> Result<Self, RecordParseError> {
        match code {
            "+" => Ok(Self::Created),
            "~" => Ok(Self::Changed),
            "-" => Ok(Self::Deleted),
            other => Err(RecordParseError::InvalidChangeKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Changed => write!(f, "changed"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// The kind of a relation-link transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChangeKind {
    /// The link between source and target was added.
    Added,
    /// The link between source and target was removed.
    Removed,
}

impl LinkChangeKind {
    /// The storage code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Added => "+",
            Self::Removed => "-",
        }
    }

    /// Parses a storage code.
    ///
    /// # Errors
    ///
    /// Returns an error for codes that are not `+` or `-`.
    pub fn parse(code: &str) -> Result<Self, RecordParseError> {
        match code {
            "+" => Ok(Self::Added),
            "-" => Ok(Self::Removed),
            other => Err(RecordParseError::InvalidLinkChangeKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for LinkChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Failures parsing persisted record codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    /// A persisted `history_type` code was not a valid entity change kind.
    InvalidChangeKind(String),
    /// A persisted link `history_type` code was not a valid link change kind.
    InvalidLinkChangeKind(String),
}

impl std::fmt::Display for RecordParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidChangeKind(code) => {
                write!(f, "Invalid change kind code '{code}'")
            }
            Self::InvalidLinkChangeKind(code) => {
                write!(f, "Invalid link change kind code '{code}'")
            }
        }
    }
}

impl std::error::Error for RecordParseError {}

/// One immutable snapshot of a tracked entity's field values at a point
/// in time, tagged with a change kind.
///
/// A record is created exactly once, at capture time, and is never
/// mutated or deleted afterwards. `history_id` is assigned by the record
/// store on append; it is `None` only on records that have not been
/// persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalRecord {
    /// Monotonically increasing store-assigned identifier. Total-order
    /// tie-breaker for records sharing a `history_date`.
    pub history_id: Option<i64>,
    /// Capture timestamp, fixed-width sortable UTC text.
    pub history_date: String,
    /// What happened to the instance.
    pub change_kind: ChangeKind,
    /// Who performed the mutation, when known.
    pub changed_by: Option<Actor>,
    /// The tracked entity type.
    pub entity_type: String,
    /// The instance identifier.
    pub entity_pk: i64,
    /// The full copy of the entity's field values as they existed at
    /// capture, foreign keys held as raw identifiers under their
    /// mirrored `<field>_id` names.
    pub values: BTreeMap<String, FieldValue>,
}

impl HistoricalRecord {
    /// Creates an unpersisted record.
    #[must_use]
    pub const fn new(
        history_date: String,
        change_kind: ChangeKind,
        changed_by: Option<Actor>,
        entity_type: String,
        entity_pk: i64,
        values: BTreeMap<String, FieldValue>,
    ) -> Self {
        Self {
            history_id: None,
            history_date,
            change_kind,
            changed_by,
            entity_type,
            entity_pk,
            values,
        }
    }
}

/// One immutable link-membership transition on a tracked many-to-many
/// relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Store-assigned identifier; `None` until persisted.
    pub record_id: Option<i64>,
    /// Capture timestamp, fixed-width sortable UTC text.
    pub history_date: String,
    /// Whether the link was added or removed.
    pub change_kind: LinkChangeKind,
    /// Who performed the mutation, when known.
    pub changed_by: Option<Actor>,
    /// The tracked relation name.
    pub relation: String,
    /// The source entity type.
    pub source_type: String,
    /// The source instance identifier.
    pub source_pk: i64,
    /// The target entity type.
    pub target_type: String,
    /// The target instance identifier.
    pub target_pk: i64,
}

/// Sorts records newest first by `(history_date, history_id)`.
///
/// This is the listing default everywhere records are presented. The
/// ordering is stable even when several records share a timestamp: the
/// store-assigned `history_id` breaks the tie, and unpersisted records
/// (no id yet) sort after persisted ones at the same instant.
pub fn sort_newest_first(records: &mut [HistoricalRecord]) {
    records.sort_by(|a, b| {
        (b.history_date.as_str(), b.history_id).cmp(&(a.history_date.as_str(), a.history_id))
    });
}
