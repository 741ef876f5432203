// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use retrace_domain::DomainError;

/// Errors surfaced by change capture and snapshot materialization.
///
/// Capture failures are total: when any variant is returned, no records
/// have been produced and no live effect may be applied. A mutation whose
/// history cannot be captured fails as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// No historical record exists for the instance at or before the
    /// requested time, or no record at all for `most_recent`.
    NotFound {
        /// The tracked entity type.
        entity_type: String,
        /// The instance identifier.
        pk: i64,
    },
    /// The requested timestamp falls at or after the instance's deletion
    /// record. Distinct from `NotFound` so callers can say "this was
    /// deleted" rather than "this never existed".
    AlreadyDeleted {
        /// The tracked entity type.
        entity_type: String,
        /// The instance identifier.
        pk: i64,
        /// When the deletion was recorded.
        deleted_at: String,
    },
    /// An instance-scoped operation was invoked without a concrete
    /// instance context. Rejected immediately; no partial work.
    PreconditionViolation {
        /// The operation that was attempted.
        operation: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A create was requested for an instance that already exists.
    AlreadyExists {
        /// The tracked entity type.
        entity_type: String,
        /// The instance identifier.
        pk: i64,
    },
    /// A link add was requested for an already-linked pair.
    AlreadyLinked {
        /// The tracked relation name.
        relation: String,
        /// The source instance identifier.
        source_pk: i64,
        /// The target instance identifier.
        target_pk: i64,
    },
    /// A link removal was requested for a pair that is not linked.
    NotLinked {
        /// The tracked relation name.
        relation: String,
        /// The source instance identifier.
        source_pk: i64,
        /// The target instance identifier.
        target_pk: i64,
    },
    /// A schema or entity rule was violated.
    DomainViolation(DomainError),
    /// The record store failed.
    Storage(String),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity_type, pk } => {
                write!(f, "{entity_type}#{pk} has no historical record")
            }
            Self::AlreadyDeleted {
                entity_type,
                pk,
                deleted_at,
            } => {
                write!(f, "{entity_type}#{pk} had already been deleted at {deleted_at}")
            }
            Self::PreconditionViolation { operation, reason } => {
                write!(f, "Cannot use {operation}: {reason}")
            }
            Self::AlreadyExists { entity_type, pk } => {
                write!(f, "{entity_type}#{pk} already exists")
            }
            Self::AlreadyLinked {
                relation,
                source_pk,
                target_pk,
            } => {
                write!(
                    f,
                    "Relation '{relation}' already links #{source_pk} to #{target_pk}"
                )
            }
            Self::NotLinked {
                relation,
                source_pk,
                target_pk,
            } => {
                write!(
                    f,
                    "Relation '{relation}' does not link #{source_pk} to #{target_pk}"
                )
            }
            Self::DomainViolation(err) => write!(f, "Domain rule violated: {err}"),
            Self::Storage(msg) => write!(f, "Record store failure: {msg}"),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for HistoryError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
