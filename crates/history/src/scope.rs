// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// What a history query or materialization is addressed at.
///
/// A type-level scope covers every instance of a tracked entity type and
/// supports record browsing only. Instance-scoped operations
/// (`most_recent`, `as_of`, `as_of_related`) require an instance scope
/// and reject type-level scopes up front, before any work is performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryScope {
    /// All instances of an entity type.
    Type {
        /// The tracked entity type.
        entity_type: String,
    },
    /// One concrete instance.
    Instance {
        /// The tracked entity type.
        entity_type: String,
        /// The instance identifier.
        pk: i64,
    },
}

impl HistoryScope {
    /// Creates a type-level scope.
    #[must_use]
    pub fn for_type(entity_type: &str) -> Self {
        Self::Type {
            entity_type: entity_type.to_string(),
        }
    }

    /// Creates an instance scope.
    #[must_use]
    pub fn for_instance(entity_type: &str, pk: i64) -> Self {
        Self::Instance {
            entity_type: entity_type.to_string(),
            pk,
        }
    }

    /// The entity type this scope addresses.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        match self {
            Self::Type { entity_type } | Self::Instance { entity_type, .. } => entity_type,
        }
    }

    /// The instance identifier, if this is an instance scope.
    #[must_use]
    pub const fn pk(&self) -> Option<i64> {
        match self {
            Self::Type { .. } => None,
            Self::Instance { pk, .. } => Some(*pk),
        }
    }
}

impl std::fmt::Display for HistoryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type { entity_type } => write!(f, "{entity_type}"),
            Self::Instance { entity_type, pk } => write!(f, "{entity_type}#{pk}"),
        }
    }
}
