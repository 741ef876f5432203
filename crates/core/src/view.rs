// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The lazy as-of relation graph.
//!
//! `as_of_related` does not eagerly reconstruct an object graph. It
//! returns an [`AsOfView`]: the base as-of entity plus per-field
//! overrides that resolve only when the field is accessed, because the
//! graph may be large or cyclic. Termination on cycles comes from a memo
//! shared across the whole walk: every object is marked resolved
//! *before* its own relations are descended into, and a foreign key back
//! to an already-resolved object yields the raw identifier instead of
//! another view.

use crate::error::HistoryError;
use retrace_domain::{
    DomainError, Entity, EntitySchema, FieldKind, FieldValue, RelationDef, SchemaRegistry,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// The seam between the graph walk and the record store.
///
/// The store implements this; the view calls it lazily, once per
/// accessed relation.
pub trait RelationResolver {
    /// Reconstructs a tracked instance as of the walk's timestamp.
    ///
    /// # Errors
    ///
    /// Surfaces `NotFound`/`AlreadyDeleted` from the underlying as-of
    /// reconstruction, and storage failures.
    fn entity_as_of(&mut self, entity_type: &str, pk: i64, at: &str)
    -> Result<Entity, HistoryError>;

    /// Returns the live target entities whose relation membership held
    /// at the walk's timestamp.
    ///
    /// Targets deleted since the timestamp are excluded, not
    /// reconstructed historically.
    ///
    /// # Errors
    ///
    /// Surfaces storage failures.
    fn live_linked_as_of(
        &mut self,
        relation: &RelationDef,
        source_type: &str,
        source_pk: i64,
        at: &str,
    ) -> Result<Vec<Entity>, HistoryError>;
}

/// The result of accessing one field through an [`AsOfView`].
#[derive(Debug, Clone)]
pub enum FieldAccess {
    /// A plain value, a null reference, or a raw identifier that was not
    /// substituted (untracked target, or a cycle back to an
    /// already-resolved object).
    Value(FieldValue),
    /// A foreign key substituted with the target's own as-of view.
    Related(AsOfView),
}

impl FieldAccess {
    /// The plain value, if this access did not substitute a relation.
    #[must_use]
    pub const fn as_value(&self) -> Option<&FieldValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::Related(_) => None,
        }
    }

    /// The nested view, if this access substituted a relation.
    #[must_use]
    pub const fn as_related(&self) -> Option<&AsOfView> {
        match self {
            Self::Value(_) => None,
            Self::Related(view) => Some(view),
        }
    }
}

/// A reconstructed entity whose relation-valued fields resolve lazily,
/// at the same as-of timestamp, when accessed.
///
/// Non-relation fields pass through unchanged from the base as-of
/// reconstruction. Views are cheap to clone; clones share the walk's
/// memo and caches.
#[derive(Debug, Clone)]
pub struct AsOfView {
    registry: Rc<SchemaRegistry>,
    at: String,
    base: Entity,
    resolved: Rc<RefCell<HashSet<(String, i64)>>>,
    related: Rc<RefCell<HashMap<String, AsOfView>>>,
}

impl AsOfView {
    /// Creates the root view of an as-of graph walk.
    ///
    /// # Errors
    ///
    /// Returns an error if the base entity's type is not tracked or its
    /// primary key cannot be extracted.
    pub fn new(
        registry: Rc<SchemaRegistry>,
        at: &str,
        base: Entity,
    ) -> Result<Self, HistoryError> {
        Self::with_memo(registry, at, base, Rc::new(RefCell::new(HashSet::new())))
    }

    /// Creates a view sharing an existing walk's memo, marking the base
    /// object resolved before any of its relations are descended into.
    fn with_memo(
        registry: Rc<SchemaRegistry>,
        at: &str,
        base: Entity,
        resolved: Rc<RefCell<HashSet<(String, i64)>>>,
    ) -> Result<Self, HistoryError> {
        let schema: &EntitySchema = registry.schema(base.entity_type())?;
        let pk: i64 = base.primary_key(schema)?;
        resolved
            .borrow_mut()
            .insert((base.entity_type().to_string(), pk));
        Ok(Self {
            registry,
            at: at.to_string(),
            base,
            resolved,
            related: Rc::new(RefCell::new(HashMap::new())),
        })
    }

    /// The base as-of entity, with foreign keys as raw identifiers.
    #[must_use]
    pub const fn base(&self) -> &Entity {
        &self.base
    }

    /// The walk's as-of timestamp.
    #[must_use]
    pub fn as_of_date(&self) -> &str {
        &self.at
    }

    /// Accesses one field, substituting tracked foreign keys with the
    /// target's own as-of view.
    ///
    /// The substitution happens on first access and is cached; value
    /// fields, null references, and untracked targets pass through as
    /// plain values.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown fields, and surfaces
    /// `NotFound`/`AlreadyDeleted`/storage failures from resolving the
    /// target.
    pub fn field(
        &self,
        name: &str,
        resolver: &mut dyn RelationResolver,
    ) -> Result<FieldAccess, HistoryError> {
        let schema: &EntitySchema = self.registry.schema(self.base.entity_type())?;
        let field = schema
            .field(name)
            .ok_or_else(|| DomainError::UnknownField {
                entity_type: self.base.entity_type().to_string(),
                field: name.to_string(),
            })?;
        let value: FieldValue =
            self.base
                .value(name)
                .cloned()
                .ok_or_else(|| DomainError::MissingField {
                    entity_type: self.base.entity_type().to_string(),
                    field: name.to_string(),
                })?;

        let target: &str = match &field.kind {
            FieldKind::Value => return Ok(FieldAccess::Value(value)),
            FieldKind::ForeignKey { target } => target,
        };

        if let Some(view) = self.related.borrow().get(name) {
            return Ok(FieldAccess::Related(view.clone()));
        }

        let target_pk: i64 = match value {
            FieldValue::Reference(pk) => pk,
            FieldValue::Null => return Ok(FieldAccess::Value(FieldValue::Null)),
            other => {
                return Err(HistoryError::DomainViolation(
                    DomainError::FieldKindMismatch {
                        entity_type: self.base.entity_type().to_string(),
                        field: name.to_string(),
                        expected: "a raw reference or null",
                        actual: other.variant_name(),
                    },
                ));
            }
        };

        if !self.registry.is_tracked(target) {
            return Ok(FieldAccess::Value(FieldValue::Reference(target_pk)));
        }

        if self
            .resolved
            .borrow()
            .contains(&(target.to_string(), target_pk))
        {
            // Cycle guard: this object was already materialized somewhere
            // in the walk. Hand back the raw identifier.
            return Ok(FieldAccess::Value(FieldValue::Reference(target_pk)));
        }

        let entity: Entity = resolver.entity_as_of(target, target_pk, &self.at)?;
        let child: Self = Self::with_memo(
            Rc::clone(&self.registry),
            &self.at,
            entity,
            Rc::clone(&self.resolved),
        )?;
        self.related
            .borrow_mut()
            .insert(name.to_string(), child.clone());
        Ok(FieldAccess::Related(child))
    }

    /// Accesses a tracked many-to-many relation as of the walk's
    /// timestamp.
    ///
    /// Returns a read-only collection of *live* target entities whose
    /// membership held at the timestamp. Targets deleted since are
    /// excluded — a documented limitation, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for relations the schema does not track, and
    /// surfaces storage failures.
    pub fn related(
        &self,
        name: &str,
        resolver: &mut dyn RelationResolver,
    ) -> Result<Vec<Entity>, HistoryError> {
        let schema: &EntitySchema = self.registry.schema(self.base.entity_type())?;
        let relation: &RelationDef =
            schema
                .relation(name)
                .ok_or_else(|| DomainError::UnknownRelation {
                    entity_type: self.base.entity_type().to_string(),
                    relation: name.to_string(),
                })?;
        let pk: i64 = self.base.primary_key(schema)?;
        resolver.live_linked_as_of(relation, self.base.entity_type(), pk, &self.at)
    }
}
