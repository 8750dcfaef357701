//! Typed side-table of per-entity tags.
//!
//! The host owns entities; the tracker only sees their [`EntityHandle`]s.
//! Anything the tracker wants to remember about an entity (its spawn identity,
//! which entity spawned a reward) lives here, keyed by handle and then by a
//! string tag name.

use std::collections::HashMap;

use collectible_core::{ErrorSeverity, LedgerError};

use crate::host::EntityHandle;

/// Errors raised by required tag lookups.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("entity {entity} has no tags")]
    Untagged { entity: EntityHandle },

    #[error("entity {entity} has no tag {key:?}")]
    MissingKey {
        entity: EntityHandle,
        key: &'static str,
    },
}

impl LedgerError for AttributeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Untagged { .. } => "ATTRIBUTE_UNTAGGED",
            Self::MissingKey { .. } => "ATTRIBUTE_MISSING_KEY",
        }
    }
}

/// Per-entity map from tag name to a value of type `V`.
#[derive(Clone, Debug)]
pub struct EntityAttributeStore<V> {
    containers: HashMap<EntityHandle, HashMap<&'static str, V>>,
}

impl<V> Default for EntityAttributeStore<V> {
    fn default() -> Self {
        Self {
            containers: HashMap::new(),
        }
    }
}

impl<V> EntityAttributeStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `value` only if `entity` carries no tags at all yet.
    ///
    /// Returns false, leaving existing tags untouched, when the entity was
    /// already tagged under any key. Used where the first writer must win,
    /// e.g. recording an identity at spawn.
    pub fn try_attach(&mut self, entity: EntityHandle, key: &'static str, value: V) -> bool {
        if self.containers.contains_key(&entity) {
            return false;
        }
        self.containers
            .insert(entity, HashMap::from([(key, value)]));
        true
    }

    /// Attaches `value`, replacing any previous value under `key`.
    pub fn attach_or_set(&mut self, entity: EntityHandle, key: &'static str, value: V) {
        self.containers.entry(entity).or_default().insert(key, value);
    }

    pub fn get(&self, entity: EntityHandle, key: &'static str) -> Result<&V, AttributeError> {
        let tags = self
            .containers
            .get(&entity)
            .ok_or(AttributeError::Untagged { entity })?;
        tags.get(key)
            .ok_or(AttributeError::MissingKey { entity, key })
    }

    pub fn try_get(&self, entity: EntityHandle, key: &str) -> Option<&V> {
        self.containers.get(&entity)?.get(key)
    }

    /// Returns true if `entity` carries any tag.
    pub fn contains(&self, entity: EntityHandle) -> bool {
        self.containers.contains_key(&entity)
    }

    /// Drops every tag of `entity`. Returns whether it had any.
    ///
    /// Hosts call this when a pooled object is about to be reused without a
    /// generation bump.
    pub fn invalidate(&mut self, entity: EntityHandle) -> bool {
        self.containers.remove(&entity).is_some()
    }

    /// Number of tagged entities.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
