//! # Identifiers
//!
//! A model carries two ids:
//! - [`ModelId`]: process-unique 128-bit id, fixed at construction
//! - [`EntityId`]: integer issued by the host at spawn time

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-unique model identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ModelId(Uuid);

impl ModelId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Host-assigned entity id.
///
/// `0` means the model has not been spawned yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityId(pub i32);

impl EntityId {
    /// Id of a model that was never spawned.
    pub const UNSET: Self = Self(0);

    /// Returns true once the host has issued an id.
    #[inline]
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_are_unique() {
        assert_ne!(ModelId::random(), ModelId::random());
    }

    #[test]
    fn test_entity_id_unset() {
        assert!(!EntityId::UNSET.is_assigned());
        assert!(!EntityId::default().is_assigned());
        assert!(EntityId(42).is_assigned());
    }
}
