//! # Host Collaborators
//!
//! What the engine needs from its host beyond types: who is near a
//! location, and fresh entity ids.

use std::sync::atomic::{AtomicI32, Ordering};

use wraith_core::{HostTypes, Location};
use wraith_shared::EntityId;

/// Answers "which viewers are within `radius` of this location?".
///
/// Called with the tracker lock held: implementations must not call back
/// into the tracker.
pub trait ProximityOracle<H: HostTypes>: Send + Sync {
    /// Viewers within `radius` blocks of `location`.
    fn viewers_near(&self, location: &Location<H::World>, radius: f64) -> Vec<H::Viewer>;
}

/// Issues host entity ids.
pub trait EntityIdAllocator: Send + Sync {
    /// A fresh, never-reused id. Must not be [`EntityId::UNSET`].
    fn allocate(&self) -> EntityId;
}

/// Counts up from 1.
#[derive(Debug)]
pub struct SequentialEntityIds {
    next: AtomicI32,
}

impl SequentialEntityIds {
    /// Starts at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Starts at `first`. Hosts use this to stay clear of their own range.
    #[must_use]
    pub const fn starting_at(first: i32) -> Self {
        Self {
            next: AtomicI32::new(first),
        }
    }
}

impl Default for SequentialEntityIds {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityIdAllocator for SequentialEntityIds {
    fn allocate(&self) -> EntityId {
        EntityId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialEntityIds::new();
        assert_eq!(ids.allocate(), EntityId(1));
        assert_eq!(ids.allocate(), EntityId(2));
        assert!(ids.allocate().is_assigned());
    }

    #[test]
    fn test_custom_start() {
        let ids = SequentialEntityIds::starting_at(10_000);
        assert_eq!(ids.allocate(), EntityId(10_000));
    }
}
