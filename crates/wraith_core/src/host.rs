//! # Host Types
//!
//! The engine never names a concrete viewer, world, block state, item stack
//! or text type. A host plugs its own types in through [`HostTypes`].

use std::fmt::Debug;
use std::hash::Hash;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Payload a model stores and forwards without looking inside.
pub trait Payload: Clone + Debug + PartialEq + Default + Send + Sync + 'static {}

impl<T> Payload for T where T: Clone + Debug + PartialEq + Default + Send + Sync + 'static {}

/// Binds the engine to a host's concrete types.
///
/// Implemented on a zero-sized marker type by the host.
pub trait HostTypes: Clone + Debug + Send + Sync + 'static {
    /// A connected observer. Used as a set key.
    type Viewer: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    /// World identifier.
    type World: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// Block state. `Default` must be an empty (air) state.
    type BlockState: Payload;
    /// Item stack. `Default` must be an empty stack.
    type ItemStack: Payload;
    /// Rich text component.
    type Text: Payload;
}

/// A world plus an absolute position in it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location<W> {
    /// World the position lives in.
    pub world: W,
    /// Absolute position.
    pub position: DVec3,
}

impl<W> Location<W> {
    /// Creates a location.
    #[must_use]
    pub const fn new(world: W, position: DVec3) -> Self {
        Self { world, position }
    }

    /// Same world, different position.
    #[must_use]
    pub fn with_position(&self, position: DVec3) -> Self
    where
        W: Clone,
    {
        Self::new(self.world.clone(), position)
    }

    /// Squared distance to another location, or `None` across worlds.
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> Option<f64>
    where
        W: PartialEq,
    {
        (self.world == other.world).then(|| self.position.distance_squared(other.position))
    }
}
