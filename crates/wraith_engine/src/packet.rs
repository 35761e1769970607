//! # Viewer Packets
//!
//! What the engine hands to the transport. Encoding to bytes is the
//! host's job; these are already in host field terms (index + wire type).

use glam::{Quat, Vec3};
use wraith_core::{HostTypes, Location};
use wraith_shared::property::VariantKind;
use wraith_shared::{EntityId, FieldKind, ModelId, PropertyId};

use crate::schema::FieldHandle;

/// A field value in wire terms.
#[derive(Clone, Debug)]
pub enum PropertyValue<H: HostTypes> {
    /// Signed byte.
    Byte(i8),
    /// Var-int.
    Int(i32),
    /// Float.
    Float(f32),
    /// Three floats.
    Vector3(Vec3),
    /// Four floats.
    Quaternion(Quat),
    /// Host block state.
    BlockState(H::BlockState),
    /// Host item stack.
    ItemStack(H::ItemStack),
    /// Host text component.
    Text(H::Text),
}

impl<H: HostTypes> PropertyValue<H> {
    /// Wire type of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Byte(_) => FieldKind::Byte,
            Self::Int(_) => FieldKind::VarInt,
            Self::Float(_) => FieldKind::Float,
            Self::Vector3(_) => FieldKind::Vector3,
            Self::Quaternion(_) => FieldKind::Quaternion,
            Self::BlockState(_) => FieldKind::BlockState,
            Self::ItemStack(_) => FieldKind::ItemStack,
            Self::Text(_) => FieldKind::Component,
        }
    }
}

impl<H: HostTypes> PartialEq for PropertyValue<H> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Vector3(a), Self::Vector3(b)) => a == b,
            (Self::Quaternion(a), Self::Quaternion(b)) => a == b,
            (Self::BlockState(a), Self::BlockState(b)) => a == b,
            (Self::ItemStack(a), Self::ItemStack(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// One metadata field write.
#[derive(Clone, Debug)]
pub struct FieldWrite<H: HostTypes> {
    /// Symbolic property.
    pub property: PropertyId,
    /// Host field it resolved to.
    pub field: FieldHandle,
    /// Encoded value.
    pub value: PropertyValue<H>,
}

impl<H: HostTypes> PartialEq for FieldWrite<H> {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property && self.field == other.field && self.value == other.value
    }
}

/// A message for a set of viewers.
#[derive(Clone, Debug)]
pub enum ViewerPacket<H: HostTypes> {
    /// Make the entity exist client-side.
    Spawn {
        /// Host entity id.
        entity_id: EntityId,
        /// Model id, sent as the entity UUID.
        model_id: ModelId,
        /// Which display entity type to spawn.
        kind: VariantKind,
        /// Spawn position (the model's anchor).
        location: Location<H::World>,
    },
    /// Metadata update.
    Metadata {
        /// Host entity id.
        entity_id: EntityId,
        /// Field writes in wire order.
        writes: Vec<FieldWrite<H>>,
    },
    /// Move the entity.
    Teleport {
        /// Host entity id.
        entity_id: EntityId,
        /// New anchor.
        location: Location<H::World>,
    },
    /// Destroy the entity client-side.
    Remove {
        /// Host entity id.
        entity_id: EntityId,
    },
}

impl<H: HostTypes> ViewerPacket<H> {
    /// Entity this packet concerns.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        match self {
            Self::Spawn { entity_id, .. }
            | Self::Metadata { entity_id, .. }
            | Self::Teleport { entity_id, .. }
            | Self::Remove { entity_id } => *entity_id,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "spawn",
            Self::Metadata { .. } => "metadata",
            Self::Teleport { .. } => "teleport",
            Self::Remove { .. } => "remove",
        }
    }
}
