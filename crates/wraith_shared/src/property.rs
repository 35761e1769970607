//! # Symbolic Properties
//!
//! Every synchronizable property a model exposes, independent of how a
//! particular host version lays out its metadata. The registry resolves
//! each [`PropertyId`] to a concrete field once, at start-up.

use serde::{Deserialize, Serialize};

/// Model variant a property can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantKind {
    /// Renders a block state.
    Block,
    /// Renders an item stack.
    Item,
    /// Renders a text component.
    Text,
}

/// Wire type of a host metadata field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Signed byte.
    Byte,
    /// Variable-length int.
    VarInt,
    /// 32-bit float.
    Float,
    /// Three floats.
    Vector3,
    /// Four floats, `x y z w`.
    Quaternion,
    /// Host block state id.
    BlockState,
    /// Host item stack.
    ItemStack,
    /// Host text component.
    Component,
}

/// A synchronizable model property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PropertyId {
    /// Transform translation.
    Translation = 0,
    /// Transform scale.
    Scale,
    /// Transform left rotation.
    LeftRotation,
    /// Transform right rotation.
    RightRotation,
    /// View range multiplier.
    ViewRange,
    /// Shadow radius.
    ShadowRadius,
    /// Shadow strength.
    ShadowStrength,
    /// Glow outline color override.
    GlowColor,
    /// Billboard mode.
    Billboard,
    /// Light override.
    Brightness,
    /// Culling box width.
    CullingWidth,
    /// Culling box height.
    CullingHeight,
    /// Ticks before interpolation starts.
    InterpolationDelay,
    /// Transform interpolation length.
    InterpolationDuration,
    /// Teleport interpolation length.
    TeleportDuration,
    /// Entity flags byte. Carries the glowing bit.
    SharedFlags,
    /// Block model: displayed block state.
    BlockState,
    /// Item model: displayed stack.
    ItemStack,
    /// Item model: display transform.
    ItemView,
    /// Text model: the component.
    Text,
    /// Text model: wrap width.
    LineWidth,
    /// Text model: background ARGB.
    BackgroundColor,
    /// Text model: opacity byte.
    TextOpacity,
    /// Text model: style flags.
    TextStyle,
}

impl PropertyId {
    /// Number of properties.
    pub const COUNT: usize = 24;

    /// Every property, in wire order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Translation,
        Self::Scale,
        Self::LeftRotation,
        Self::RightRotation,
        Self::ViewRange,
        Self::ShadowRadius,
        Self::ShadowStrength,
        Self::GlowColor,
        Self::Billboard,
        Self::Brightness,
        Self::CullingWidth,
        Self::CullingHeight,
        Self::InterpolationDelay,
        Self::InterpolationDuration,
        Self::TeleportDuration,
        Self::SharedFlags,
        Self::BlockState,
        Self::ItemStack,
        Self::ItemView,
        Self::Text,
        Self::LineWidth,
        Self::BackgroundColor,
        Self::TextOpacity,
        Self::TextStyle,
    ];

    /// The four transform components. Always marked dirty together.
    pub const TRANSFORM: [Self; 4] = [
        Self::Translation,
        Self::Scale,
        Self::LeftRotation,
        Self::RightRotation,
    ];

    /// Position in [`Self::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask for dirty sets.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Wire type a host field must have to carry this property.
    #[must_use]
    pub const fn expected_kind(self) -> FieldKind {
        match self {
            Self::Translation | Self::Scale => FieldKind::Vector3,
            Self::LeftRotation | Self::RightRotation => FieldKind::Quaternion,
            Self::ViewRange
            | Self::ShadowRadius
            | Self::ShadowStrength
            | Self::CullingWidth
            | Self::CullingHeight => FieldKind::Float,
            Self::GlowColor
            | Self::Brightness
            | Self::InterpolationDelay
            | Self::InterpolationDuration
            | Self::TeleportDuration
            | Self::LineWidth
            | Self::BackgroundColor => FieldKind::VarInt,
            Self::Billboard
            | Self::SharedFlags
            | Self::ItemView
            | Self::TextOpacity
            | Self::TextStyle => FieldKind::Byte,
            Self::BlockState => FieldKind::BlockState,
            Self::ItemStack => FieldKind::ItemStack,
            Self::Text => FieldKind::Component,
        }
    }

    /// Variant this property is specific to, or `None` for common ones.
    #[must_use]
    pub const fn variant(self) -> Option<VariantKind> {
        match self {
            Self::BlockState => Some(VariantKind::Block),
            Self::ItemStack | Self::ItemView => Some(VariantKind::Item),
            Self::Text
            | Self::LineWidth
            | Self::BackgroundColor
            | Self::TextOpacity
            | Self::TextStyle => Some(VariantKind::Text),
            _ => None,
        }
    }

    /// Returns true if a model of `kind` carries this property.
    #[inline]
    #[must_use]
    pub const fn applies_to(self, kind: VariantKind) -> bool {
        match self.variant() {
            None => true,
            Some(VariantKind::Block) => matches!(kind, VariantKind::Block),
            Some(VariantKind::Item) => matches!(kind, VariantKind::Item),
            Some(VariantKind::Text) => matches!(kind, VariantKind::Text),
        }
    }
}
