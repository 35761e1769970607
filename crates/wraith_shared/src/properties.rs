//! # Render Properties
//!
//! Small value records grouped the way a model exposes them. Range-checked
//! records validate in their constructor, so an invalid value can never
//! reach a model.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SHADOW_STRENGTH, MAX_LIGHT_LEVEL, MAX_SHADOW_RADIUS, MAX_TELEPORT_DURATION,
};
use crate::error::{WraithError, WraithResult};

/// How a model turns to face its viewers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Billboard {
    /// Never pivots.
    #[default]
    Fixed = 0,
    /// Pivots around the vertical axis.
    Vertical = 1,
    /// Pivots around the horizontal axis.
    Horizontal = 2,
    /// Pivots around its center.
    Center = 3,
}

impl Billboard {
    /// Wire id of this mode.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Decodes a wire id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Fixed),
            1 => Some(Self::Vertical),
            2 => Some(Self::Horizontal),
            3 => Some(Self::Center),
            _ => None,
        }
    }
}

/// Light override. When a model has none, the host lights it from its
/// surroundings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Brightness {
    block_light: u8,
    sky_light: u8,
}

impl Brightness {
    /// Maximum light on both channels.
    pub const FULL_BRIGHT: Self = Self {
        block_light: 15,
        sky_light: 15,
    };

    /// No light on either channel.
    pub const SHADOW: Self = Self {
        block_light: 0,
        sky_light: 0,
    };

    /// Creates a light override.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when a channel is outside `0..=15`.
    pub fn new(block_light: i32, sky_light: i32) -> WraithResult<Self> {
        WraithError::check_range(block_light, 0, MAX_LIGHT_LEVEL, "block light")?;
        WraithError::check_range(sky_light, 0, MAX_LIGHT_LEVEL, "sky light")?;
        // Both checked against 0..=15 above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self {
            block_light: block_light as u8,
            sky_light: sky_light as u8,
        })
    }

    /// Block light level.
    #[must_use]
    pub const fn block_light(self) -> i32 {
        self.block_light as i32
    }

    /// Sky light level.
    #[must_use]
    pub const fn sky_light(self) -> i32 {
        self.sky_light as i32
    }

    /// Packs into the host's `block << 4 | sky << 20` layout.
    #[must_use]
    pub const fn packed(self) -> i32 {
        (self.block_light as i32) << 4 | (self.sky_light as i32) << 20
    }

    /// Unpacks the host layout.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the decoded channels are out of range.
    pub fn from_packed(packed: i32) -> WraithResult<Self> {
        Self::new((packed >> 4) & 0xF, (packed >> 20) & 0xF)
    }
}

/// Shadow under a model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    radius: f32,
    strength: f32,
}

impl Shadow {
    /// Creates a shadow. A radius `<= 0` means no shadow.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `radius > 64`.
    pub fn new(radius: f32, strength: f32) -> WraithResult<Self> {
        Self::check_radius(radius)?;
        Ok(Self { radius, strength })
    }

    /// Validates a radius on its own.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `radius > 64`.
    pub fn check_radius(radius: f32) -> WraithResult<()> {
        if radius > MAX_SHADOW_RADIUS {
            return Err(WraithError::invalid_argument(
                "shadow radius",
                format!("must not be greater than {MAX_SHADOW_RADIUS}, but was {radius}"),
            ));
        }
        Ok(())
    }

    /// Same radius, new strength. Strength has no range.
    #[must_use]
    pub const fn with_strength(self, strength: f32) -> Self {
        Self { strength, ..self }
    }

    /// Shadow radius.
    #[must_use]
    pub const fn radius(self) -> f32 {
        self.radius
    }

    /// Shadow strength.
    #[must_use]
    pub const fn strength(self) -> f32 {
        self.strength
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            radius: 0.0,
            strength: DEFAULT_SHADOW_STRENGTH,
        }
    }
}

/// Culling box. Zero on an axis disables culling on that axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Culling {
    /// Horizontal extent, centered on the model.
    pub width: f32,
    /// Vertical extent, from the model's feet upward.
    pub height: f32,
}

impl Culling {
    /// Creates a culling box.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Interpolation window the client tweens over, in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Interpolation {
    delay: i32,
    duration: i32,
    teleport: i32,
}

impl Interpolation {
    /// No delay, no tween.
    pub const NONE: Self = Self {
        delay: 0,
        duration: 0,
        teleport: 0,
    };

    /// One-tick transform tween.
    pub const MIN: Self = Self {
        delay: 0,
        duration: 1,
        teleport: 0,
    };

    /// One-tick teleport tween.
    pub const MIN_TELEPORT: Self = Self {
        delay: 0,
        duration: 0,
        teleport: 1,
    };

    /// Creates an interpolation window.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `teleport` is outside `0..=59`.
    pub fn new(delay: i32, duration: i32, teleport: i32) -> WraithResult<Self> {
        WraithError::check_range(teleport, 0, MAX_TELEPORT_DURATION, "teleport duration")?;
        Ok(Self {
            delay,
            duration,
            teleport,
        })
    }

    /// Same window with a new delay. Only the teleport length is bounded.
    #[must_use]
    pub const fn with_delay(self, delay: i32) -> Self {
        Self { delay, ..self }
    }

    /// Same window with a new transform tween length.
    #[must_use]
    pub const fn with_duration(self, duration: i32) -> Self {
        Self { duration, ..self }
    }

    /// Ticks before the tween starts.
    #[must_use]
    pub const fn delay(self) -> i32 {
        self.delay
    }

    /// Transform tween length.
    #[must_use]
    pub const fn duration(self) -> i32 {
        self.duration
    }

    /// Position/rotation tween length after a teleport.
    #[must_use]
    pub const fn teleport(self) -> i32 {
        self.teleport
    }
}

/// Which item-model transform the client applies to an item model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ViewTransform {
    /// Raw model, no display transform.
    #[default]
    None = 0,
    /// Held in the left hand, third person.
    ThirdPersonLeft = 1,
    /// Held in the right hand, third person.
    ThirdPersonRight = 2,
    /// Held in the left hand, first person.
    FirstPersonLeft = 3,
    /// Held in the right hand, first person.
    FirstPersonRight = 4,
    /// Worn on the head.
    Head = 5,
    /// Inventory slot.
    Gui = 6,
    /// Dropped on the ground.
    Ground = 7,
    /// Item frame.
    Fixed = 8,
}

impl ViewTransform {
    /// Wire id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Decodes a wire id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0 => Self::None,
            1 => Self::ThirdPersonLeft,
            2 => Self::ThirdPersonRight,
            3 => Self::FirstPersonLeft,
            4 => Self::FirstPersonRight,
            5 => Self::Head,
            6 => Self::Gui,
            7 => Self::Ground,
            8 => Self::Fixed,
            _ => return None,
        })
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlignment {
    /// Centered.
    #[default]
    Center,
    /// Flush left.
    Left,
    /// Flush right.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_range() {
        assert!(Brightness::new(0, 0).is_ok());
        assert!(Brightness::new(15, 15).is_ok());
        for bad in [-1, 16, 100, i32::MIN, i32::MAX] {
            assert!(Brightness::new(bad, 0).is_err(), "block light {bad}");
            assert!(Brightness::new(0, bad).is_err(), "sky light {bad}");
        }
    }

    #[test]
    fn test_brightness_packing() {
        let b = Brightness::new(7, 12).unwrap();
        assert_eq!(b.packed(), 7 << 4 | 12 << 20);
        assert_eq!(Brightness::from_packed(b.packed()).unwrap(), b);
        assert_eq!(Brightness::FULL_BRIGHT.packed(), 0x00F0_00F0);
    }

    #[test]
    fn test_shadow_radius_limit() {
        assert!(Shadow::new(64.0, 1.0).is_ok());
        assert!(Shadow::new(-3.0, 1.0).is_ok());
        assert!(Shadow::new(64.01, 1.0).is_err());
        assert!(Shadow::new(1000.0, 0.5).is_err());
    }

    #[test]
    fn test_shadow_default() {
        let s = Shadow::default();
        assert_eq!(s.radius(), 0.0);
        assert_eq!(s.strength(), 1.0);
    }

    #[test]
    fn test_interpolation_teleport_range() {
        assert!(Interpolation::new(5, 10, 0).is_ok());
        assert!(Interpolation::new(5, 10, 59).is_ok());
        assert!(Interpolation::new(0, 0, 60).is_err());
        assert!(Interpolation::new(0, 0, -1).is_err());
    }

    #[test]
    fn test_interpolation_presets() {
        assert_eq!(Interpolation::default(), Interpolation::NONE);
        assert_eq!(Interpolation::MIN.duration(), 1);
        assert_eq!(Interpolation::MIN_TELEPORT.teleport(), 1);
    }

    #[test]
    fn test_shadow_with_strength_keeps_radius() {
        let shadow = Shadow::new(12.5, 1.0).unwrap().with_strength(-3.0);
        assert_eq!(shadow.radius(), 12.5);
        assert_eq!(shadow.strength(), -3.0);
    }

    #[test]
    fn test_interpolation_with_keeps_teleport() {
        let window = Interpolation::new(1, 2, 59)
            .unwrap()
            .with_delay(-4)
            .with_duration(1_000);
        assert_eq!(window.delay(), -4);
        assert_eq!(window.duration(), 1_000);
        assert_eq!(window.teleport(), 59);
    }

    #[test]
    fn test_enum_ids() {
        assert_eq!(Billboard::Center.id(), 3);
        assert_eq!(Billboard::from_id(2), Some(Billboard::Horizontal));
        assert_eq!(Billboard::from_id(4), None);
        assert_eq!(ViewTransform::Fixed.id(), 8);
        assert_eq!(ViewTransform::from_id(5), Some(ViewTransform::Head));
        assert_eq!(ViewTransform::from_id(9), None);
    }
}
