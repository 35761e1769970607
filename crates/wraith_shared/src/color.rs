//! # Color
//!
//! ARGB color with 8-bit channels.
//!
//! Channel values are clamped into `0..=255` when constructed. This is
//! the one range check in the crate that never fails.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{WraithError, WraithResult};

/// An ARGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    alpha: u8,
    red: u8,
    green: u8,
    blue: u8,
}

/// Clamps a channel into the byte range.
#[inline]
fn channel(value: i32) -> u8 {
    // Clamped above, cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.clamp(0, 255) as u8
    }
}

impl Color {
    /// Fully transparent black. Used as "no glow".
    pub const TRANSPARENT: Self = Self::from_channels(0, 0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::from_channels(255, 255, 255, 255);

    /// Creates a color, clamping every channel into `0..=255`.
    #[must_use]
    pub fn new(alpha: i32, red: i32, green: i32, blue: i32) -> Self {
        Self {
            alpha: channel(alpha),
            red: channel(red),
            green: channel(green),
            blue: channel(blue),
        }
    }

    /// Creates a color from byte channels.
    #[must_use]
    pub const fn from_channels(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// Unpacks `0xAARRGGBB`.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self::from_channels(
            (argb >> 24) as u8,
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
        )
    }

    /// Parses `#RRGGBB` (alpha forced to 255) or `#AARRGGBB`.
    ///
    /// The leading `#` is optional.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the digit count is not 6 or 8 or a digit is
    /// not hexadecimal.
    pub fn from_hex(hex: &str) -> WraithResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(WraithError::invalid_argument(
                "hex",
                format!("`{hex}` is not a hex color"),
            ));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|e| WraithError::invalid_argument("hex", format!("`{hex}`: {e}")))?;
        match digits.len() {
            6 => Ok(Self::from_argb(0xFF00_0000 | value)),
            8 => Ok(Self::from_argb(value)),
            n => Err(WraithError::invalid_argument(
                "hex",
                format!("expected 6 or 8 hex digits, got {n}"),
            )),
        }
    }

    /// Packs into `0xAARRGGBB`.
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        (self.alpha as u32) << 24 | (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    /// Returns a copy with a different (clamped) alpha.
    #[must_use]
    pub fn with_alpha(self, alpha: i32) -> Self {
        Self {
            alpha: channel(alpha),
            ..self
        }
    }

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        self.alpha
    }

    /// Red channel.
    #[must_use]
    pub const fn red(self) -> u8 {
        self.red
    }

    /// Green channel.
    #[must_use]
    pub const fn green(self) -> u8 {
        self.green
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.blue
    }

    /// Returns true if the alpha channel is zero.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.alpha == 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl FromStr for Color {
    type Err = WraithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.to_argb())
    }
}
