//! # Display Model Constants
//!
//! Ranges, defaults and wire bit layouts shared by models and bindings.

// =============================================================================
// RANGES
// =============================================================================

/// Highest block/sky light level.
pub const MAX_LIGHT_LEVEL: i32 = 15;

/// Largest accepted shadow radius.
pub const MAX_SHADOW_RADIUS: f32 = 64.0;

/// Longest teleport interpolation the client accepts, in ticks.
pub const MAX_TELEPORT_DURATION: i32 = 59;

// =============================================================================
// DEFAULTS
// =============================================================================

/// View range multiplier of a fresh model.
pub const DEFAULT_VIEW_RANGE: f32 = 1.0;

/// Shadow strength of a fresh model.
pub const DEFAULT_SHADOW_STRENGTH: f32 = 1.0;

/// Text wrap width of a fresh text model.
pub const DEFAULT_LINE_WIDTH: i32 = 200;

/// Background color of a fresh text model (`0x40000000`).
pub const DEFAULT_TEXT_BACKGROUND: u32 = 0x4000_0000;

/// Text opacity of a fresh text model. Raw byte `0xFF`, fully opaque.
pub const DEFAULT_TEXT_OPACITY: i8 = -1;

// =============================================================================
// WIRE LAYOUT
// =============================================================================

/// Entity shared-flags bit for the glowing outline.
pub const FLAG_GLOWING: i8 = 1 << 6;

/// Text style bit: drop shadow.
pub const TEXT_FLAG_SHADOW: i8 = 1;
/// Text style bit: rendered through blocks.
pub const TEXT_FLAG_SEE_THROUGH: i8 = 1 << 1;
/// Text style bit: use the client's default background.
pub const TEXT_FLAG_DEFAULT_BACKGROUND: i8 = 1 << 2;
/// Text style bit: left alignment.
pub const TEXT_FLAG_ALIGN_LEFT: i8 = 1 << 3;
/// Text style bit: right alignment.
pub const TEXT_FLAG_ALIGN_RIGHT: i8 = 1 << 4;

/// Packed value meaning "no override" for brightness and glow color.
pub const NO_OVERRIDE: i32 = -1;
