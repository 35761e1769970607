//! # WRAITH Shared
//!
//! Value types used by both the model layer and the engine.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on host types (viewers, block states,
//! item stacks, rich text). Those enter through `wraith_core::HostTypes`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod color;
pub mod constants;
pub mod error;
pub mod ids;
pub mod properties;
pub mod property;

pub use color::Color;
pub use error::{WraithError, WraithResult};
pub use ids::{EntityId, ModelId};
pub use properties::{
    Billboard, Brightness, Culling, Interpolation, Shadow, TextAlignment, ViewTransform,
};
pub use property::{FieldKind, PropertyId, VariantKind};
