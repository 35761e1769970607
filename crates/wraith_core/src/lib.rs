//! # WRAITH Core
//!
//! Display model state for a server-authoritative world:
//! - [`Transform`]: translation, left/right rotation and scale composed into
//!   one matrix
//! - [`Model`]: common render state, a Block / Item / Text payload and a
//!   per-property dirty set
//! - [`HostTypes`]: the seam through which a host supplies its own viewer,
//!   world, block, item and text types
//!
//! ## Architecture Rules
//!
//! 1. **Models never talk to the network** - they only record what changed
//! 2. **Validation before mutation** - a failed setter leaves no trace
//! 3. **Host types stay opaque** - payloads are stored and forwarded as-is
//!
//! ## Example
//!
//! ```rust,ignore
//! use wraith_core::{Location, Model};
//!
//! let mut model = Model::<MyHost>::text(anchor, "Hello".into());
//! model.set_glow_color(Color::WHITE).translate(0.0, 1.5, 0.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod host;
pub mod model;
pub mod transform;

pub use host::{HostTypes, Location, Payload};
pub use model::{
    BlockEditor, BlockModel, DirtyIter, DirtySet, ItemEditor, ItemModel, Model, ModelKind,
    TextEditor, TextModel,
};
pub use transform::Transform;
