//! # WRAITH Engine - Viewer Synchronization
//!
//! Keeps client-side display entities in step with server-side [`Model`]s.
//!
//! ## Architecture
//!
//! - **Schema**: the host declares a version; one [`HostSchema`] is picked
//!   and every property is bound against it once, at start-up
//! - **Tracker**: owns live models and their viewer sets behind one lock
//! - **Renderer**: full renders, interpolated moves, teleports, removal
//! - **Scheduler**: fixed-rate ticks that push only what changed
//! - **Transport**: fire-and-forget delivery handed to the host
//!
//! ```text
//! UpdateScheduler::run_due ─> Engine::tick ─> ModelTracker::update_all
//!                                                │ dirty properties only
//!                                                v
//!                                      PropertyRegistry::writes ─> FieldTransport ─> viewers
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use wraith_engine::{DisplaySchema, Engine, EngineConfig, EngineParts, UpdateScheduler};
//!
//! let mut scheduler = UpdateScheduler::for_config(&config)?;
//! let engine = Engine::<MyHost>::new(config, &DisplaySchema::builtin(), parts)?;
//! let id = engine.spawn_text_model(location, "Hello".into())?;
//! engine.renderer().render_at(id, target, 20)?;
//! loop {
//!     scheduler.wait_for_next_tick();
//!     scheduler.run_due(&engine);
//! }
//! ```
//!
//! [`Model`]: wraith_core::Model

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod engine;
pub mod host;
pub mod packet;
pub mod registry;
pub mod renderer;
pub mod scheduler;
pub mod schema;
pub mod tracker;
pub mod transport;

pub use config::EngineConfig;
pub use engine::{Engine, EngineParts, TickReport};
pub use host::{EntityIdAllocator, ProximityOracle, SequentialEntityIds};
pub use packet::{FieldWrite, PropertyValue, ViewerPacket};
pub use registry::{Binding, PropertyRegistry};
pub use renderer::Renderer;
pub use scheduler::{TickStats, UpdateScheduler};
pub use schema::{select_schema, DisplaySchema, FieldHandle, HostSchema};
pub use tracker::{ModelTracker, SyncStats, VisibilityChange};
pub use transport::{ChannelTransport, Delivery, FieldTransport, TransportStats};
