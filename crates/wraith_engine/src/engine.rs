//! # Engine
//!
//! Start-up negotiation, the spawn API and the per-tick pass.
//!
//! ## Rules
//!
//! 1. Construction either fully binds every property or fails
//! 2. A spawn that fails leaves nothing tracked and consumes no entity id
//! 3. One `tick` = one dirty-only sync, then a visibility refresh when due.
//!    Arrivals get full state once and never the same tick's dirty writes

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};
use wraith_core::{HostTypes, Location, Model};
use wraith_shared::{ModelId, WraithResult};

use crate::config::EngineConfig;
use crate::host::{EntityIdAllocator, ProximityOracle};
use crate::registry::PropertyRegistry;
use crate::renderer::Renderer;
use crate::schema::{select_schema, HostSchema};
use crate::tracker::{ModelTracker, SyncStats, VisibilityChange};
use crate::transport::FieldTransport;

/// Collaborators the host supplies at start-up.
pub struct EngineParts<H: HostTypes> {
    /// Packet delivery.
    pub transport: Arc<dyn FieldTransport<H>>,
    /// Viewer lookup by location.
    pub proximity: Arc<dyn ProximityOracle<H>>,
    /// Entity id source.
    pub ids: Arc<dyn EntityIdAllocator>,
}

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Whether visibility was recomputed this tick.
    pub visibility_refreshed: bool,
    /// Viewer set changes from the refresh.
    pub visibility: VisibilityChange,
    /// Sync pass statistics.
    pub sync: SyncStats,
}

/// The synchronization engine.
pub struct Engine<H: HostTypes> {
    config: EngineConfig,
    tracker: ModelTracker<H>,
    ids: Arc<dyn EntityIdAllocator>,
    ticks: AtomicU64,
}

impl<H: HostTypes> Engine<H> {
    /// Validates `config`, picks the schema matching the host version and
    /// binds every property against it.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for out-of-range configuration
    /// - `IncompatibleHost` if no candidate accepts `config.host_version`
    /// - `BindingUnavailable` if the chosen schema cannot carry a property
    pub fn new(
        config: EngineConfig,
        candidates: &[Arc<dyn HostSchema>],
        parts: EngineParts<H>,
    ) -> WraithResult<Self> {
        config.validate()?;
        let schema = select_schema(candidates, &config.host_version)?;
        let registry = Arc::new(PropertyRegistry::resolve(schema.as_ref())?);

        let tracker = ModelTracker::new(
            registry,
            parts.transport,
            parts.proximity,
            config.visibility_radius,
        );

        info!(
            host_version = %config.host_version,
            schema = schema.version(),
            tick_rate = config.tick_rate,
            visibility_radius = config.visibility_radius,
            "Engine started"
        );

        Ok(Self {
            config,
            tracker,
            ids: parts.ids,
            ticks: AtomicU64::new(0),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The model tracker.
    #[must_use]
    pub const fn tracker(&self) -> &ModelTracker<H> {
        &self.tracker
    }

    /// Render operations over the tracker.
    #[must_use]
    pub const fn renderer(&self) -> Renderer<'_, H> {
        Renderer::new(&self.tracker)
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawns a block model at `location`.
    ///
    /// # Errors
    ///
    /// Propagates tracker errors; none are expected for a fresh model.
    pub fn spawn_block_model(
        &self,
        location: Location<H::World>,
        block: H::BlockState,
    ) -> WraithResult<ModelId> {
        self.spawn(Model::block(location, block), |_| Ok(()))
    }

    /// Spawns a block model, letting `editor` set it up first.
    ///
    /// # Errors
    ///
    /// Whatever `editor` returns; the model is then discarded.
    pub fn spawn_block_model_with(
        &self,
        location: Location<H::World>,
        block: H::BlockState,
        editor: impl FnOnce(&mut Model<H>) -> WraithResult<()>,
    ) -> WraithResult<ModelId> {
        self.spawn(Model::block(location, block), editor)
    }

    /// Spawns an item model at `location`.
    ///
    /// # Errors
    ///
    /// Propagates tracker errors; none are expected for a fresh model.
    pub fn spawn_item_model(
        &self,
        location: Location<H::World>,
        item: H::ItemStack,
    ) -> WraithResult<ModelId> {
        self.spawn(Model::item(location, item), |_| Ok(()))
    }

    /// Spawns an item model, letting `editor` set it up first.
    ///
    /// # Errors
    ///
    /// Whatever `editor` returns; the model is then discarded.
    pub fn spawn_item_model_with(
        &self,
        location: Location<H::World>,
        item: H::ItemStack,
        editor: impl FnOnce(&mut Model<H>) -> WraithResult<()>,
    ) -> WraithResult<ModelId> {
        self.spawn(Model::item(location, item), editor)
    }

    /// Spawns a text model at `location`.
    ///
    /// # Errors
    ///
    /// Propagates tracker errors; none are expected for a fresh model.
    pub fn spawn_text_model(
        &self,
        location: Location<H::World>,
        text: H::Text,
    ) -> WraithResult<ModelId> {
        self.spawn(Model::text(location, text), |_| Ok(()))
    }

    /// Spawns a text model, letting `editor` set it up first.
    ///
    /// # Errors
    ///
    /// Whatever `editor` returns; the model is then discarded.
    pub fn spawn_text_model_with(
        &self,
        location: Location<H::World>,
        text: H::Text,
        editor: impl FnOnce(&mut Model<H>) -> WraithResult<()>,
    ) -> WraithResult<ModelId> {
        self.spawn(Model::text(location, text), editor)
    }

    fn spawn(
        &self,
        mut model: Model<H>,
        editor: impl FnOnce(&mut Model<H>) -> WraithResult<()>,
    ) -> WraithResult<ModelId> {
        editor(&mut model)?;
        // Editor changes are initial state; first viewers get them in full.
        model.take_dirty();

        let id = model.id();
        let variant = model.variant();
        model.assign_entity_id(self.ids.allocate())?;
        let entity_id = model.entity_id();

        self.tracker.track(model)?;
        let visibility = self.tracker.update_visibility(id)?;

        info!(
            model = %id,
            entity = %entity_id,
            ?variant,
            viewers = visibility.added,
            "Spawned model"
        );
        Ok(id)
    }

    // =========================================================================
    // Ticking
    // =========================================================================

    /// Runs one tick: a sync pass, then a visibility refresh when due.
    ///
    /// Hosts normally let [`crate::UpdateScheduler`] call this at the
    /// configured rate.
    pub fn tick(&self) -> TickReport {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        let interval = u64::from(self.config.visibility_interval_ticks);

        let sync = self.tracker.update_all();

        let visibility_refreshed = interval > 0 && tick % interval == 0;
        let visibility = if visibility_refreshed {
            self.tracker.update_visibility_all()
        } else {
            VisibilityChange::default()
        };
        if visibility.added > 0 || visibility.removed > 0 {
            debug!(
                tick,
                added = visibility.added,
                removed = visibility.removed,
                "Visibility refreshed"
            );
        }

        TickReport {
            tick,
            visibility_refreshed,
            visibility,
            sync,
        }
    }

    /// Pushes one model's pending changes now, outside the tick.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn update_model(&self, id: ModelId) -> WraithResult<usize> {
        self.tracker.update_model(id)
    }
}
