//! # Renderer
//!
//! Turns model edits into viewer traffic: full renders for first-time
//! visibility, interpolated moves, teleports and removal.
//!
//! Every operation runs under the tracker lock, so the edit and the push
//! it triggers happen as one step.

use glam::DVec3;
use tracing::{debug, info};
use wraith_core::{HostTypes, Location, Model, Transform};
use wraith_shared::{ModelId, WraithResult};

use crate::packet::ViewerPacket;
use crate::tracker::{Entry, ModelTracker};

/// Render operations over a tracker.
pub struct Renderer<'a, H: HostTypes> {
    tracker: &'a ModelTracker<H>,
}

impl<'a, H: HostTypes> Renderer<'a, H> {
    /// Borrows `tracker`.
    #[must_use]
    pub const fn new(tracker: &'a ModelTracker<H>) -> Self {
        Self { tracker }
    }

    /// Sends a spawn and every property to every current viewer.
    ///
    /// The dirty set is left alone; only sync passes clear it.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn render(&self, id: ModelId) -> WraithResult<()> {
        self.tracker.with_entry(id, |entry| {
            let audience = entry.audience();
            self.tracker.push_full(&entry.model, &audience);
            debug!(model = %id, viewers = audience.len(), "Full render");
            Ok(())
        })
    }

    /// Moves the model to `target` by offsetting its translation, tweened
    /// over `duration` ticks, then pushes the change.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn render_at(&self, id: ModelId, target: DVec3, duration: i32) -> WraithResult<()> {
        self.render_at_with(id, target, duration, |_| {})
    }

    /// Like [`Self::render_at`], running `extra` on the transform after the
    /// offset.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn render_at_with(
        &self,
        id: ModelId,
        target: DVec3,
        duration: i32,
        extra: impl FnOnce(&mut Transform),
    ) -> WraithResult<()> {
        self.tracker.with_entry(id, |entry| {
            entry.model.render_at_with(target, duration, extra);
            self.tracker.push_dirty(entry);
            Ok(())
        })
    }

    /// Moves the model's anchor to `anchor`, leaving interpolation alone.
    ///
    /// Only the anchor moves. The relative transform is kept, so afterwards
    /// the absolute position is `anchor + translation`, not `anchor` itself.
    /// Viewers receive pending metadata, then a `Teleport` to the anchor.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn teleport(&self, id: ModelId, anchor: Location<H::World>) -> WraithResult<()> {
        self.tracker.with_entry(id, |entry| {
            entry.model.relocate(anchor);
            self.send_teleport(entry);
            Ok(())
        })
    }

    /// Like [`Self::teleport`], tweening the move over `duration` ticks.
    ///
    /// As there, `anchor` is the new anchor and the absolute position ends
    /// up at `anchor + translation`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `duration` is outside `0..=59`, in which case
    /// nothing moves. `NotFound` if `id` is not tracked.
    pub fn teleport_over(
        &self,
        id: ModelId,
        anchor: Location<H::World>,
        duration: i32,
    ) -> WraithResult<()> {
        self.tracker.with_entry(id, |entry| {
            entry.model.set_teleport_duration(duration)?;
            entry.model.relocate(anchor);
            self.send_teleport(entry);
            Ok(())
        })
    }

    /// Tells every viewer to drop the model, then stops tracking it.
    ///
    /// Returns the model, or `None` if it was not tracked.
    pub fn remove(&self, id: ModelId) -> Option<Model<H>> {
        let entry = self.tracker.take(id)?;
        let audience = entry.audience();
        self.tracker.dispatch(
            &audience,
            ViewerPacket::Remove {
                entity_id: entry.model.entity_id(),
            },
        );
        info!(model = %id, viewers = audience.len(), "Removed model");
        Some(entry.model)
    }

    /// Pending metadata first so the client knows the tween, then the move.
    fn send_teleport(&self, entry: &mut Entry<H>) {
        self.tracker.push_dirty(entry);
        let audience = entry.audience();
        self.tracker.dispatch(
            &audience,
            ViewerPacket::Teleport {
                entity_id: entry.model.entity_id(),
                location: entry.model.anchor().clone(),
            },
        );
        debug!(
            model = %entry.model.id(),
            x = entry.model.anchor().position.x,
            y = entry.model.anchor().position.y,
            z = entry.model.anchor().position.z,
            "Teleported"
        );
    }
}
