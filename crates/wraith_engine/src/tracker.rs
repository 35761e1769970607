//! # Model Tracker
//!
//! Owns every live model and the set of viewers receiving it.
//!
//! ## Design
//!
//! - One `parking_lot::Mutex` guards the whole registry. It is the single
//!   serialization point for track, release, viewer changes and sync
//!   passes, so a scan-and-clear of dirty sets never races a setter.
//! - Sync passes push only dirty properties, only to current viewers.
//! - Models with an empty dirty set generate no traffic.
//! - Collaborators (transport, proximity) are called with the lock held.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use wraith_core::{HostTypes, Model};
use wraith_shared::{ModelId, WraithError, WraithResult};

use crate::host::ProximityOracle;
use crate::packet::ViewerPacket;
use crate::registry::PropertyRegistry;
use crate::transport::FieldTransport;

/// Statistics for one sync pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Models tracked during the pass.
    pub total_models: usize,
    /// Models that had pending changes.
    pub dirty_models: usize,
    /// Models whose changes reached at least one viewer.
    pub pushed_models: usize,
    /// Field writes sent.
    pub properties_pushed: usize,
    /// Field writes a full sync of every model would have sent.
    pub properties_total: usize,
}

impl SyncStats {
    /// Share of a full sync that dirty tracking avoided (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bandwidth_savings(&self) -> f32 {
        if self.properties_total == 0 {
            0.0
        } else {
            1.0 - (self.properties_pushed as f32 / self.properties_total as f32)
        }
    }

    /// Adds another pass into this one. `total_models` takes the newer value.
    pub fn accumulate(&mut self, other: &Self) {
        self.total_models = other.total_models;
        self.dirty_models += other.dirty_models;
        self.pushed_models += other.pushed_models;
        self.properties_pushed += other.properties_pushed;
        self.properties_total += other.properties_total;
    }
}

/// Viewer set changes from a visibility refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityChange {
    /// Viewers that started seeing a model.
    pub added: usize,
    /// Viewers that stopped seeing a model.
    pub removed: usize,
}

impl VisibilityChange {
    fn merge(&mut self, other: Self) {
        self.added += other.added;
        self.removed += other.removed;
    }
}

/// A tracked model and its audience.
pub(crate) struct Entry<H: HostTypes> {
    pub(crate) model: Model<H>,
    pub(crate) viewers: HashSet<H::Viewer>,
}

impl<H: HostTypes> Entry<H> {
    pub(crate) fn audience(&self) -> Vec<H::Viewer> {
        self.viewers.iter().cloned().collect()
    }
}

/// Registry of live models and their viewer sets.
pub struct ModelTracker<H: HostTypes> {
    entries: Mutex<HashMap<ModelId, Entry<H>>>,
    registry: Arc<PropertyRegistry<H>>,
    transport: Arc<dyn FieldTransport<H>>,
    proximity: Arc<dyn ProximityOracle<H>>,
    visibility_radius: f64,
}

impl<H: HostTypes> ModelTracker<H> {
    /// Creates an empty tracker.
    ///
    /// `visibility_radius` is the base viewer radius in blocks; each model
    /// scales it by its view range.
    #[must_use]
    pub fn new(
        registry: Arc<PropertyRegistry<H>>,
        transport: Arc<dyn FieldTransport<H>>,
        proximity: Arc<dyn ProximityOracle<H>>,
        visibility_radius: f64,
    ) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            registry,
            transport,
            proximity,
            visibility_radius,
        }
    }

    /// Property registry used for pushes.
    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry<H> {
        &self.registry
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Starts tracking a spawned model.
    ///
    /// Returns false, leaving the existing entry and its viewers alone, if a
    /// model with the same id is already tracked.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` if the model has no host entity id.
    pub fn track(&self, model: Model<H>) -> WraithResult<bool> {
        if !model.is_spawned() {
            return Err(WraithError::PreconditionViolation(format!(
                "model {} must be spawned before it is tracked",
                model.id()
            )));
        }

        let id = model.id();
        let mut entries = self.entries.lock();
        if entries.contains_key(&id) {
            debug!(model = %id, "Already tracked");
            return Ok(false);
        }
        entries.insert(
            id,
            Entry {
                model,
                viewers: HashSet::new(),
            },
        );
        debug!(model = %id, tracked = entries.len(), "Tracking model");
        Ok(true)
    }

    /// Stops tracking `id` and drops its viewer set.
    ///
    /// Returns the model, or `None` if it was not tracked.
    pub fn release(&self, id: ModelId) -> Option<Model<H>> {
        self.take(id).map(|entry| entry.model)
    }

    /// Returns true if `id` is tracked.
    #[must_use]
    pub fn is_tracked(&self, id: ModelId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Number of tracked models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Ids of every tracked model.
    #[must_use]
    pub fn ids(&self) -> Vec<ModelId> {
        self.entries.lock().keys().copied().collect()
    }

    // =========================================================================
    // Viewers
    // =========================================================================

    /// Adds `viewer` to the model's viewer set.
    ///
    /// Returns false if it was already there. Sends nothing; use the
    /// renderer for a first-time push.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn add_viewer(&self, id: ModelId, viewer: H::Viewer) -> WraithResult<bool> {
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(&id).ok_or(WraithError::NotFound(id))?;
        let added = entry.viewers.insert(viewer);
        if added {
            debug!(model = %id, viewers = entry.viewers.len(), "Viewer added");
        }
        Ok(added)
    }

    /// Removes `viewer` from the model's viewer set.
    ///
    /// Returns false if it was not there or the model is not tracked.
    pub fn remove_viewer(&self, id: ModelId, viewer: &H::Viewer) -> bool {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(&id) else {
            return false;
        };
        let removed = entry.viewers.remove(viewer);
        if removed {
            debug!(model = %id, viewers = entry.viewers.len(), "Viewer removed");
        }
        removed
    }

    /// Snapshot of the model's viewer set.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn viewers(&self, id: ModelId) -> WraithResult<HashSet<H::Viewer>> {
        self.entries
            .lock()
            .get(&id)
            .map(|entry| entry.viewers.clone())
            .ok_or(WraithError::NotFound(id))
    }

    // =========================================================================
    // Model access
    // =========================================================================

    /// Runs `f` on the tracked model.
    ///
    /// `f` runs with the tracker locked; it must not call back into the
    /// tracker.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn with_model<R>(&self, id: ModelId, f: impl FnOnce(&mut Model<H>) -> R) -> WraithResult<R> {
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(&id).ok_or(WraithError::NotFound(id))?;
        Ok(f(&mut entry.model))
    }

    /// Clone of the tracked model.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn snapshot(&self, id: ModelId) -> WraithResult<Model<H>> {
        self.with_model(id, |model| model.clone())
    }

    // =========================================================================
    // Synchronization
    // =========================================================================

    /// Pushes every dirty model's changes to its viewers and clears the
    /// dirty sets.
    pub fn update_all(&self) -> SyncStats {
        let mut entries = self.entries.lock();
        let mut stats = SyncStats {
            total_models: entries.len(),
            ..SyncStats::default()
        };

        for entry in entries.values_mut() {
            stats.properties_total += entry.model.full_set().len();
            if !entry.model.is_dirty() {
                continue;
            }
            stats.dirty_models += 1;
            let pushed = self.push_dirty(entry);
            if pushed > 0 {
                stats.pushed_models += 1;
                stats.properties_pushed += pushed;
            }
        }

        if stats.dirty_models > 0 {
            debug!(
                dirty = stats.dirty_models,
                pushed = stats.pushed_models,
                properties = stats.properties_pushed,
                "Sync pass"
            );
        }
        stats
    }

    /// Pushes one model's changes immediately.
    ///
    /// Returns the number of field writes sent.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn update_model(&self, id: ModelId) -> WraithResult<usize> {
        self.with_entry(id, |entry| Ok(self.push_dirty(entry)))
    }

    /// Recomputes who should see `id` and reconciles its viewer set.
    ///
    /// Viewers that drop out receive a removal; new viewers receive a spawn
    /// and the full state.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not tracked.
    pub fn update_visibility(&self, id: ModelId) -> WraithResult<VisibilityChange> {
        self.with_entry(id, |entry| Ok(self.reconcile(entry)))
    }

    /// Runs [`Self::update_visibility`] for every tracked model.
    pub fn update_visibility_all(&self) -> VisibilityChange {
        let mut entries = self.entries.lock();
        let mut total = VisibilityChange::default();
        for entry in entries.values_mut() {
            total.merge(self.reconcile(entry));
        }
        total
    }

    // =========================================================================
    // Crate-internal plumbing for the renderer
    // =========================================================================

    pub(crate) fn with_entry<R>(
        &self,
        id: ModelId,
        f: impl FnOnce(&mut Entry<H>) -> WraithResult<R>,
    ) -> WraithResult<R> {
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(&id).ok_or(WraithError::NotFound(id))?;
        f(entry)
    }

    pub(crate) fn take(&self, id: ModelId) -> Option<Entry<H>> {
        let entry = self.entries.lock().remove(&id)?;
        info!(
            model = %id,
            entity = %entry.model.entity_id(),
            viewers = entry.viewers.len(),
            "Released model"
        );
        Some(entry)
    }

    pub(crate) fn dispatch(&self, viewers: &[H::Viewer], packet: ViewerPacket<H>) {
        if !viewers.is_empty() {
            self.transport.dispatch(viewers, packet);
        }
    }

    /// Takes the dirty set and sends it to the entry's viewers. The set is
    /// cleared even when nobody is watching.
    pub(crate) fn push_dirty(&self, entry: &mut Entry<H>) -> usize {
        let dirty = entry.model.take_dirty();
        if dirty.is_empty() || entry.viewers.is_empty() {
            return 0;
        }

        let writes = self.registry.writes(&entry.model, dirty);
        let count = writes.len();
        if count > 0 {
            self.dispatch(
                &entry.audience(),
                ViewerPacket::Metadata {
                    entity_id: entry.model.entity_id(),
                    writes,
                },
            );
        }
        count
    }

    /// Spawn plus every property, to `viewers` only.
    pub(crate) fn push_full(&self, model: &Model<H>, viewers: &[H::Viewer]) {
        if viewers.is_empty() {
            return;
        }
        self.dispatch(
            viewers,
            ViewerPacket::Spawn {
                entity_id: model.entity_id(),
                model_id: model.id(),
                kind: model.variant(),
                location: model.anchor().clone(),
            },
        );
        self.dispatch(
            viewers,
            ViewerPacket::Metadata {
                entity_id: model.entity_id(),
                writes: self.registry.full_writes(model),
            },
        );
    }

    fn reconcile(&self, entry: &mut Entry<H>) -> VisibilityChange {
        let location = entry.model.absolute_location();
        let radius = self.visibility_radius * f64::from(entry.model.view_range());
        let nearby: HashSet<H::Viewer> = self
            .proximity
            .viewers_near(&location, radius)
            .into_iter()
            .collect();

        let gone: Vec<H::Viewer> = entry.viewers.difference(&nearby).cloned().collect();
        let fresh: Vec<H::Viewer> = nearby.difference(&entry.viewers).cloned().collect();

        if !gone.is_empty() {
            for viewer in &gone {
                entry.viewers.remove(viewer);
            }
            self.dispatch(
                &gone,
                ViewerPacket::Remove {
                    entity_id: entry.model.entity_id(),
                },
            );
        }

        if !fresh.is_empty() {
            entry.viewers.extend(fresh.iter().cloned());
            self.push_full(&entry.model, &fresh);
        }

        if !gone.is_empty() || !fresh.is_empty() {
            debug!(
                model = %entry.model.id(),
                added = fresh.len(),
                removed = gone.len(),
                viewers = entry.viewers.len(),
                "Visibility changed"
            );
        }

        VisibilityChange {
            added: fresh.len(),
            removed: gone.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DisplaySchema;
    use glam::DVec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;
    use std::thread;
    use wraith_core::Location;
    use wraith_shared::{Billboard, Brightness, EntityId, PropertyId};

    #[derive(Clone, Debug)]
    struct TestHost;

    impl HostTypes for TestHost {
        type Viewer = u32;
        type World = &'static str;
        type BlockState = String;
        type ItemStack = String;
        type Text = String;
    }

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(Vec<u32>, ViewerPacket<TestHost>)>>,
    }

    impl Recorder {
        fn drain(&self) -> Vec<(Vec<u32>, ViewerPacket<TestHost>)> {
            std::mem::take(&mut *self.sent.lock())
        }
    }

    impl FieldTransport<TestHost> for Recorder {
        fn dispatch(&self, viewers: &[u32], packet: ViewerPacket<TestHost>) {
            let mut viewers = viewers.to_vec();
            viewers.sort_unstable();
            self.sent.lock().push((viewers, packet));
        }
    }

    /// Every viewer in `near` is within range of everything.
    #[derive(Default)]
    struct Nearby {
        near: Mutex<Vec<u32>>,
        last_radius: Mutex<f64>,
    }

    impl ProximityOracle<TestHost> for Nearby {
        fn viewers_near(&self, _location: &Location<&'static str>, radius: f64) -> Vec<u32> {
            *self.last_radius.lock() = radius;
            self.near.lock().clone()
        }
    }

    struct Fixture {
        tracker: ModelTracker<TestHost>,
        recorder: Arc<Recorder>,
        nearby: Arc<Nearby>,
    }

    fn fixture() -> Fixture {
        let registry =
            Arc::new(PropertyRegistry::resolve(&DisplaySchema::protocol_1_20_5()).unwrap());
        let recorder = Arc::new(Recorder::default());
        let nearby = Arc::new(Nearby::default());
        let tracker = ModelTracker::new(registry, recorder.clone(), nearby.clone(), 64.0);
        Fixture {
            tracker,
            recorder,
            nearby,
        }
    }

    fn spawned(entity: i32) -> Model<TestHost> {
        let mut model = Model::block(Location::new("world", DVec3::ZERO), "stone".into());
        model.assign_entity_id(EntityId(entity)).unwrap();
        model
    }

    #[test]
    fn test_track_requires_spawn() {
        let fx = fixture();
        let model = Model::block(Location::new("world", DVec3::ZERO), "stone".into());
        assert!(matches!(
            fx.tracker.track(model),
            Err(WraithError::PreconditionViolation(_))
        ));
        assert!(fx.tracker.is_empty());
    }

    #[test]
    fn test_track_is_idempotent() {
        let fx = fixture();
        let model = spawned(1);
        let id = model.id();

        assert!(fx.tracker.track(model.clone()).unwrap());
        fx.tracker.add_viewer(id, 7).unwrap();
        assert!(!fx.tracker.track(model).unwrap());

        assert_eq!(fx.tracker.len(), 1);
        assert!(fx.tracker.viewers(id).unwrap().contains(&7));
    }

    #[test]
    fn test_release() {
        let fx = fixture();
        let model = spawned(1);
        let id = model.id();
        fx.tracker.track(model).unwrap();
        fx.tracker.add_viewer(id, 7).unwrap();

        assert_eq!(fx.tracker.release(id).map(|m| m.id()), Some(id));
        assert!(!fx.tracker.is_tracked(id));
        assert!(fx.tracker.release(id).is_none());
        assert!(matches!(fx.tracker.viewers(id), Err(WraithError::NotFound(_))));
    }

    #[test]
    fn test_viewer_round_trip() {
        let fx = fixture();
        let model = spawned(1);
        let id = model.id();
        fx.tracker.track(model).unwrap();
        fx.tracker.add_viewer(id, 1).unwrap();
        let before = fx.tracker.viewers(id).unwrap();

        assert!(fx.tracker.add_viewer(id, 2).unwrap());
        assert!(!fx.tracker.add_viewer(id, 2).unwrap());
        assert!(fx.tracker.remove_viewer(id, &2));
        assert!(!fx.tracker.remove_viewer(id, &2));

        assert_eq!(fx.tracker.viewers(id).unwrap(), before);
    }

    #[test]
    fn test_update_all_pushes_only_dirty() {
        let fx = fixture();
        let model = spawned(5);
        let id = model.id();
        fx.tracker.track(model).unwrap();
        fx.tracker.add_viewer(id, 1).unwrap();
        fx.tracker.add_viewer(id, 2).unwrap();

        fx.tracker
            .with_model(id, |m| {
                m.set_view_range(2.0);
            })
            .unwrap();
        let stats = fx.tracker.update_all();
        assert_eq!(stats.dirty_models, 1);
        assert_eq!(stats.properties_pushed, 1);
        assert_eq!(stats.properties_total, 17);

        let sent = fx.recorder.drain();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, vec![1, 2]);
        match &sent[0].1 {
            ViewerPacket::Metadata { entity_id, writes } => {
                assert_eq!(*entity_id, EntityId(5));
                assert_eq!(writes.len(), 1);
                assert_eq!(writes[0].property, PropertyId::ViewRange);
            }
            other => panic!("unexpected {other:?}"),
        }

        let stats = fx.tracker.update_all();
        assert_eq!(stats.dirty_models, 0);
        assert_eq!(stats.properties_pushed, 0);
        assert!(stats.bandwidth_savings() > 0.99);
        assert!(fx.recorder.drain().is_empty());
    }

    /// Applies edit `n` and returns the properties it dirties.
    fn apply_edit(model: &mut Model<TestHost>, n: u32) -> &'static [PropertyId] {
        match n {
            0 => {
                model.set_view_range(2.0);
                &[PropertyId::ViewRange]
            }
            1 => {
                model.set_shadow_strength(0.25);
                &[PropertyId::ShadowStrength]
            }
            2 => {
                model.set_culling_width(3.0);
                &[PropertyId::CullingWidth]
            }
            3 => {
                model.set_culling_height(1.5);
                &[PropertyId::CullingHeight]
            }
            4 => {
                model.set_billboard(Billboard::Center);
                &[PropertyId::Billboard]
            }
            5 => {
                model.set_brightness(Some(Brightness::new(4, 12).unwrap()));
                &[PropertyId::Brightness]
            }
            6 => {
                model.interpolate_after(2);
                &[PropertyId::InterpolationDelay]
            }
            7 => {
                model.interpolate_over(6);
                &[PropertyId::InterpolationDuration]
            }
            _ => {
                model.translate(0.0, 0.125, 0.0);
                &PropertyId::TRANSFORM
            }
        }
    }

    #[test]
    fn test_update_all_pushes_exactly_the_dirty_set() {
        let fx = fixture();
        let model = spawned(9);
        let id = model.id();
        fx.tracker.track(model).unwrap();
        fx.tracker.add_viewer(id, 1).unwrap();

        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..200 {
            let mut expected = BTreeSet::new();
            let edits = rng.gen_range(0..5);
            fx.tracker
                .with_model(id, |m| {
                    for _ in 0..edits {
                        expected.extend(apply_edit(m, rng.gen_range(0..9)).iter().copied());
                    }
                })
                .unwrap();

            let stats = fx.tracker.update_all();
            assert_eq!(stats.properties_pushed, expected.len());
            assert!(!fx.tracker.snapshot(id).unwrap().is_dirty());

            let sent = fx.recorder.drain();
            if expected.is_empty() {
                assert!(sent.is_empty());
                continue;
            }
            assert_eq!(sent.len(), 1);
            match &sent[0].1 {
                ViewerPacket::Metadata { writes, .. } => {
                    let pushed: BTreeSet<_> = writes.iter().map(|w| w.property).collect();
                    assert_eq!(pushed.len(), writes.len());
                    assert_eq!(pushed, expected);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_update_all_clears_without_viewers() {
        let fx = fixture();
        let model = spawned(1);
        let id = model.id();
        fx.tracker.track(model).unwrap();
        fx.tracker
            .with_model(id, |m| {
                m.translate(1.0, 0.0, 0.0);
            })
            .unwrap();

        let stats = fx.tracker.update_all();
        assert_eq!(stats.dirty_models, 1);
        assert_eq!(stats.pushed_models, 0);
        assert!(!fx.tracker.snapshot(id).unwrap().is_dirty());
        assert!(fx.recorder.drain().is_empty());
    }

    #[test]
    fn test_update_model_unknown() {
        let fx = fixture();
        let model = spawned(1);
        assert!(matches!(
            fx.tracker.update_model(model.id()),
            Err(WraithError::NotFound(_))
        ));
    }

    #[test]
    fn test_visibility_reconciles_viewers() {
        let fx = fixture();
        let model = spawned(3);
        let id = model.id();
        fx.tracker.track(model).unwrap();
        fx.tracker
            .with_model(id, |m| {
                m.set_view_range(0.5);
            })
            .unwrap();

        *fx.nearby.near.lock() = vec![1, 2];
        let change = fx.tracker.update_visibility(id).unwrap();
        assert_eq!(change, VisibilityChange { added: 2, removed: 0 });
        assert!((*fx.nearby.last_radius.lock() - 32.0).abs() < 1e-9);

        let sent = fx.recorder.drain();
        assert_eq!(sent.len(), 2);
        assert!(matches!(sent[0].1, ViewerPacket::Spawn { entity_id: EntityId(3), .. }));
        match &sent[1].1 {
            ViewerPacket::Metadata { writes, .. } => assert_eq!(writes.len(), 17),
            other => panic!("unexpected {other:?}"),
        }

        *fx.nearby.near.lock() = vec![2, 4];
        let change = fx.tracker.update_visibility(id).unwrap();
        assert_eq!(change, VisibilityChange { added: 1, removed: 1 });

        let sent = fx.recorder.drain();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].0, vec![1]);
        assert!(matches!(sent[0].1, ViewerPacket::Remove { .. }));
        assert_eq!(sent[1].0, vec![4]);
        assert!(matches!(sent[1].1, ViewerPacket::Spawn { .. }));

        let viewers = fx.tracker.viewers(id).unwrap();
        assert_eq!(viewers, [2, 4].into_iter().collect());
    }

    #[test]
    fn test_concurrent_track_release() {
        let fx = fixture();
        let tracker = Arc::new(fx.tracker);
        let models: Arc<Vec<Model<TestHost>>> = Arc::new((1..=8).map(spawned).collect());

        let workers: Vec<_> = (0..4u32)
            .map(|worker| {
                let tracker = Arc::clone(&tracker);
                let models = Arc::clone(&models);
                thread::spawn(move || {
                    let (mut tracked, mut released) = (0usize, 0usize);
                    for round in 0..250 {
                        for model in models.iter() {
                            if tracker.track(model.clone()).unwrap() {
                                tracked += 1;
                            }
                            let _ = tracker.add_viewer(model.id(), worker);
                            if (round + worker) % 3 != 0 && tracker.release(model.id()).is_some() {
                                released += 1;
                            }
                        }
                    }
                    (tracked, released)
                })
            })
            .collect();

        let (mut tracked, mut released) = (0, 0);
        for worker in workers {
            let (t, r) = worker.join().unwrap();
            tracked += t;
            released += r;
        }

        // Every successful track is either released or still live.
        assert!(tracked >= models.len());
        assert_eq!(tracker.len(), tracked - released);
        assert!(tracker.len() <= models.len());

        for model in models.iter() {
            let id = model.id();
            match tracker.viewers(id) {
                Ok(viewers) => {
                    assert!(tracker.is_tracked(id));
                    assert!(viewers.iter().all(|v| *v < 4));
                }
                Err(err) => {
                    assert!(matches!(err, WraithError::NotFound(_)));
                    assert!(!tracker.is_tracked(id));
                }
            }
        }

        for model in models.iter() {
            tracker.release(model.id());
        }
        assert!(tracker.is_empty());

        // A re-tracked model starts with no viewers from its previous entry.
        for model in models.iter() {
            assert!(tracker.track(model.clone()).unwrap());
            assert!(tracker.viewers(model.id()).unwrap().is_empty());
        }
        assert_eq!(tracker.len(), models.len());
    }

    #[test]
    fn test_sync_stats_accumulate() {
        let mut total = SyncStats::default();
        total.accumulate(&SyncStats {
            total_models: 3,
            dirty_models: 1,
            pushed_models: 1,
            properties_pushed: 4,
            properties_total: 51,
        });
        total.accumulate(&SyncStats {
            total_models: 2,
            dirty_models: 0,
            pushed_models: 0,
            properties_pushed: 0,
            properties_total: 34,
        });
        assert_eq!(total.total_models, 2);
        assert_eq!(total.properties_pushed, 4);
        assert_eq!(total.properties_total, 85);
        assert!(SyncStats::default().bandwidth_savings().abs() < f32::EPSILON);
    }
}
