//! # Models
//!
//! A [`Model`] is one display entity: common render state shared by every
//! variant, a [`ModelKind`] payload, and a [`DirtySet`] of properties the
//! next sync pass must push.
//!
//! ## Rules
//!
//! - Every setter marks its property dirty, even when the value is unchanged.
//! - Range-checked setters validate before mutating. On error the model is
//!   left exactly as it was.
//! - Only the sync pass clears the dirty set.
//! - The transform is relative to the spawn anchor. The absolute position is
//!   `anchor + translation`.

mod dirty;
mod variant;

pub use dirty::{DirtyIter, DirtySet};
pub use variant::{
    BlockEditor, BlockModel, ItemEditor, ItemModel, ModelKind, TextEditor, TextModel,
};

use glam::{DVec3, Mat4, Vec3};
use wraith_shared::constants::DEFAULT_VIEW_RANGE;
use wraith_shared::property::VariantKind;
use wraith_shared::{
    Billboard, Brightness, Color, Culling, EntityId, Interpolation, ModelId, PropertyId, Shadow,
    WraithError, WraithResult,
};

use crate::host::{HostTypes, Location};
use crate::transform::Transform;

/// A display entity.
#[derive(Clone, Debug)]
pub struct Model<H: HostTypes> {
    id: ModelId,
    entity_id: EntityId,
    anchor: Location<H::World>,
    transform: Transform,
    view_range: f32,
    shadow: Shadow,
    culling: Culling,
    billboard: Billboard,
    brightness: Option<Brightness>,
    glow_color: Color,
    interpolation: Interpolation,
    kind: ModelKind<H>,
    dirty: DirtySet,
}

impl<H: HostTypes> Model<H> {
    /// Creates a detached model anchored at `anchor`.
    #[must_use]
    pub fn new(anchor: Location<H::World>, kind: ModelKind<H>) -> Self {
        Self {
            id: ModelId::random(),
            entity_id: EntityId::UNSET,
            anchor,
            transform: Transform::IDENTITY,
            view_range: DEFAULT_VIEW_RANGE,
            shadow: Shadow::default(),
            culling: Culling::default(),
            billboard: Billboard::Fixed,
            brightness: None,
            glow_color: Color::TRANSPARENT,
            interpolation: Interpolation::NONE,
            kind,
            dirty: DirtySet::new(),
        }
    }

    /// Creates a detached block model.
    #[must_use]
    pub fn block(anchor: Location<H::World>, block: H::BlockState) -> Self {
        Self::new(anchor, ModelKind::Block(BlockModel::new(block)))
    }

    /// Creates a detached item model.
    #[must_use]
    pub fn item(anchor: Location<H::World>, item: H::ItemStack) -> Self {
        Self::new(anchor, ModelKind::Item(ItemModel::new(item)))
    }

    /// Creates a detached text model.
    #[must_use]
    pub fn text(anchor: Location<H::World>, text: H::Text) -> Self {
        Self::new(anchor, ModelKind::Text(TextModel::new(text)))
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Process-unique id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ModelId {
        self.id
    }

    /// Host entity id, [`EntityId::UNSET`] before spawn.
    #[inline]
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Returns true once the host has issued an entity id.
    #[inline]
    #[must_use]
    pub const fn is_spawned(&self) -> bool {
        self.entity_id.is_assigned()
    }

    /// Records the host entity id. Can happen once.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` if the model already has an id or `id` is unset.
    pub fn assign_entity_id(&mut self, id: EntityId) -> WraithResult<()> {
        if self.is_spawned() {
            return Err(WraithError::PreconditionViolation(format!(
                "model {} already spawned as entity {}",
                self.id, self.entity_id
            )));
        }
        if !id.is_assigned() {
            return Err(WraithError::PreconditionViolation(
                "entity id 0 is reserved for unspawned models".into(),
            ));
        }
        self.entity_id = id;
        Ok(())
    }

    /// Variant payload.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &ModelKind<H> {
        &self.kind
    }

    /// Variant tag.
    #[inline]
    #[must_use]
    pub const fn variant(&self) -> VariantKind {
        self.kind.variant()
    }

    // =========================================================================
    // Position
    // =========================================================================

    /// Spawn anchor.
    #[must_use]
    pub const fn anchor(&self) -> &Location<H::World> {
        &self.anchor
    }

    /// Moves the anchor. The relative transform is kept.
    ///
    /// Nothing is marked dirty: the anchor travels as a teleport, not as
    /// metadata.
    pub fn relocate(&mut self, anchor: Location<H::World>) -> &mut Self {
        self.anchor = anchor;
        self
    }

    /// Anchor position plus translation.
    #[must_use]
    pub fn absolute_position(&self) -> DVec3 {
        self.anchor.position + self.transform.translation().as_dvec3()
    }

    /// Absolute location in the anchor's world.
    #[must_use]
    pub fn absolute_location(&self) -> Location<H::World> {
        self.anchor.with_position(self.absolute_position())
    }

    /// Translation relative to the anchor.
    #[must_use]
    pub const fn relative_position(&self) -> Vec3 {
        self.transform.translation()
    }

    // =========================================================================
    // Render properties
    // =========================================================================

    /// View range multiplier.
    #[must_use]
    pub const fn view_range(&self) -> f32 {
        self.view_range
    }

    /// Sets the view range multiplier.
    pub fn set_view_range(&mut self, view_range: f32) -> &mut Self {
        self.view_range = view_range;
        self.dirty.mark(PropertyId::ViewRange);
        self
    }

    /// Shadow.
    #[must_use]
    pub const fn shadow(&self) -> Shadow {
        self.shadow
    }

    /// Replaces the shadow. Already validated by [`Shadow::new`].
    pub fn set_shadow(&mut self, shadow: Shadow) -> &mut Self {
        self.shadow = shadow;
        self.dirty.mark_all(&[PropertyId::ShadowRadius, PropertyId::ShadowStrength]);
        self
    }

    /// Sets the shadow radius.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `radius > 64`.
    pub fn set_shadow_radius(&mut self, radius: f32) -> WraithResult<&mut Self> {
        self.shadow = Shadow::new(radius, self.shadow.strength())?;
        self.dirty.mark(PropertyId::ShadowRadius);
        Ok(self)
    }

    /// Sets the shadow strength.
    pub fn set_shadow_strength(&mut self, strength: f32) -> &mut Self {
        self.shadow = self.shadow.with_strength(strength);
        self.dirty.mark(PropertyId::ShadowStrength);
        self
    }

    /// Culling box.
    #[must_use]
    pub const fn culling(&self) -> Culling {
        self.culling
    }

    /// Replaces the culling box.
    pub fn set_culling(&mut self, culling: Culling) -> &mut Self {
        self.culling = culling;
        self.dirty.mark_all(&[PropertyId::CullingWidth, PropertyId::CullingHeight]);
        self
    }

    /// Sets the culling width.
    pub fn set_culling_width(&mut self, width: f32) -> &mut Self {
        self.culling.width = width;
        self.dirty.mark(PropertyId::CullingWidth);
        self
    }

    /// Sets the culling height.
    pub fn set_culling_height(&mut self, height: f32) -> &mut Self {
        self.culling.height = height;
        self.dirty.mark(PropertyId::CullingHeight);
        self
    }

    /// Billboard mode.
    #[must_use]
    pub const fn billboard(&self) -> Billboard {
        self.billboard
    }

    /// Sets the billboard mode.
    pub fn set_billboard(&mut self, billboard: Billboard) -> &mut Self {
        self.billboard = billboard;
        self.dirty.mark(PropertyId::Billboard);
        self
    }

    /// Light override, `None` when the host lights the model.
    #[must_use]
    pub const fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    /// Sets or clears the light override.
    pub fn set_brightness(&mut self, brightness: Option<Brightness>) -> &mut Self {
        self.brightness = brightness;
        self.dirty.mark(PropertyId::Brightness);
        self
    }

    /// Sets the block light channel. Without an override the sky channel
    /// starts at 0.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `level` is outside `0..=15`.
    pub fn set_block_light(&mut self, level: i32) -> WraithResult<&mut Self> {
        let sky = self.brightness.map_or(0, Brightness::sky_light);
        let brightness = Brightness::new(level, sky)?;
        Ok(self.set_brightness(Some(brightness)))
    }

    /// Sets the sky light channel. Without an override the block channel
    /// starts at 0.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `level` is outside `0..=15`.
    pub fn set_sky_light(&mut self, level: i32) -> WraithResult<&mut Self> {
        let block = self.brightness.map_or(0, Brightness::block_light);
        let brightness = Brightness::new(block, level)?;
        Ok(self.set_brightness(Some(brightness)))
    }

    /// Glow outline color. Transparent means no glow.
    #[must_use]
    pub const fn glow_color(&self) -> Color {
        self.glow_color
    }

    /// Returns true if the glow outline is on.
    #[must_use]
    pub const fn is_glowing(&self) -> bool {
        !self.glow_color.is_transparent()
    }

    /// Sets the glow color. Also toggles the glowing flag.
    pub fn set_glow_color(&mut self, color: Color) -> &mut Self {
        self.glow_color = color;
        self.dirty.mark_all(&[PropertyId::GlowColor, PropertyId::SharedFlags]);
        self
    }

    // =========================================================================
    // Interpolation
    // =========================================================================

    /// Interpolation window.
    #[must_use]
    pub const fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Replaces the interpolation window.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) -> &mut Self {
        self.interpolation = interpolation;
        self.dirty.mark_all(&[
            PropertyId::InterpolationDelay,
            PropertyId::InterpolationDuration,
            PropertyId::TeleportDuration,
        ]);
        self
    }

    /// Sets the ticks before the next tween starts.
    pub fn interpolate_after(&mut self, delay: i32) -> &mut Self {
        self.interpolation = self.interpolation.with_delay(delay);
        self.dirty.mark(PropertyId::InterpolationDelay);
        self
    }

    /// Sets the transform tween length.
    pub fn interpolate_over(&mut self, duration: i32) -> &mut Self {
        self.interpolation = self.interpolation.with_duration(duration);
        self.dirty.mark(PropertyId::InterpolationDuration);
        self
    }

    /// Sets the teleport tween length.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `duration` is outside `0..=59`.
    pub fn set_teleport_duration(&mut self, duration: i32) -> WraithResult<&mut Self> {
        let current = self.interpolation;
        self.interpolation = Interpolation::new(current.delay(), current.duration(), duration)?;
        self.dirty.mark(PropertyId::TeleportDuration);
        Ok(self)
    }

    // =========================================================================
    // Transform
    // =========================================================================

    /// Current transform.
    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current transform as a matrix.
    #[must_use]
    pub fn transform_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// Runs `f` on the transform and marks the transform group dirty once.
    pub fn edit_transform(&mut self, f: impl FnOnce(&mut Transform)) -> &mut Self {
        f(&mut self.transform);
        self.dirty.mark_transform();
        self
    }

    /// Runs `f` on the transform matrix and decomposes the result.
    pub fn edit_matrix(&mut self, f: impl FnOnce(&mut Mat4)) -> &mut Self {
        let mut matrix = self.transform.to_matrix();
        f(&mut matrix);
        self.set_transform_matrix(matrix)
    }

    /// Replaces the transform.
    pub fn set_transform(&mut self, transform: Transform) -> &mut Self {
        self.edit_transform(|t| *t = transform)
    }

    /// Replaces the transform with a decomposed matrix.
    pub fn set_transform_matrix(&mut self, matrix: Mat4) -> &mut Self {
        self.set_transform(Transform::from_matrix(matrix))
    }

    /// Post-multiplies the transform matrix by `matrix`.
    pub fn apply_matrix(&mut self, matrix: Mat4) -> &mut Self {
        self.edit_matrix(|m| *m *= matrix)
    }

    /// Resets the transform to identity.
    pub fn reset_matrix(&mut self) -> &mut Self {
        self.set_transform(Transform::IDENTITY)
    }

    /// Offsets the translation.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.edit_transform(|t| {
            t.translate_by(dx, dy, dz);
        })
    }

    /// Replaces the translation.
    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.edit_transform(|t| {
            t.set_translation(translation);
        })
    }

    /// Multiplies the scale uniformly.
    pub fn scale(&mut self, factor: f32) -> &mut Self {
        self.edit_transform(|t| {
            t.scale_uniform(factor);
        })
    }

    /// Multiplies the scale per axis.
    pub fn scale_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.edit_transform(|t| {
            t.scale_by(x, y, z);
        })
    }

    /// Rotates the left rotation by `angle` radians about `axis`.
    pub fn rotate_left(&mut self, angle: f32, axis: Vec3) -> &mut Self {
        self.edit_transform(|t| {
            t.rotate_left_by(angle, axis);
        })
    }

    /// Rotates the right rotation by `angle` radians about `axis`.
    pub fn rotate_right(&mut self, angle: f32, axis: Vec3) -> &mut Self {
        self.edit_transform(|t| {
            t.rotate_right_by(angle, axis);
        })
    }

    /// Sets the interpolation window, then edits the transform.
    pub fn interpolate_transform(
        &mut self,
        delay: i32,
        duration: i32,
        f: impl FnOnce(&mut Transform),
    ) -> &mut Self {
        self.interpolate_after(delay)
            .interpolate_over(duration)
            .edit_transform(f)
    }

    /// Sets the interpolation window, then edits the matrix.
    pub fn interpolate_matrix(
        &mut self,
        delay: i32,
        duration: i32,
        f: impl FnOnce(&mut Mat4),
    ) -> &mut Self {
        self.interpolate_after(delay)
            .interpolate_over(duration)
            .edit_matrix(f)
    }

    /// Edits the transform with a one-tick tween starting immediately.
    pub fn interpolate_transform_now(&mut self, f: impl FnOnce(&mut Transform)) -> &mut Self {
        self.interpolate_transform(0, 1, f)
    }

    /// Moves the model to `target` by offsetting its relative translation,
    /// tweening over `duration` ticks.
    pub fn render_at(&mut self, target: DVec3, duration: i32) -> &mut Self {
        self.render_at_with(target, duration, |_| {})
    }

    /// Like [`Self::render_at`], running `extra` on the transform after the
    /// offset is applied.
    pub fn render_at_with(
        &mut self,
        target: DVec3,
        duration: i32,
        extra: impl FnOnce(&mut Transform),
    ) -> &mut Self {
        // Single precision is enough for an offset from the anchor.
        let delta = (target - self.absolute_position()).as_vec3();
        self.edit_transform(|t| {
            t.translate_by_vec(delta);
            extra(t);
        })
        .interpolate_over(duration)
    }

    // =========================================================================
    // Variant access
    // =========================================================================

    /// Block payload, if this is a block model.
    #[must_use]
    pub const fn as_block(&self) -> Option<&BlockModel<H>> {
        match &self.kind {
            ModelKind::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Item payload, if this is an item model.
    #[must_use]
    pub const fn as_item(&self) -> Option<&ItemModel<H>> {
        match &self.kind {
            ModelKind::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Text payload, if this is a text model.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextModel<H>> {
        match &self.kind {
            ModelKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Block editor.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` if this is not a block model.
    pub fn block_mut(&mut self) -> WraithResult<BlockEditor<'_, H>> {
        match &mut self.kind {
            ModelKind::Block(block) => Ok(BlockEditor::new(block, &mut self.dirty)),
            other => Err(wrong_variant(VariantKind::Block, other.variant())),
        }
    }

    /// Item editor.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` if this is not an item model.
    pub fn item_mut(&mut self) -> WraithResult<ItemEditor<'_, H>> {
        match &mut self.kind {
            ModelKind::Item(item) => Ok(ItemEditor::new(item, &mut self.dirty)),
            other => Err(wrong_variant(VariantKind::Item, other.variant())),
        }
    }

    /// Text editor.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` if this is not a text model.
    pub fn text_mut(&mut self) -> WraithResult<TextEditor<'_, H>> {
        match &mut self.kind {
            ModelKind::Text(text) => Ok(TextEditor::new(text, &mut self.dirty)),
            other => Err(wrong_variant(VariantKind::Text, other.variant())),
        }
    }

    // =========================================================================
    // Dirty tracking
    // =========================================================================

    /// Properties changed since the last sync.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    /// Returns true if anything is pending.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Returns and clears the pending set. Called by the sync pass.
    #[inline]
    pub fn take_dirty(&mut self) -> DirtySet {
        self.dirty.take()
    }

    /// Every property this model carries.
    #[must_use]
    pub fn full_set(&self) -> DirtySet {
        DirtySet::full(self.variant())
    }
}

fn wrong_variant(expected: VariantKind, actual: VariantKind) -> WraithError {
    WraithError::PreconditionViolation(format!("expected a {expected:?} model, found {actual:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use wraith_shared::{TextAlignment, ViewTransform};

    #[derive(Clone, Debug)]
    struct TestHost;

    impl HostTypes for TestHost {
        type Viewer = u32;
        type World = &'static str;
        type BlockState = String;
        type ItemStack = String;
        type Text = String;
    }

    fn anchor(x: f64, y: f64, z: f64) -> Location<&'static str> {
        Location::new("world", DVec3::new(x, y, z))
    }

    fn text_model() -> Model<TestHost> {
        Model::text(anchor(0.0, 0.0, 0.0), "hello".to_string())
    }

    #[test]
    fn test_fresh_model_defaults() {
        let model: Model<TestHost> = Model::block(anchor(1.0, 2.0, 3.0), String::new());
        assert!(!model.is_spawned());
        assert!(!model.is_dirty());
        assert_eq!(model.view_range(), 1.0);
        assert_eq!(model.shadow(), Shadow::default());
        assert_eq!(model.culling(), Culling::default());
        assert_eq!(model.billboard(), Billboard::Fixed);
        assert_eq!(model.brightness(), None);
        assert!(!model.is_glowing());
        assert_eq!(model.interpolation(), Interpolation::NONE);
        assert_eq!(model.absolute_position(), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_setters_mark_dirty_even_when_unchanged() {
        let mut model = text_model();
        model.set_view_range(1.0);
        assert!(model.dirty().contains(PropertyId::ViewRange));
        model.set_culling_height(0.0);
        assert!(model.dirty().contains(PropertyId::CullingHeight));
    }

    #[test]
    fn test_brightness_out_of_range_keeps_previous() {
        let mut model = text_model();
        model.set_brightness(Some(Brightness::new(3, 4).unwrap()));
        model.take_dirty();

        for bad in [-1, 16, 255] {
            assert!(matches!(
                model.set_block_light(bad),
                Err(WraithError::InvalidArgument { .. })
            ));
            assert!(model.set_sky_light(bad).is_err());
        }
        assert_eq!(model.brightness(), Some(Brightness::new(3, 4).unwrap()));
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_single_light_channel_starts_from_zero() {
        let mut model = text_model();
        model.set_sky_light(9).unwrap();
        assert_eq!(model.brightness(), Some(Brightness::new(0, 9).unwrap()));
    }

    #[test]
    fn test_teleport_duration_range() {
        let mut model = text_model();
        model.set_teleport_duration(59).unwrap();
        assert!(model.set_teleport_duration(60).is_err());
        assert!(model.set_teleport_duration(-1).is_err());
        assert_eq!(model.interpolation().teleport(), 59);
    }

    #[test]
    fn test_shadow_radius_range() {
        let mut model = text_model();
        model.set_shadow_radius(10.0).unwrap();
        model.take_dirty();
        assert!(model.set_shadow_radius(65.0).is_err());
        assert_eq!(model.shadow().radius(), 10.0);
        assert!(!model.dirty().contains(PropertyId::ShadowRadius));
    }

    #[test]
    fn test_single_field_setters_keep_siblings() {
        let mut model = text_model();
        model.set_shadow_radius(8.0).unwrap();
        model.set_teleport_duration(30).unwrap();
        model.take_dirty();

        model.set_shadow_strength(0.5).interpolate_after(3).interpolate_over(12);

        assert_eq!(model.shadow(), Shadow::new(8.0, 0.5).unwrap());
        assert_eq!(model.interpolation(), Interpolation::new(3, 12, 30).unwrap());
        let dirty: Vec<_> = model.dirty().iter().collect();
        assert_eq!(
            dirty,
            vec![
                PropertyId::ShadowStrength,
                PropertyId::InterpolationDelay,
                PropertyId::InterpolationDuration,
            ]
        );
    }

    #[test]
    fn test_edit_transform_marks_group_once() {
        let mut model = text_model();
        model.edit_transform(|t| {
            t.translate_by(1.0, 0.0, 0.0)
                .scale_uniform(2.0)
                .rotate_left_by(FRAC_PI_2, Vec3::Y);
        });
        let dirty: Vec<_> = model.dirty().iter().collect();
        assert_eq!(dirty, PropertyId::TRANSFORM.to_vec());
    }

    #[test]
    fn test_glow_marks_shared_flags() {
        let mut model = text_model();
        model.set_glow_color(Color::from_hex("#FF0000").unwrap());
        assert!(model.is_glowing());
        assert!(model.dirty().contains(PropertyId::GlowColor));
        assert!(model.dirty().contains(PropertyId::SharedFlags));
    }

    #[test]
    fn test_render_at_offsets_from_anchor() {
        let mut model: Model<TestHost> = Model::block(anchor(0.0, 5.0, 0.0), String::new());
        model.render_at(DVec3::new(10.0, 5.0, 10.0), 20);

        assert_eq!(model.relative_position(), Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(model.interpolation().duration(), 20);
        assert_eq!(model.absolute_position(), DVec3::new(10.0, 5.0, 10.0));
        assert_eq!(model.anchor().position, DVec3::new(0.0, 5.0, 0.0));

        // A second move is relative to the new absolute position.
        model.render_at_with(DVec3::new(10.0, 7.0, 10.0), 5, |t| {
            t.scale_uniform(2.0);
        });
        assert_eq!(model.relative_position(), Vec3::new(10.0, 2.0, 10.0));
        assert_eq!(model.transform().scale(), Vec3::splat(2.0));
        assert_eq!(model.interpolation().duration(), 5);
    }

    #[test]
    fn test_interpolate_transform_sets_window() {
        let mut model = text_model();
        model.interpolate_transform(3, 12, |t| {
            t.translate_by(0.0, 1.0, 0.0);
        });
        assert_eq!(model.interpolation().delay(), 3);
        assert_eq!(model.interpolation().duration(), 12);
        assert!(model.dirty().contains(PropertyId::InterpolationDelay));
        assert!(model.dirty().contains(PropertyId::Translation));

        model.interpolate_transform_now(|_| {});
        assert_eq!(model.interpolation().delay(), 0);
        assert_eq!(model.interpolation().duration(), 1);
    }

    #[test]
    fn test_matrix_edits() {
        let mut model = text_model();
        model.apply_matrix(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert!(model
            .relative_position()
            .abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));

        model.reset_matrix();
        assert_eq!(*model.transform(), Transform::IDENTITY);
    }

    #[test]
    fn test_text_defaults_and_opacity() {
        let mut model = text_model();
        let text = model.as_text().unwrap();
        assert_eq!(text.line_width(), 200);
        assert_eq!(text.background_color().to_argb(), 0x4000_0000);
        assert_eq!(text.text_opacity(), -1);
        assert_eq!(text.alignment(), TextAlignment::Center);
        assert_eq!(text.style_flags(), 0);

        model.text_mut().unwrap().set_text_opacity(-1);
        assert_eq!(model.as_text().unwrap().text_opacity(), -1);
        assert!(model.dirty().contains(PropertyId::TextOpacity));
    }

    #[test]
    fn test_text_style_flags() {
        let mut model = text_model();
        model
            .text_mut()
            .unwrap()
            .set_shadow(true)
            .set_see_through(true)
            .set_alignment(TextAlignment::Right);
        assert_eq!(model.as_text().unwrap().style_flags(), 0x01 | 0x02 | 0x10);
    }

    #[test]
    fn test_wrong_variant_editor() {
        let mut model = text_model();
        assert!(matches!(
            model.block_mut(),
            Err(WraithError::PreconditionViolation(_))
        ));
        assert!(model.item_mut().is_err());
        assert!(model.text_mut().is_ok());
    }

    #[test]
    fn test_item_view_shortcuts() {
        let mut model: Model<TestHost> = Model::item(anchor(0.0, 0.0, 0.0), "diamond".into());
        assert_eq!(
            model.as_item().unwrap().view_transform(),
            ViewTransform::None
        );
        model.item_mut().unwrap().head_view();
        assert_eq!(
            model.as_item().unwrap().view_transform(),
            ViewTransform::Head
        );
        assert!(model.dirty().contains(PropertyId::ItemView));
    }

    #[test]
    fn test_entity_id_assigned_once() {
        let mut model = text_model();
        assert!(model.assign_entity_id(EntityId::UNSET).is_err());
        model.assign_entity_id(EntityId(7)).unwrap();
        assert!(model.is_spawned());
        assert!(matches!(
            model.assign_entity_id(EntityId(8)),
            Err(WraithError::PreconditionViolation(_))
        ));
        assert_eq!(model.entity_id(), EntityId(7));
    }
}
