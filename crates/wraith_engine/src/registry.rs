//! # Property Registry
//!
//! Binds every [`PropertyId`] to a host field once, at start-up, and
//! pairs it with a getter that encodes the model value into wire terms
//! and a setter that decodes it back.
//!
//! ## Rules
//!
//! - Resolution is all-or-nothing. A missing field or a field of the wrong
//!   wire type fails start-up with `BindingUnavailable`.
//! - After resolution the registry is immutable and shared behind an `Arc`.

use std::fmt;

use tracing::{debug, error, info};
use wraith_core::{DirtySet, HostTypes, Model};
use wraith_shared::constants::{
    FLAG_GLOWING, NO_OVERRIDE, TEXT_FLAG_ALIGN_LEFT, TEXT_FLAG_ALIGN_RIGHT,
    TEXT_FLAG_DEFAULT_BACKGROUND, TEXT_FLAG_SEE_THROUGH, TEXT_FLAG_SHADOW,
};
use wraith_shared::{
    Billboard, Brightness, Color, PropertyId, TextAlignment, ViewTransform,
    WraithError, WraithResult,
};

use crate::packet::{FieldWrite, PropertyValue};
use crate::schema::{FieldHandle, HostSchema};

/// Reads a property from a model. `None` if the model's variant does not
/// carry it.
pub type Getter<H> = fn(&Model<H>) -> Option<PropertyValue<H>>;

/// Writes a property to a model through its normal setter.
pub type Setter<H> = fn(&mut Model<H>, PropertyValue<H>) -> WraithResult<()>;

/// A resolved property.
pub struct Binding<H: HostTypes> {
    /// Symbolic property.
    pub property: PropertyId,
    /// Host field.
    pub field: FieldHandle,
    /// Encoder.
    pub get: Getter<H>,
    /// Decoder.
    pub set: Setter<H>,
}

impl<H: HostTypes> Clone for Binding<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: HostTypes> Copy for Binding<H> {}

impl<H: HostTypes> fmt::Debug for Binding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("property", &self.property)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Start-up-resolved table of bindings, indexed by [`PropertyId`].
pub struct PropertyRegistry<H: HostTypes> {
    schema_version: String,
    bindings: Vec<Binding<H>>,
}

impl<H: HostTypes> fmt::Debug for PropertyRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("schema_version", &self.schema_version)
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

impl<H: HostTypes> PropertyRegistry<H> {
    /// Resolves every property against `schema`.
    ///
    /// # Errors
    ///
    /// `BindingUnavailable` naming the first property the schema cannot
    /// carry.
    pub fn resolve(schema: &dyn HostSchema) -> WraithResult<Self> {
        let mut bindings = Vec::with_capacity(PropertyId::COUNT);

        for property in PropertyId::ALL {
            let field = schema.field(property).ok_or_else(|| {
                unavailable(schema, property, "host layout has no such field".to_string())
            })?;

            let expected = property.expected_kind();
            if field.kind != expected {
                return Err(unavailable(
                    schema,
                    property,
                    format!("field {field} has wire type {:?}, expected {expected:?}", field.kind),
                ));
            }

            let (get, set) = accessors::<H>(property);
            bindings.push(Binding {
                property,
                field,
                get,
                set,
            });
        }

        info!(
            schema = schema.version(),
            properties = bindings.len(),
            "Property registry resolved"
        );

        Ok(Self {
            schema_version: schema.version().to_string(),
            bindings,
        })
    }

    /// Version of the schema the registry was resolved against.
    #[must_use]
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Binding for `property`.
    #[inline]
    #[must_use]
    pub fn binding(&self, property: PropertyId) -> Option<&Binding<H>> {
        self.bindings.get(property.index())
    }

    /// Host field for `property`.
    #[must_use]
    pub fn field(&self, property: PropertyId) -> Option<FieldHandle> {
        self.binding(property).map(|b| b.field)
    }

    /// Number of bound properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Encodes `property` from `model`.
    #[must_use]
    pub fn get(&self, model: &Model<H>, property: PropertyId) -> Option<PropertyValue<H>> {
        self.binding(property).and_then(|b| (b.get)(model))
    }

    /// Decodes `value` into `model` through the property's setter.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` on a value of the wrong wire type or a
    /// property the model's variant lacks. `InvalidArgument` when the
    /// decoded value is out of range.
    pub fn set(
        &self,
        model: &mut Model<H>,
        property: PropertyId,
        value: PropertyValue<H>,
    ) -> WraithResult<()> {
        let binding = self.binding(property).ok_or_else(|| {
            WraithError::PreconditionViolation(format!("{property:?} is not bound"))
        })?;
        (binding.set)(model, value)
    }

    /// Translates a dirty set into field writes, in wire order.
    ///
    /// Properties the model's variant lacks are skipped.
    #[must_use]
    pub fn writes(&self, model: &Model<H>, properties: DirtySet) -> Vec<FieldWrite<H>> {
        let mut writes = Vec::with_capacity(properties.len());
        for property in properties {
            let Some(binding) = self.binding(property) else {
                continue;
            };
            if let Some(value) = (binding.get)(model) {
                writes.push(FieldWrite {
                    property,
                    field: binding.field,
                    value,
                });
            }
        }
        debug!(
            model = %model.id(),
            requested = properties.len(),
            written = writes.len(),
            "Translated dirty properties"
        );
        writes
    }

    /// Every property the model carries, in wire order.
    #[must_use]
    pub fn full_writes(&self, model: &Model<H>) -> Vec<FieldWrite<H>> {
        self.writes(model, model.full_set())
    }
}

fn unavailable(schema: &dyn HostSchema, property: PropertyId, reason: String) -> WraithError {
    error!(
        ?property,
        schema = schema.version(),
        %reason,
        "Cannot bind property, refusing to start"
    );
    WraithError::BindingUnavailable {
        property,
        schema: schema.version().to_string(),
        reason,
    }
}

// =============================================================================
// ENCODING
// =============================================================================

#[inline]
fn color_to_int(color: Color) -> i32 {
    i32::from_ne_bytes(color.to_argb().to_ne_bytes())
}

#[inline]
fn int_to_color(value: i32) -> Color {
    Color::from_argb(u32::from_ne_bytes(value.to_ne_bytes()))
}

#[inline]
fn id_to_byte(id: u8) -> i8 {
    i8::from_ne_bytes([id])
}

#[inline]
fn byte_to_id(byte: i8) -> u8 {
    u8::from_ne_bytes(byte.to_ne_bytes())
}

fn glow_to_int(color: Color) -> i32 {
    if color.is_transparent() {
        NO_OVERRIDE
    } else {
        color_to_int(color)
    }
}

fn brightness_to_int(brightness: Option<Brightness>) -> i32 {
    brightness.map_or(NO_OVERRIDE, Brightness::packed)
}

fn style_from_flags(flags: i8) -> (bool, bool, bool, TextAlignment) {
    let alignment = if flags & TEXT_FLAG_ALIGN_LEFT != 0 {
        TextAlignment::Left
    } else if flags & TEXT_FLAG_ALIGN_RIGHT != 0 {
        TextAlignment::Right
    } else {
        TextAlignment::Center
    };
    (
        flags & TEXT_FLAG_SHADOW != 0,
        flags & TEXT_FLAG_SEE_THROUGH != 0,
        flags & TEXT_FLAG_DEFAULT_BACKGROUND != 0,
        alignment,
    )
}

fn mismatch<H: HostTypes>(property: PropertyId, value: &PropertyValue<H>) -> WraithError {
    WraithError::PreconditionViolation(format!(
        "{property:?} takes {:?}, got {:?}",
        property.expected_kind(),
        value.kind()
    ))
}

macro_rules! bind {
    ($get:expr, $set:expr $(,)?) => {{
        let get: Getter<H> = $get;
        let set: Setter<H> = $set;
        (get, set)
    }};
}

macro_rules! expect {
    ($property:expr, $value:expr, $variant:ident) => {
        match $value {
            PropertyValue::$variant(v) => v,
            other => return Err(mismatch($property, &other)),
        }
    };
}

/// Getter and setter for one property.
#[allow(clippy::too_many_lines)]
fn accessors<H: HostTypes>(property: PropertyId) -> (Getter<H>, Setter<H>) {
    use PropertyId as P;

    match property {
        P::Translation => bind!(
            |m| Some(PropertyValue::Vector3(m.transform().translation())),
            |m, v| {
                let v = expect!(P::Translation, v, Vector3);
                m.set_translation(v);
                Ok(())
            },
        ),
        P::Scale => bind!(
            |m| Some(PropertyValue::Vector3(m.transform().scale())),
            |m, v| {
                let v = expect!(P::Scale, v, Vector3);
                m.edit_transform(|t| {
                    t.set_scale(v);
                });
                Ok(())
            },
        ),
        P::LeftRotation => bind!(
            |m| Some(PropertyValue::Quaternion(m.transform().left_rotation())),
            |m, v| {
                let q = expect!(P::LeftRotation, v, Quaternion);
                m.edit_transform(|t| {
                    t.set_left_rotation(q);
                });
                Ok(())
            },
        ),
        P::RightRotation => bind!(
            |m| Some(PropertyValue::Quaternion(m.transform().right_rotation())),
            |m, v| {
                let q = expect!(P::RightRotation, v, Quaternion);
                m.edit_transform(|t| {
                    t.set_right_rotation(q);
                });
                Ok(())
            },
        ),
        P::ViewRange => bind!(
            |m| Some(PropertyValue::Float(m.view_range())),
            |m, v| {
                m.set_view_range(expect!(P::ViewRange, v, Float));
                Ok(())
            },
        ),
        P::ShadowRadius => bind!(
            |m| Some(PropertyValue::Float(m.shadow().radius())),
            |m, v| {
                m.set_shadow_radius(expect!(P::ShadowRadius, v, Float))?;
                Ok(())
            },
        ),
        P::ShadowStrength => bind!(
            |m| Some(PropertyValue::Float(m.shadow().strength())),
            |m, v| {
                m.set_shadow_strength(expect!(P::ShadowStrength, v, Float));
                Ok(())
            },
        ),
        P::GlowColor => bind!(
            |m| Some(PropertyValue::Int(glow_to_int(m.glow_color()))),
            |m, v| {
                let raw = expect!(P::GlowColor, v, Int);
                let color = if raw == NO_OVERRIDE {
                    Color::TRANSPARENT
                } else {
                    int_to_color(raw)
                };
                m.set_glow_color(color);
                Ok(())
            },
        ),
        P::Billboard => bind!(
            |m| Some(PropertyValue::Byte(id_to_byte(m.billboard().id()))),
            |m, v| {
                let raw = expect!(P::Billboard, v, Byte);
                let billboard = Billboard::from_id(byte_to_id(raw)).ok_or_else(|| {
                    WraithError::invalid_argument("billboard", format!("unknown mode {raw}"))
                })?;
                m.set_billboard(billboard);
                Ok(())
            },
        ),
        P::Brightness => bind!(
            |m| Some(PropertyValue::Int(brightness_to_int(m.brightness()))),
            |m, v| {
                let raw = expect!(P::Brightness, v, Int);
                let brightness = if raw == NO_OVERRIDE {
                    None
                } else {
                    Some(Brightness::from_packed(raw)?)
                };
                m.set_brightness(brightness);
                Ok(())
            },
        ),
        P::CullingWidth => bind!(
            |m| Some(PropertyValue::Float(m.culling().width)),
            |m, v| {
                m.set_culling_width(expect!(P::CullingWidth, v, Float));
                Ok(())
            },
        ),
        P::CullingHeight => bind!(
            |m| Some(PropertyValue::Float(m.culling().height)),
            |m, v| {
                m.set_culling_height(expect!(P::CullingHeight, v, Float));
                Ok(())
            },
        ),
        P::InterpolationDelay => bind!(
            |m| Some(PropertyValue::Int(m.interpolation().delay())),
            |m, v| {
                m.interpolate_after(expect!(P::InterpolationDelay, v, Int));
                Ok(())
            },
        ),
        P::InterpolationDuration => bind!(
            |m| Some(PropertyValue::Int(m.interpolation().duration())),
            |m, v| {
                m.interpolate_over(expect!(P::InterpolationDuration, v, Int));
                Ok(())
            },
        ),
        P::TeleportDuration => bind!(
            |m| Some(PropertyValue::Int(m.interpolation().teleport())),
            |m, v| {
                m.set_teleport_duration(expect!(P::TeleportDuration, v, Int))?;
                Ok(())
            },
        ),
        P::SharedFlags => bind!(
            |m| {
                let flags = if m.is_glowing() { FLAG_GLOWING } else { 0 };
                Some(PropertyValue::Byte(flags))
            },
            |m, v| {
                let glowing = expect!(P::SharedFlags, v, Byte) & FLAG_GLOWING != 0;
                let color = match (glowing, m.is_glowing()) {
                    (true, false) => Color::WHITE,
                    (false, _) => Color::TRANSPARENT,
                    (true, true) => m.glow_color(),
                };
                m.set_glow_color(color);
                Ok(())
            },
        ),
        P::BlockState => bind!(
            |m| {
                m.as_block()
                    .map(|b| PropertyValue::BlockState(b.block().clone()))
            },
            |m, v| {
                let block = expect!(P::BlockState, v, BlockState);
                m.block_mut()?.set_block(block);
                Ok(())
            },
        ),
        P::ItemStack => bind!(
            |m| m.as_item().map(|i| PropertyValue::ItemStack(i.item().clone())),
            |m, v| {
                let item = expect!(P::ItemStack, v, ItemStack);
                m.item_mut()?.set_item(item);
                Ok(())
            },
        ),
        P::ItemView => bind!(
            |m| {
                m.as_item()
                    .map(|i| PropertyValue::Byte(id_to_byte(i.view_transform().id())))
            },
            |m, v| {
                let raw = expect!(P::ItemView, v, Byte);
                let view = ViewTransform::from_id(byte_to_id(raw)).ok_or_else(|| {
                    WraithError::invalid_argument("item view", format!("unknown transform {raw}"))
                })?;
                m.item_mut()?.set_view_transform(view);
                Ok(())
            },
        ),
        P::Text => bind!(
            |m| m.as_text().map(|t| PropertyValue::Text(t.text().clone())),
            |m, v| {
                let text = expect!(P::Text, v, Text);
                m.text_mut()?.set_text(text);
                Ok(())
            },
        ),
        P::LineWidth => bind!(
            |m| m.as_text().map(|t| PropertyValue::Int(t.line_width())),
            |m, v| {
                let width = expect!(P::LineWidth, v, Int);
                m.text_mut()?.set_line_width(width);
                Ok(())
            },
        ),
        P::BackgroundColor => bind!(
            |m| {
                m.as_text()
                    .map(|t| PropertyValue::Int(color_to_int(t.background_color())))
            },
            |m, v| {
                let raw = expect!(P::BackgroundColor, v, Int);
                m.text_mut()?.set_background_color(int_to_color(raw));
                Ok(())
            },
        ),
        P::TextOpacity => bind!(
            |m| m.as_text().map(|t| PropertyValue::Byte(t.text_opacity())),
            |m, v| {
                let opacity = expect!(P::TextOpacity, v, Byte);
                m.text_mut()?.set_text_opacity(opacity);
                Ok(())
            },
        ),
        P::TextStyle => bind!(
            |m| m.as_text().map(|t| PropertyValue::Byte(t.style_flags())),
            |m, v| {
                let (shadow, see_through, default_background, alignment) =
                    style_from_flags(expect!(P::TextStyle, v, Byte));
                m.text_mut()?
                    .set_shadow(shadow)
                    .set_see_through(see_through)
                    .set_default_background(default_background)
                    .set_alignment(alignment);
                Ok(())
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DisplaySchema;
    use glam::{DVec3, Vec3};
    use wraith_core::Location;
    use wraith_shared::FieldKind;

    #[derive(Clone, Debug)]
    struct TestHost;

    impl HostTypes for TestHost {
        type Viewer = u32;
        type World = &'static str;
        type BlockState = String;
        type ItemStack = String;
        type Text = String;
    }

    fn registry() -> PropertyRegistry<TestHost> {
        PropertyRegistry::resolve(&DisplaySchema::protocol_1_20_5()).unwrap()
    }

    fn anchor() -> Location<&'static str> {
        Location::new("world", DVec3::ZERO)
    }

    #[test]
    fn test_resolves_every_property() {
        let registry = registry();
        assert_eq!(registry.len(), PropertyId::COUNT);
        assert_eq!(registry.schema_version(), "1.20.5");
        for property in PropertyId::ALL {
            assert_eq!(registry.binding(property).map(|b| b.property), Some(property));
        }
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let err = PropertyRegistry::<TestHost>::resolve(&DisplaySchema::protocol_1_19_4())
            .unwrap_err();
        assert!(matches!(
            err,
            WraithError::BindingUnavailable {
                property: PropertyId::TeleportDuration,
                ..
            }
        ));
        assert!(err.to_string().contains("TeleportDuration"));
    }

    #[test]
    fn test_wrong_kind_is_fatal() {
        let schema = DisplaySchema::protocol_1_20_5().with_field(
            PropertyId::GlowColor,
            22,
            FieldKind::Float,
        );
        let err = PropertyRegistry::<TestHost>::resolve(&schema).unwrap_err();
        assert!(matches!(
            err,
            WraithError::BindingUnavailable {
                property: PropertyId::GlowColor,
                ..
            }
        ));
    }

    #[test]
    fn test_override_encodings() {
        let registry = registry();
        let mut model: Model<TestHost> = Model::block(anchor(), "stone".into());

        assert_eq!(
            registry.get(&model, PropertyId::Brightness),
            Some(PropertyValue::Int(-1))
        );
        assert_eq!(
            registry.get(&model, PropertyId::GlowColor),
            Some(PropertyValue::Int(-1))
        );
        assert_eq!(
            registry.get(&model, PropertyId::SharedFlags),
            Some(PropertyValue::Byte(0))
        );

        model.set_brightness(Some(Brightness::new(15, 3).unwrap()));
        model.set_glow_color(Color::from_argb(0xFF00_FF00));
        assert_eq!(
            registry.get(&model, PropertyId::Brightness),
            Some(PropertyValue::Int(15 << 4 | 3 << 20))
        );
        assert_eq!(
            registry.get(&model, PropertyId::GlowColor),
            Some(PropertyValue::Int(color_to_int(Color::from_argb(0xFF00_FF00))))
        );
        assert_eq!(
            registry.get(&model, PropertyId::SharedFlags),
            Some(PropertyValue::Byte(FLAG_GLOWING))
        );
    }

    #[test]
    fn test_variant_properties_skip_other_variants() {
        let registry = registry();
        let model: Model<TestHost> = Model::block(anchor(), "stone".into());
        assert_eq!(registry.get(&model, PropertyId::Text), None);
        assert_eq!(
            registry.get(&model, PropertyId::BlockState),
            Some(PropertyValue::BlockState("stone".to_string()))
        );

        let writes = registry.full_writes(&model);
        assert_eq!(writes.len(), 17);
        assert!(writes.windows(2).all(|w| w[0].property < w[1].property));
    }

    #[test]
    fn test_text_encodings() {
        let registry = registry();
        let mut model: Model<TestHost> = Model::text(anchor(), "hi".into());
        model
            .text_mut()
            .unwrap()
            .set_default_background(true)
            .set_alignment(TextAlignment::Left);

        assert_eq!(
            registry.get(&model, PropertyId::TextStyle),
            Some(PropertyValue::Byte(0x04 | 0x08))
        );
        assert_eq!(
            registry.get(&model, PropertyId::BackgroundColor),
            Some(PropertyValue::Int(0x4000_0000))
        );
        assert_eq!(
            registry.get(&model, PropertyId::TextOpacity),
            Some(PropertyValue::Byte(-1))
        );
    }

    #[test]
    fn test_setters_route_through_model() {
        let registry = registry();
        let mut model: Model<TestHost> = Model::item(anchor(), "apple".into());

        registry
            .set(&mut model, PropertyId::Translation, PropertyValue::Vector3(Vec3::X))
            .unwrap();
        registry
            .set(&mut model, PropertyId::ItemView, PropertyValue::Byte(8))
            .unwrap();
        assert_eq!(model.relative_position(), Vec3::X);
        assert_eq!(model.as_item().unwrap().view_transform(), ViewTransform::Fixed);
        assert!(model.dirty().contains(PropertyId::Translation));
        assert!(model.dirty().contains(PropertyId::ItemView));
    }

    #[test]
    fn test_setter_validation() {
        let registry = registry();
        let mut model: Model<TestHost> = Model::item(anchor(), "apple".into());

        assert!(matches!(
            registry.set(&mut model, PropertyId::TeleportDuration, PropertyValue::Int(60)),
            Err(WraithError::InvalidArgument { .. })
        ));
        assert!(matches!(
            registry.set(&mut model, PropertyId::ViewRange, PropertyValue::Int(1)),
            Err(WraithError::PreconditionViolation(_))
        ));
        assert!(matches!(
            registry.set(&mut model, PropertyId::Text, PropertyValue::Text("x".into())),
            Err(WraithError::PreconditionViolation(_))
        ));
        assert_eq!(model.interpolation().teleport(), 0);
    }

    #[test]
    fn test_writes_follow_dirty_set() {
        let registry = registry();
        let mut model: Model<TestHost> = Model::text(anchor(), "hi".into());
        model.set_view_range(2.0).translate(1.0, 0.0, 0.0);

        let writes = registry.writes(&model, *model.dirty());
        let properties: Vec<_> = writes.iter().map(|w| w.property).collect();
        assert_eq!(
            properties,
            vec![
                PropertyId::Translation,
                PropertyId::Scale,
                PropertyId::LeftRotation,
                PropertyId::RightRotation,
                PropertyId::ViewRange,
            ]
        );
        assert_eq!(writes[4].field, FieldHandle::new(17, FieldKind::Float));
    }
}
