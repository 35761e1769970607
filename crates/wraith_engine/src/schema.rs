//! # Host Schemas
//!
//! A schema describes where each symbolic property lives in the host's
//! entity metadata for one range of host versions. Start-up picks the
//! first schema that accepts the declared host version, then the
//! registry resolves every property against it.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};
use wraith_shared::{FieldKind, PropertyId, WraithError, WraithResult};

/// Location and wire type of one host metadata field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldHandle {
    /// Metadata index.
    pub index: u8,
    /// Wire type.
    pub kind: FieldKind,
}

impl FieldHandle {
    /// Creates a handle.
    #[must_use]
    pub const fn new(index: u8, kind: FieldKind) -> Self {
        Self { index, kind }
    }
}

impl fmt::Display for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({:?})", self.index, self.kind)
    }
}

/// A host's entity field layout.
pub trait HostSchema: Send + Sync {
    /// Human-readable schema version.
    fn version(&self) -> &str;

    /// Returns true if this layout applies to `host_version`.
    fn is_compatible(&self, host_version: &str) -> bool;

    /// Field carrying `property`, if the layout has one.
    fn field(&self, property: PropertyId) -> Option<FieldHandle>;
}

/// Table-backed schema.
#[derive(Clone, Debug)]
pub struct DisplaySchema {
    version: String,
    accepts: Vec<String>,
    fields: [Option<FieldHandle>; PropertyId::COUNT],
}

impl DisplaySchema {
    /// Creates an empty layout accepting the listed host versions.
    #[must_use]
    pub fn new(version: impl Into<String>, accepts: &[&str]) -> Self {
        Self {
            version: version.into(),
            accepts: accepts.iter().map(ToString::to_string).collect(),
            fields: [None; PropertyId::COUNT],
        }
    }

    /// Places `property` at `index`.
    #[must_use]
    pub fn with_field(mut self, property: PropertyId, index: u8, kind: FieldKind) -> Self {
        self.fields[property.index()] = Some(FieldHandle::new(index, kind));
        self
    }

    /// Drops `property` from the layout.
    #[must_use]
    pub fn without_field(mut self, property: PropertyId) -> Self {
        self.fields[property.index()] = None;
        self
    }

    /// Display entity layout for 1.20.5 and 1.20.6.
    #[must_use]
    pub fn protocol_1_20_5() -> Self {
        use FieldKind::{BlockState, Byte, Component, Float, ItemStack, Quaternion, VarInt, Vector3};
        use PropertyId as P;

        Self::new("1.20.5", &["1.20.5", "1.20.6"])
            .with_field(P::SharedFlags, 0, Byte)
            .with_field(P::InterpolationDelay, 8, VarInt)
            .with_field(P::InterpolationDuration, 9, VarInt)
            .with_field(P::TeleportDuration, 10, VarInt)
            .with_field(P::Translation, 11, Vector3)
            .with_field(P::Scale, 12, Vector3)
            .with_field(P::LeftRotation, 13, Quaternion)
            .with_field(P::RightRotation, 14, Quaternion)
            .with_field(P::Billboard, 15, Byte)
            .with_field(P::Brightness, 16, VarInt)
            .with_field(P::ViewRange, 17, Float)
            .with_field(P::ShadowRadius, 18, Float)
            .with_field(P::ShadowStrength, 19, Float)
            .with_field(P::CullingWidth, 20, Float)
            .with_field(P::CullingHeight, 21, Float)
            .with_field(P::GlowColor, 22, VarInt)
            .with_field(P::BlockState, 23, BlockState)
            .with_field(P::ItemStack, 23, ItemStack)
            .with_field(P::ItemView, 24, Byte)
            .with_field(P::Text, 23, Component)
            .with_field(P::LineWidth, 24, VarInt)
            .with_field(P::BackgroundColor, 25, VarInt)
            .with_field(P::TextOpacity, 26, Byte)
            .with_field(P::TextStyle, 27, Byte)
    }

    /// Display entity layout for 1.19.4 through 1.20.1.
    ///
    /// These versions have no teleport duration field, so a registry can
    /// never bind against this layout.
    #[must_use]
    pub fn protocol_1_19_4() -> Self {
        use FieldKind::{BlockState, Byte, Component, Float, ItemStack, Quaternion, VarInt, Vector3};
        use PropertyId as P;

        Self::new("1.19.4", &["1.19.4", "1.20", "1.20.1"])
            .with_field(P::SharedFlags, 0, Byte)
            .with_field(P::InterpolationDelay, 8, VarInt)
            .with_field(P::InterpolationDuration, 9, VarInt)
            .with_field(P::Translation, 10, Vector3)
            .with_field(P::Scale, 11, Vector3)
            .with_field(P::LeftRotation, 12, Quaternion)
            .with_field(P::RightRotation, 13, Quaternion)
            .with_field(P::Billboard, 14, Byte)
            .with_field(P::Brightness, 15, VarInt)
            .with_field(P::ViewRange, 16, Float)
            .with_field(P::ShadowRadius, 17, Float)
            .with_field(P::ShadowStrength, 18, Float)
            .with_field(P::CullingWidth, 19, Float)
            .with_field(P::CullingHeight, 20, Float)
            .with_field(P::GlowColor, 21, VarInt)
            .with_field(P::BlockState, 22, BlockState)
            .with_field(P::ItemStack, 22, ItemStack)
            .with_field(P::ItemView, 23, Byte)
            .with_field(P::Text, 22, Component)
            .with_field(P::LineWidth, 23, VarInt)
            .with_field(P::BackgroundColor, 24, VarInt)
            .with_field(P::TextOpacity, 25, Byte)
            .with_field(P::TextStyle, 26, Byte)
    }

    /// Both built-in layouts, newest first.
    #[must_use]
    pub fn builtin() -> Vec<Arc<dyn HostSchema>> {
        vec![
            Arc::new(Self::protocol_1_20_5()),
            Arc::new(Self::protocol_1_19_4()),
        ]
    }
}

impl HostSchema for DisplaySchema {
    fn version(&self) -> &str {
        &self.version
    }

    fn is_compatible(&self, host_version: &str) -> bool {
        let host_version = host_version.trim();
        self.accepts.iter().any(|v| v == host_version)
    }

    fn field(&self, property: PropertyId) -> Option<FieldHandle> {
        self.fields[property.index()]
    }
}

/// Picks the first candidate that accepts `host_version`.
///
/// # Errors
///
/// `IncompatibleHost` when no candidate matches.
pub fn select_schema(
    candidates: &[Arc<dyn HostSchema>],
    host_version: &str,
) -> WraithResult<Arc<dyn HostSchema>> {
    match candidates.iter().find(|s| s.is_compatible(host_version)) {
        Some(schema) => {
            info!(
                host_version,
                schema = schema.version(),
                "Selected host schema"
            );
            Ok(Arc::clone(schema))
        }
        None => {
            error!(
                host_version,
                candidates = candidates.len(),
                "No host schema accepts this version"
            );
            Err(WraithError::IncompatibleHost {
                version: host_version.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_1_20_5_is_complete() {
        let schema = DisplaySchema::protocol_1_20_5();
        for property in PropertyId::ALL {
            let field = schema.field(property);
            assert!(field.is_some(), "{property:?} unmapped");
            assert_eq!(field.map(|f| f.kind), Some(property.expected_kind()));
        }
        assert_eq!(
            schema.field(PropertyId::TeleportDuration),
            Some(FieldHandle::new(10, FieldKind::VarInt))
        );
    }

    #[test]
    fn test_protocol_1_19_4_lacks_teleport() {
        let schema = DisplaySchema::protocol_1_19_4();
        assert_eq!(schema.field(PropertyId::TeleportDuration), None);
        assert!(schema.field(PropertyId::Translation).is_some());
    }

    #[test]
    fn test_select_schema() {
        let candidates = DisplaySchema::builtin();
        assert_eq!(select_schema(&candidates, "1.20.6").unwrap().version(), "1.20.5");
        assert_eq!(select_schema(&candidates, "1.20.1").unwrap().version(), "1.19.4");
        assert!(matches!(
            select_schema(&candidates, "1.8.9"),
            Err(WraithError::IncompatibleHost { .. })
        ));
        assert!(select_schema(&[], "1.20.6").is_err());
    }

    #[test]
    fn test_without_field() {
        let schema = DisplaySchema::protocol_1_20_5().without_field(PropertyId::GlowColor);
        assert_eq!(schema.field(PropertyId::GlowColor), None);
    }
}
