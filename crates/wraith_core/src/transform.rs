//! # Transform
//!
//! Affine transform of a display model relative to its spawn anchor:
//! translation, a left rotation, a scale and a right rotation.
//!
//! ## Matrix Layout
//!
//! ```text
//! M = T(translation) · S(scale) · R(left) [· R(right)]
//! ```
//!
//! The right rotation is only multiplied in when it is not the identity.
//! Points are therefore rotated by `right` first, then `left`, then scaled
//! and finally translated.
//!
//! Decomposing a matrix cannot recover the left/right split, so
//! [`Transform::from_matrix`] folds every rotation into `left` and resets
//! `right` to identity.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation, two rotations and a scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    translation: Vec3,
    left_rotation: Quat,
    scale: Vec3,
    right_rotation: Quat,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        left_rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        right_rotation: Quat::IDENTITY,
    };

    /// Returns the identity transform.
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a transform from its components.
    #[must_use]
    pub const fn new(translation: Vec3, left_rotation: Quat, scale: Vec3, right_rotation: Quat) -> Self {
        Self {
            translation,
            left_rotation,
            scale,
            right_rotation,
        }
    }

    /// Decomposes a matrix. The right rotation comes back as identity.
    ///
    /// Exact for matrices built from a uniform scale. A non-uniform scale
    /// combined with a rotation does not survive decomposition.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self::new(translation, rotation, scale, Quat::IDENTITY)
    }

    /// Composes the matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        let matrix = Mat4::from_translation(self.translation)
            * Mat4::from_scale(self.scale)
            * Mat4::from_quat(self.left_rotation);
        if self.right_rotation == Quat::IDENTITY {
            matrix
        } else {
            matrix * Mat4::from_quat(self.right_rotation)
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Translation relative to the anchor.
    #[inline]
    #[must_use]
    pub const fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Left rotation.
    #[inline]
    #[must_use]
    pub const fn left_rotation(&self) -> Quat {
        self.left_rotation
    }

    /// Scale.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Right rotation.
    #[inline]
    #[must_use]
    pub const fn right_rotation(&self) -> Quat {
        self.right_rotation
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Replaces the translation.
    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.translation = translation;
        self
    }

    /// Offsets the translation.
    pub fn translate_by(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.translate_by_vec(Vec3::new(dx, dy, dz))
    }

    /// Offsets the translation by a vector.
    pub fn translate_by_vec(&mut self, delta: Vec3) -> &mut Self {
        self.translation += delta;
        self
    }

    /// Edits the translation in place.
    pub fn edit_translation(&mut self, f: impl FnOnce(&mut Vec3)) -> &mut Self {
        f(&mut self.translation);
        self
    }

    // =========================================================================
    // Scale
    // =========================================================================

    /// Replaces the scale.
    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Multiplies every axis by `factor`.
    pub fn scale_uniform(&mut self, factor: f32) -> &mut Self {
        self.scale_by_vec(Vec3::splat(factor))
    }

    /// Multiplies each axis by its own factor.
    pub fn scale_by(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.scale_by_vec(Vec3::new(x, y, z))
    }

    /// Multiplies the scale component-wise.
    pub fn scale_by_vec(&mut self, factors: Vec3) -> &mut Self {
        self.scale *= factors;
        self
    }

    /// Edits the scale in place.
    pub fn edit_scale(&mut self, f: impl FnOnce(&mut Vec3)) -> &mut Self {
        f(&mut self.scale);
        self
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// Replaces the left rotation.
    pub fn set_left_rotation(&mut self, rotation: Quat) -> &mut Self {
        self.left_rotation = rotation;
        self
    }

    /// Post-multiplies the left rotation by `angle` radians about `axis`.
    ///
    /// A zero axis leaves the rotation unchanged.
    pub fn rotate_left_by(&mut self, angle: f32, axis: Vec3) -> &mut Self {
        if let Some(delta) = axis_angle(angle, axis) {
            self.left_rotation *= delta;
        }
        self
    }

    /// Edits the left rotation in place.
    pub fn edit_left_rotation(&mut self, f: impl FnOnce(&mut Quat)) -> &mut Self {
        f(&mut self.left_rotation);
        self
    }

    /// Replaces the right rotation.
    pub fn set_right_rotation(&mut self, rotation: Quat) -> &mut Self {
        self.right_rotation = rotation;
        self
    }

    /// Post-multiplies the right rotation by `angle` radians about `axis`.
    ///
    /// A zero axis leaves the rotation unchanged.
    pub fn rotate_right_by(&mut self, angle: f32, axis: Vec3) -> &mut Self {
        if let Some(delta) = axis_angle(angle, axis) {
            self.right_rotation *= delta;
        }
        self
    }

    /// Edits the right rotation in place.
    pub fn edit_right_rotation(&mut self, f: impl FnOnce(&mut Quat)) -> &mut Self {
        f(&mut self.right_rotation);
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        Self::from_matrix(matrix)
    }
}

#[inline]
fn axis_angle(angle: f32, axis: Vec3) -> Option<Quat> {
    axis.try_normalize().map(|axis| Quat::from_axis_angle(axis, angle))
}
