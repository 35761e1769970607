//! Per-model dirty tracking.
//!
//! One bit per [`PropertyId`], packed into a `u32`. Iteration skips clean
//! bits with `trailing_zeros`.

use wraith_shared::property::{PropertyId, VariantKind};

/// Set of properties changed since the last sync pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirtySet {
    bits: u32,
}

impl DirtySet {
    /// An empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Every property a model of `kind` carries.
    #[must_use]
    pub fn full(kind: VariantKind) -> Self {
        let mut set = Self::new();
        for property in PropertyId::ALL {
            if property.applies_to(kind) {
                set.mark(property);
            }
        }
        set
    }

    /// Marks one property.
    #[inline]
    pub fn mark(&mut self, property: PropertyId) {
        self.bits |= property.bit();
    }

    /// Marks several properties.
    #[inline]
    pub fn mark_all(&mut self, properties: &[PropertyId]) {
        for &property in properties {
            self.mark(property);
        }
    }

    /// Marks the transform group.
    #[inline]
    pub fn mark_transform(&mut self) {
        self.mark_all(&PropertyId::TRANSFORM);
    }

    /// Returns true if `property` is marked.
    #[inline]
    #[must_use]
    pub const fn contains(&self, property: PropertyId) -> bool {
        self.bits & property.bit() != 0
    }

    /// Returns true if nothing is marked.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of marked properties.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Clears every mark.
    #[inline]
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Returns the current marks and clears them.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Iterates marked properties in wire order.
    #[must_use]
    pub const fn iter(&self) -> DirtyIter {
        DirtyIter { bits: self.bits }
    }
}

impl IntoIterator for DirtySet {
    type Item = PropertyId;
    type IntoIter = DirtyIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<PropertyId> for DirtySet {
    fn from_iter<I: IntoIterator<Item = PropertyId>>(iter: I) -> Self {
        let mut set = Self::new();
        for property in iter {
            set.mark(property);
        }
        set
    }
}

/// Iterator over a [`DirtySet`].
#[derive(Clone, Debug)]
pub struct DirtyIter {
    bits: u32,
}

impl Iterator for DirtyIter {
    type Item = PropertyId;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        // Clear lowest set bit.
        self.bits &= self.bits - 1;
        PropertyId::ALL.get(index).copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}
