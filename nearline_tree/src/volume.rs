// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding volume capability trait used by [`EdgeTree`](crate::EdgeTree).

use core::fmt::Debug;

use crate::types::{Aabb2D, Scalar, union_aabb};

/// The small set of operations the tree builder and the descent need from a
/// bounding volume.
///
/// Implementations must keep `union` conservative: the result contains both
/// operands, even after rounding. Pruning is only sound while that holds.
pub trait BoundingVolume: Copy + Debug {
    /// Smallest (or a slightly padded) volume containing both operands.
    fn union(&self, other: &Self) -> Self;

    /// Whether `other` lies entirely inside `self`.
    fn contains(&self, other: &Self) -> bool;

    /// Whether the two volumes share at least one point. Touching counts.
    fn intersects(&self, other: &Self) -> bool;

    /// A size measure, used to decide which side of a pair to expand first.
    fn extent(&self) -> f64;
}

impl<T: Scalar> BoundingVolume for Aabb2D<T> {
    #[inline]
    fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }

    #[inline]
    fn contains(&self, other: &Self) -> bool {
        Aabb2D::contains(self, other)
    }

    #[inline]
    fn intersects(&self, other: &Self) -> bool {
        Aabb2D::intersects(self, other)
    }

    #[inline]
    fn extent(&self) -> f64 {
        T::acc_to_f64(self.half_perimeter())
    }
}
