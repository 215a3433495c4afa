// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive bounding box types and scalar helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x
    pub min_x: T,
    /// Minimum y
    pub min_y: T,
    /// Maximum x
    pub max_x: T,
    /// Maximum y
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// The degenerate box covering a single point.
    pub const fn from_point(x: T, y: T) -> Self {
        Self::new(x, y, x, y)
    }

    /// The box spanned by two corner points, in any order.
    ///
    /// Zero-length and axis-parallel segments yield a zero-area box, which is
    /// still a valid bound.
    pub fn from_corners(x0: T, y0: T, x1: T, y1: T) -> Self {
        Self {
            min_x: min_t(x0, x1),
            min_y: min_t(y0, y1),
            max_x: max_t(x0, x1),
            max_y: max_t(y0, y1),
        }
    }

    /// Whether this AABB contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely inside this AABB (boundaries inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// The intersection of two AABBs.
    pub fn intersect(&self, other: &Self) -> Self {
        let min_x = max_t(self.min_x, other.min_x);
        let min_y = max_t(self.min_y, other.min_y);
        let max_x = min_t(self.max_x, other.max_x);
        let max_y = min_t(self.max_y, other.max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Whether the two AABBs share at least one point. Touching counts.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Return true if the AABB is inverted (no extent on some axis). Assumes no NaN.
    ///
    /// Zero-width boxes are not empty: a point or an axis-parallel segment is a
    /// legitimate bound.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }

    /// Smallest AABB containing both operands.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Squared gap between two boxes, or zero when they touch or overlap.
    ///
    /// This is a lower bound on the squared distance between anything the two
    /// boxes contain. It is accumulated in the widened type.
    pub fn distance_squared(&self, other: &Self) -> T::Acc {
        let dx = axis_gap(self.min_x, self.max_x, other.min_x, other.max_x);
        let dy = axis_gap(self.min_y, self.max_y, other.min_y, other.max_y);
        dx * dx + dy * dy
    }

    /// Half perimeter of the box in the widened type.
    pub fn half_perimeter(&self) -> T::Acc {
        let w = T::max_zero(T::sub(self.max_x, self.min_x));
        let h = T::max_zero(T::sub(self.max_y, self.min_y));
        T::widen(w) + T::widen(h)
    }
}

fn axis_gap<T: Scalar>(a_min: T, a_max: T, b_min: T, b_max: T) -> T::Acc {
    if lt(a_max, b_min) {
        T::widen(b_min) - T::widen(a_max)
    } else if lt(b_max, a_min) {
        T::widen(a_min) - T::widen(b_max)
    } else {
        T::widen(T::zero())
    }
}

/// Numeric scalar abstraction for 2D AABBs used by the edge tree.
///
/// Gaps and extents are computed in an associated widened accumulator type
/// (f32→f64) so that squared distances of nearby f32 boxes keep their precision.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for squared distances and extents.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert an accumulator value to `f64` for cost comparisons.
    fn acc_to_f64(v: Self::Acc) -> f64;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

// Helper type to access Scalar::Acc in type aliases elsewhere.
/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_is_zero_for_touching_boxes() {
        let a = Aabb2D::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb2D::new(1.0, 0.0, 2.0, 1.0);
        assert_eq!(a.distance_squared(&b), 0.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn gap_is_separation_on_both_axes() {
        let a = Aabb2D::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb2D::new(4.0, 5.0, 6.0, 6.0);
        assert_eq!(a.distance_squared(&b), 9.0 + 16.0);
        assert_eq!(b.distance_squared(&a), 25.0);
    }

    #[test]
    fn f32_gap_is_widened() {
        let a = Aabb2D::<f32>::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb2D::<f32>::new(3.0, 0.0, 4.0, 1.0);
        let d: f64 = a.distance_squared(&b);
        assert_eq!(d, 4.0);
    }

    #[test]
    fn degenerate_boxes_are_not_empty() {
        let p = Aabb2D::from_point(3.0, 4.0);
        assert!(!p.is_empty());
        let seg = Aabb2D::from_corners(5.0, 1.0, 2.0, 1.0);
        assert_eq!(seg, Aabb2D::new(2.0, 1.0, 5.0, 1.0));
        assert!(seg.contains(&Aabb2D::from_point(3.0, 1.0)));
        assert_eq!(seg.half_perimeter(), 3.0);
    }
}
