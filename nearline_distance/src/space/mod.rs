// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metric spaces the solvers are generic over.
//!
//! A space decides how input points are lifted into working vertices, which
//! bounding volume encloses an edge, and how exact and lower-bound distances
//! are measured. Distances inside a space are in its own units (Euclidean
//! length for [`Planar`], radians for [`Geodetic`]); [`Space::scale`] converts
//! them to what callers see.

use core::fmt::Debug;

use kurbo::Point;
use nearline_tree::BoundingVolume;

use crate::config::Metric;
use crate::error::DistanceError;

mod geodetic;
mod planar;

pub use geodetic::Cap;
pub(crate) use geodetic::Geodetic;
pub(crate) use planar::Planar;

/// Exact distance between two edges and the closest point on each.
pub(crate) type Closest<V> = (f64, V, V);

pub(crate) trait Space: Copy + Debug {
    type Vertex: Copy + Debug + PartialEq;
    type Volume: BoundingVolume;

    /// The public metric this space implements.
    fn metric(&self) -> Metric;

    /// Validate an input coordinate and convert it to a working vertex.
    fn lift(&self, p: Point) -> Result<Self::Vertex, DistanceError>;

    /// Convert a working vertex back to input coordinates.
    fn lower(&self, v: Self::Vertex) -> Point;

    /// Volume enclosing the edge `a`–`b`, including `a == b`.
    fn edge_volume(&self, a: Self::Vertex, b: Self::Vertex) -> Self::Volume;

    /// Lower bound on the distance between anything in `a` and anything in `b`.
    fn volume_distance(&self, a: &Self::Volume, b: &Self::Volume) -> f64;

    /// Exact distance between two edges. Zero when they touch or cross.
    fn edge_distance(
        &self,
        a: (Self::Vertex, Self::Vertex),
        b: (Self::Vertex, Self::Vertex),
    ) -> Closest<Self::Vertex>;

    /// Whether `p` lies strictly inside the ring, which `volume` encloses.
    ///
    /// The ring is treated as closed even if its last vertex differs from the
    /// first. Points on the boundary may go either way.
    fn ring_contains(&self, ring: &[Self::Vertex], volume: &Self::Volume, p: Self::Vertex)
    -> bool;

    /// Convert an internal distance to caller units.
    fn scale(&self, d: f64) -> f64;

    /// Convert a caller distance to internal units.
    fn unscale(&self, d: f64) -> f64;
}
