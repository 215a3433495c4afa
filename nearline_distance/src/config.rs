// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime configuration for distance queries.

/// Mean Earth radius in meters (IUGG), the default sphere for [`Metric::Geodetic`].
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// How coordinates are interpreted and distances measured.
///
/// Both inputs of one query must use the same metric.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Metric {
    /// Cartesian coordinates, Euclidean distance, axis-aligned box volumes.
    #[default]
    Planar,
    /// Longitude/latitude in degrees on a sphere, great-circle distance in the
    /// units of `radius`, spherical cap volumes.
    Geodetic {
        /// Sphere radius; distances are returned in its units.
        radius: f64,
    },
}

impl Metric {
    /// Geodetic metric on a sphere with the mean Earth radius (meters).
    pub const fn geodetic() -> Self {
        Self::Geodetic {
            radius: MEAN_EARTH_RADIUS,
        }
    }
}

/// The two algorithms a query can run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Solver {
    /// Best-first descent of both edge trees with bound pruning.
    Disjoint,
    /// Exhaustive edge-by-edge comparison.
    Overlapping,
}

/// Settings for one distance query.
///
/// Used by [`DistanceQuery`](crate::DistanceQuery).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DistanceConfig {
    /// Metric used to interpret coordinates.
    pub metric: Metric,
    /// Force a solver instead of choosing by bounding-volume overlap.
    ///
    /// Both solvers return the same result; forcing one only changes how long
    /// it takes.
    pub solver: Option<Solver>,
}
