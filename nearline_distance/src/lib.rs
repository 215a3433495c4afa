// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearline Distance: minimum distance between vector geometries.
//!
//! Nearline Distance measures the shortest distance between two points,
//! lines, polygons, or collections of them, and reports where it is attained.
//!
//! - Every ring and linestring gets an edge tree built in linear time by
//!   [`nearline_tree`], relying on consecutive edges being close together.
//! - Geometries whose bounding volumes are apart are measured by a best-first
//!   descent of both trees that prunes node pairs which cannot beat the best
//!   distance found so far.
//! - Geometries whose volumes overlap are measured exhaustively, edge by edge,
//!   so crossing or touching edges always produce an exact zero.
//! - A point or polygon strictly inside another polygon is at distance zero.
//!
//! Coordinates are Cartesian by default. [`Metric::Geodetic`] treats them as
//! longitude/latitude degrees and measures great-circle distances on a sphere,
//! using spherical caps instead of boxes for the trees.
//!
//! ## API overview
//!
//! - [`distance`], [`closest_points`], [`is_within_distance`]: planar queries
//!   with automatic solver choice.
//! - [`DistanceQuery`]: the same queries with a chosen [`Metric`], a forced
//!   [`Solver`], or an [`Interrupt`] hook.
//! - [`PreparedGeometry`]: a geometry with its trees built once, for repeated
//!   queries and for sharing between threads.
//! - [`PreparedCache`]: reuses prepared geometries across consecutive calls
//!   when one argument stays the same.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use nearline_distance::{Geometry, Polygon, distance, is_within_distance};
//!
//! let a = Geometry::from(Polygon::rect(0.0, 0.0, 1.0, 1.0));
//! let b = Geometry::from(Polygon::rect(10.0, 0.0, 11.0, 1.0));
//! assert_eq!(distance(&a, &b).unwrap(), 9.0);
//! assert!(is_within_distance(&a, &b, 9.0).unwrap());
//!
//! // A point inside a polygon is at distance zero.
//! let inside = Geometry::Point(Point::new(0.5, 0.5));
//! assert_eq!(distance(&a, &inside).unwrap(), 0.0);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): use the standard library.
//! - `libm`: use `libm` for float math in `no_std` builds.
//!
//! At least one of the two must be enabled.
//!
//! ## Logging
//!
//! Solver choice and tree builds are reported through [`tracing`] at `debug`
//! level; per-ring descent statistics at `trace` level. No subscriber is
//! installed by this crate.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("nearline_distance requires either the `std` or `libm` feature");

extern crate alloc;

mod cache;
mod config;
mod error;
mod extract;
mod geometry;
mod prepared;
mod query;
mod solve;
mod space;

#[cfg(not(feature = "std"))]
mod float;

pub use cache::PreparedCache;
pub use config::{DistanceConfig, MEAN_EARTH_RADIUS, Metric, Solver};
pub use error::DistanceError;
pub use extract::{Part, PartKind, VertexSequence, extract};
pub use geometry::{Geometry, Polygon};
pub use prepared::PreparedGeometry;
pub use query::{ClosestPoints, DistanceQuery, Interrupt, Never};
pub use space::Cap;

/// Minimum planar distance between `a` and `b`.
///
/// Returns `0.0` when the geometries touch, cross, or one contains the other.
///
/// # Errors
///
/// [`DistanceError::EmptyGeometry`] or [`DistanceError::InvalidCoordinate`]
/// if either input is unusable.
pub fn distance(a: &Geometry, b: &Geometry) -> Result<f64, DistanceError> {
    DistanceQuery::new().distance(a, b)
}

/// Minimum planar distance between `a` and `b`, with the points attaining it.
///
/// # Errors
///
/// As for [`distance`].
pub fn closest_points(a: &Geometry, b: &Geometry) -> Result<ClosestPoints, DistanceError> {
    DistanceQuery::new().closest_points(a, b)
}

/// Whether `a` and `b` are at most `threshold` apart.
///
/// Stops searching as soon as a close enough pair is found.
///
/// # Errors
///
/// [`DistanceError::InvalidThreshold`] if `threshold` is NaN, otherwise as
/// for [`distance`].
pub fn is_within_distance(a: &Geometry, b: &Geometry, threshold: f64) -> Result<bool, DistanceError> {
    DistanceQuery::new().is_within_distance(a, b, threshold)
}
