// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for distance queries.

use thiserror::Error;

use crate::config::Metric;

/// Errors surfaced by extraction, preparation, and distance queries.
///
/// All of them are input validation failures detected before any distance is
/// computed, except [`DistanceError::Interrupted`]. None of them is worth retrying
/// with the same input.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DistanceError {
    /// The geometry has no coordinates at all.
    #[error("geometry has no coordinates")]
    EmptyGeometry,

    /// A coordinate is NaN or infinite, or a latitude lies outside ±90°.
    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate {
        /// X (or longitude) of the offending coordinate.
        x: f64,
        /// Y (or latitude) of the offending coordinate.
        y: f64,
    },

    /// A geodetic sphere radius that is not finite and positive.
    #[error("invalid sphere radius {radius}")]
    InvalidRadius {
        /// The rejected radius.
        radius: f64,
    },

    /// A distance threshold that is NaN.
    #[error("invalid distance threshold {threshold}")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: f64,
    },

    /// Two prepared geometries were built for different metrics.
    #[error("cannot measure between {left:?} and {right:?} geometries")]
    MetricMismatch {
        /// Metric of the first argument.
        left: Metric,
        /// Metric of the second argument.
        right: Metric,
    },

    /// The caller's interrupt hook asked the query to stop.
    #[error("distance query interrupted")]
    Interrupted,
}
