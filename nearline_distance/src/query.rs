// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configurable distance queries.

use kurbo::Point;

use crate::config::{DistanceConfig, Metric, Solver};
use crate::error::DistanceError;
use crate::geometry::Geometry;
use crate::prepared::{Prepared, PreparedGeometry};
use crate::solve::{Outcome, measure};

/// Cooperative cancellation hook, polled while a query runs.
///
/// The tree descent polls once per node pair it visits; the exhaustive solver
/// polls once per edge of the first geometry. Returning `true` aborts the query
/// with [`DistanceError::Interrupted`].
pub trait Interrupt {
    /// Return `true` to stop the running query.
    fn should_stop(&mut self) -> bool;
}

impl<F: FnMut() -> bool> Interrupt for F {
    fn should_stop(&mut self) -> bool {
        self()
    }
}

/// An [`Interrupt`] that never fires.
#[derive(Copy, Clone, Debug, Default)]
pub struct Never;

impl Interrupt for Never {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// The minimum distance between two geometries and where it is attained.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClosestPoints {
    /// Distance between `a` and `b`, in the metric's units.
    pub distance: f64,
    /// Point on the first geometry, in input coordinates.
    pub a: Point,
    /// Point on the second geometry, in input coordinates.
    pub b: Point,
}

/// Builder for distance queries with a non-default metric, solver, or interrupt.
///
/// ```
/// use kurbo::Point;
/// use nearline_distance::{DistanceQuery, Geometry, Polygon, Solver};
///
/// let square = Geometry::from(Polygon::rect(0.0, 0.0, 1.0, 1.0));
/// let point = Geometry::Point(Point::new(4.0, 5.0));
///
/// let mut query = DistanceQuery::new().solver(Solver::Overlapping);
/// let found = query.closest_points(&square, &point).unwrap();
/// assert_eq!(found.distance, 5.0);
/// assert_eq!(found.a, Point::new(1.0, 1.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DistanceQuery<I = Never> {
    config: DistanceConfig,
    interrupt: I,
}

impl DistanceQuery {
    /// A planar query with automatic solver choice and no interrupt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn with_config(config: DistanceConfig) -> Self {
        Self {
            config,
            interrupt: Never,
        }
    }
}

impl<I: Interrupt> DistanceQuery<I> {
    /// Interpret unprepared inputs under `metric`.
    ///
    /// Prepared inputs carry their own metric and ignore this setting.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Always run `solver` instead of choosing by volume overlap.
    pub fn solver(mut self, solver: Solver) -> Self {
        self.config.solver = Some(solver);
        self
    }

    /// Poll `interrupt` while queries run.
    pub fn interrupt<J: Interrupt>(self, interrupt: J) -> DistanceQuery<J> {
        DistanceQuery {
            config: self.config,
            interrupt,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> DistanceConfig {
        self.config
    }

    /// Minimum distance between `a` and `b`.
    ///
    /// # Errors
    ///
    /// Fails if either geometry is empty or has an invalid coordinate, or if
    /// the interrupt fires.
    pub fn distance(&mut self, a: &Geometry, b: &Geometry) -> Result<f64, DistanceError> {
        Ok(self.closest_points(a, b)?.distance)
    }

    /// Minimum distance and the closest pair of points.
    ///
    /// # Errors
    ///
    /// As for [`DistanceQuery::distance`].
    pub fn closest_points(
        &mut self,
        a: &Geometry,
        b: &Geometry,
    ) -> Result<ClosestPoints, DistanceError> {
        let (a, b) = self.prepare(a, b)?;
        self.closest_points_prepared(&a, &b)
    }

    /// Whether `a` and `b` are within `threshold` of each other (inclusive).
    ///
    /// Stops as soon as any pair at or under `threshold` is found. A negative
    /// threshold is never met; an infinite one always is.
    ///
    /// # Errors
    ///
    /// [`DistanceError::InvalidThreshold`] if `threshold` is NaN, otherwise as
    /// for [`DistanceQuery::distance`].
    pub fn is_within_distance(
        &mut self,
        a: &Geometry,
        b: &Geometry,
        threshold: f64,
    ) -> Result<bool, DistanceError> {
        check_threshold(threshold)?;
        let (a, b) = self.prepare(a, b)?;
        self.is_within_distance_prepared(&a, &b, threshold)
    }

    /// [`DistanceQuery::distance`] for prepared inputs.
    ///
    /// # Errors
    ///
    /// [`DistanceError::MetricMismatch`] if the inputs were prepared for
    /// different metrics, or [`DistanceError::Interrupted`].
    pub fn distance_prepared(
        &mut self,
        a: &PreparedGeometry,
        b: &PreparedGeometry,
    ) -> Result<f64, DistanceError> {
        Ok(self.closest_points_prepared(a, b)?.distance)
    }

    /// [`DistanceQuery::closest_points`] for prepared inputs.
    ///
    /// # Errors
    ///
    /// As for [`DistanceQuery::distance_prepared`].
    pub fn closest_points_prepared(
        &mut self,
        a: &PreparedGeometry,
        b: &PreparedGeometry,
    ) -> Result<ClosestPoints, DistanceError> {
        let out = self.run(a, b, None)?;
        Ok(ClosestPoints {
            distance: out.distance,
            a: out.a,
            b: out.b,
        })
    }

    /// [`DistanceQuery::is_within_distance`] for prepared inputs.
    ///
    /// # Errors
    ///
    /// [`DistanceError::InvalidThreshold`] if `threshold` is NaN, otherwise as
    /// for [`DistanceQuery::distance_prepared`].
    pub fn is_within_distance_prepared(
        &mut self,
        a: &PreparedGeometry,
        b: &PreparedGeometry,
        threshold: f64,
    ) -> Result<bool, DistanceError> {
        check_threshold(threshold)?;
        Ok(self.run(a, b, Some(threshold))?.satisfied)
    }

    fn prepare(
        &self,
        a: &Geometry,
        b: &Geometry,
    ) -> Result<(PreparedGeometry, PreparedGeometry), DistanceError> {
        Ok((
            PreparedGeometry::new(a, self.config.metric)?,
            PreparedGeometry::new(b, self.config.metric)?,
        ))
    }

    fn run(
        &mut self,
        a: &PreparedGeometry,
        b: &PreparedGeometry,
        within: Option<f64>,
    ) -> Result<Outcome, DistanceError> {
        let forced = self.config.solver;
        match (a.shape(), b.shape()) {
            (Prepared::Planar(sa), Prepared::Planar(sb)) => {
                measure(sa, sb, forced, within, &mut self.interrupt)
            }
            (Prepared::Geodetic(sa), Prepared::Geodetic(sb)) if sa.space == sb.space => {
                measure(sa, sb, forced, within, &mut self.interrupt)
            }
            _ => Err(DistanceError::MetricMismatch {
                left: a.metric(),
                right: b.metric(),
            }),
        }
    }
}

fn check_threshold(threshold: f64) -> Result<(), DistanceError> {
    if threshold.is_nan() {
        return Err(DistanceError::InvalidThreshold { threshold });
    }
    Ok(())
}
