// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reuse of prepared geometries across consecutive queries.

use alloc::sync::Arc;

use tracing::debug;

use crate::config::Metric;
use crate::error::DistanceError;
use crate::geometry::Geometry;
use crate::prepared::PreparedGeometry;
use crate::query::{ClosestPoints, DistanceQuery};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Arg {
    Left = 0,
    Right = 1,
}

#[derive(Clone, Debug)]
struct Slot {
    geometry: Geometry,
    prepared: Arc<PreparedGeometry>,
}

/// Remembers the last geometry passed in each argument position, with its
/// edge trees, and rebuilds only when the argument changes.
///
/// This suits the common pattern of measuring one fixed geometry against a
/// stream of others: the fixed side is prepared once.
///
/// ```
/// use kurbo::Point;
/// use nearline_distance::{Geometry, Metric, Polygon, PreparedCache};
///
/// let parcel = Geometry::from(Polygon::rect(0.0, 0.0, 10.0, 10.0));
/// let mut cache = PreparedCache::new(Metric::Planar);
/// for x in [12.0, 13.0, 14.0] {
///     let well = Geometry::Point(Point::new(x, 5.0));
///     assert_eq!(cache.distance(&parcel, &well).unwrap(), x - 10.0);
/// }
/// assert_eq!(cache.hits(), 2);
/// assert_eq!(cache.misses(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct PreparedCache {
    metric: Metric,
    slots: [Option<Slot>; 2],
    hits: usize,
    misses: usize,
}

impl PreparedCache {
    /// An empty cache preparing geometries under `metric`.
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            slots: [None, None],
            hits: 0,
            misses: 0,
        }
    }

    /// Metric used for every prepared geometry.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Arguments served from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Arguments that had to be prepared.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop both cached geometries.
    pub fn clear(&mut self) {
        self.slots = [None, None];
    }

    /// A failed preparation leaves the slot empty.
    fn prepared(
        &mut self,
        arg: Arg,
        geometry: &Geometry,
    ) -> Result<Arc<PreparedGeometry>, DistanceError> {
        let slot = arg as usize;
        if let Some(cached) = &self.slots[slot]
            && cached.geometry == *geometry
        {
            self.hits += 1;
            return Ok(Arc::clone(&cached.prepared));
        }
        self.misses += 1;
        self.slots[slot] = None;
        debug!(?arg, metric = ?self.metric, "preparing geometry for cache");
        let prepared = Arc::new(PreparedGeometry::new(geometry, self.metric)?);
        self.slots[slot] = Some(Slot {
            geometry: geometry.clone(),
            prepared: Arc::clone(&prepared),
        });
        Ok(prepared)
    }

    fn pair(
        &mut self,
        a: &Geometry,
        b: &Geometry,
    ) -> Result<(Arc<PreparedGeometry>, Arc<PreparedGeometry>), DistanceError> {
        Ok((self.prepared(Arg::Left, a)?, self.prepared(Arg::Right, b)?))
    }

    /// Minimum distance between `a` and `b`.
    ///
    /// # Errors
    ///
    /// As for [`DistanceQuery::distance`].
    pub fn distance(&mut self, a: &Geometry, b: &Geometry) -> Result<f64, DistanceError> {
        let (a, b) = self.pair(a, b)?;
        DistanceQuery::new().distance_prepared(&a, &b)
    }

    /// Minimum distance and closest points between `a` and `b`.
    ///
    /// # Errors
    ///
    /// As for [`DistanceQuery::closest_points`].
    pub fn closest_points(
        &mut self,
        a: &Geometry,
        b: &Geometry,
    ) -> Result<ClosestPoints, DistanceError> {
        let (a, b) = self.pair(a, b)?;
        DistanceQuery::new().closest_points_prepared(&a, &b)
    }

    /// Whether `a` and `b` are within `threshold` (inclusive).
    ///
    /// # Errors
    ///
    /// As for [`DistanceQuery::is_within_distance`].
    pub fn is_within_distance(
        &mut self,
        a: &Geometry,
        b: &Geometry,
        threshold: f64,
    ) -> Result<bool, DistanceError> {
        let (a, b) = self.pair(a, b)?;
        DistanceQuery::new().is_within_distance_prepared(&a, &b, threshold)
    }
}
