// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory geometry values accepted by the distance engine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use kurbo::Point;
use nearline_tree::Aabb2D;

/// A polygon: one exterior ring and zero or more holes.
///
/// Rings are expected to be closed (first point repeated at the end) but this
/// is not checked; an open ring simply lacks its closing edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    /// Outer boundary.
    pub exterior: Vec<Point>,
    /// Holes.
    pub interiors: Vec<Vec<Point>>,
}

impl Polygon {
    /// Create a polygon from an exterior ring and holes.
    pub fn new(exterior: Vec<Point>, interiors: Vec<Vec<Point>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// A closed, axis-aligned rectangle with corners `(x0, y0)` and `(x1, y1)`.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(
            alloc::vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
                Point::new(x0, y0),
            ],
            Vec::new(),
        )
    }
}

/// A geometry value, owned by the caller and only read by this crate.
///
/// Coordinates are Cartesian for [`Metric::Planar`](crate::Metric::Planar) and
/// `(longitude, latitude)` in degrees for [`Metric::Geodetic`](crate::Metric::Geodetic).
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A single point.
    Point(Point),
    /// A set of points.
    MultiPoint(Vec<Point>),
    /// An open or closed polyline.
    LineString(Vec<Point>),
    /// Several polylines.
    MultiLineString(Vec<Vec<Point>>),
    /// A polygon with optional holes.
    Polygon(Polygon),
    /// Several polygons.
    MultiPolygon(Vec<Polygon>),
    /// A heterogeneous collection, possibly nested.
    Collection(Vec<Self>),
}

impl Geometry {
    /// Iterate over every coordinate, in storage order.
    pub fn coords(&self) -> impl Iterator<Item = Point> + '_ {
        self.coords_dyn()
    }

    fn coords_dyn(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        match self {
            Self::Point(p) => Box::new(core::iter::once(*p)),
            Self::MultiPoint(v) | Self::LineString(v) => Box::new(v.iter().copied()),
            Self::MultiLineString(lines) => Box::new(lines.iter().flatten().copied()),
            Self::Polygon(p) => Box::new(polygon_coords(p)),
            Self::MultiPolygon(polys) => Box::new(polys.iter().flat_map(polygon_coords)),
            Self::Collection(items) => Box::new(items.iter().flat_map(Self::coords_dyn)),
        }
    }

    /// Planar bounding box of all coordinates, or `None` if there are none.
    pub fn envelope(&self) -> Option<Aabb2D<f64>> {
        let mut it = self.coords();
        let first = it.next()?;
        Some(it.fold(Aabb2D::from_point(first.x, first.y), |acc, p| {
            acc.union(&Aabb2D::from_point(p.x, p.y))
        }))
    }

    /// True if the geometry has no coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::MultiPoint(v) | Self::LineString(v) => v.is_empty(),
            Self::MultiLineString(lines) => lines.iter().all(Vec::is_empty),
            Self::Polygon(p) => polygon_is_empty(p),
            Self::MultiPolygon(polys) => polys.iter().all(polygon_is_empty),
            Self::Collection(items) => items.iter().all(Self::is_empty),
        }
    }
}

fn polygon_coords(p: &Polygon) -> impl Iterator<Item = Point> + '_ {
    p.exterior
        .iter()
        .chain(p.interiors.iter().flatten())
        .copied()
}

fn polygon_is_empty(p: &Polygon) -> bool {
    p.exterior.is_empty() && p.interiors.iter().all(Vec::is_empty)
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}
