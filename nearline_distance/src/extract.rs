// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition of geometries into flat vertex sequences.

use alloc::vec::Vec;
use kurbo::Point;

use crate::error::DistanceError;
use crate::geometry::{Geometry, Polygon};

/// An ordered, non-empty run of points; consecutive points form edges.
///
/// A sequence of length one is a degenerate point and has a single
/// zero-length edge. Repeated points (including a ring's closing vertex) are
/// kept as zero-length edges.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexSequence(Vec<Point>);

impl VertexSequence {
    /// Wrap a non-empty point list. Returns `None` if `points` is empty.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        (!points.is_empty()).then_some(Self(points))
    }

    /// The points, in order.
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of edges: `len - 1`, or 1 for a single point.
    pub fn edge_count(&self) -> usize {
        self.0.len().saturating_sub(1).max(1)
    }

    /// Endpoints of edge `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= edge_count()`.
    pub fn edge(&self, i: usize) -> (Point, Point) {
        if self.0.len() == 1 {
            assert_eq!(i, 0, "a single point has one edge");
            (self.0[0], self.0[0])
        } else {
            (self.0[i], self.0[i + 1])
        }
    }

    /// Iterate over all edges in order.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..self.edge_count()).map(|i| self.edge(i))
    }
}

/// Dimension of a part, which decides whether it can contain other parts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// One or more isolated points.
    Puntal,
    /// A polyline.
    Lineal,
    /// A polygon: the first ring is the shell, the rest are holes.
    Areal,
}

/// One simple component of a geometry: a point, a line, or a polygon's rings.
#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    /// What the rings describe.
    pub kind: PartKind,
    /// Non-empty list of vertex sequences.
    pub rings: Vec<VertexSequence>,
}

/// Decompose `geometry` into its parts, validating every coordinate.
///
/// Empty components are skipped. Fails with [`DistanceError::EmptyGeometry`]
/// if nothing remains, or [`DistanceError::InvalidCoordinate`] on the first
/// non-finite coordinate. Ring closure and validity are not checked.
pub fn extract(geometry: &Geometry) -> Result<Vec<Part>, DistanceError> {
    let mut parts = Vec::new();
    walk(geometry, &mut parts)?;
    if parts.is_empty() {
        return Err(DistanceError::EmptyGeometry);
    }
    Ok(parts)
}

fn walk(geometry: &Geometry, parts: &mut Vec<Part>) -> Result<(), DistanceError> {
    match geometry {
        Geometry::Point(p) => push_points(core::slice::from_ref(p), parts)?,
        Geometry::MultiPoint(points) => push_points(points, parts)?,
        Geometry::LineString(line) => push_line(line, parts)?,
        Geometry::MultiLineString(lines) => {
            for line in lines {
                push_line(line, parts)?;
            }
        }
        Geometry::Polygon(poly) => push_polygon(poly, parts)?,
        Geometry::MultiPolygon(polys) => {
            for poly in polys {
                push_polygon(poly, parts)?;
            }
        }
        Geometry::Collection(items) => {
            for g in items {
                walk(g, parts)?;
            }
        }
    }
    Ok(())
}

fn checked(points: &[Point]) -> Result<Vec<Point>, DistanceError> {
    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        return Err(DistanceError::InvalidCoordinate { x: bad.x, y: bad.y });
    }
    Ok(points.to_vec())
}

fn push_points(points: &[Point], parts: &mut Vec<Part>) -> Result<(), DistanceError> {
    for p in checked(points)? {
        parts.push(Part {
            kind: PartKind::Puntal,
            rings: alloc::vec![VertexSequence(alloc::vec![p])],
        });
    }
    Ok(())
}

fn push_line(line: &[Point], parts: &mut Vec<Part>) -> Result<(), DistanceError> {
    if let Some(seq) = VertexSequence::new(checked(line)?) {
        parts.push(Part {
            kind: PartKind::Lineal,
            rings: alloc::vec![seq],
        });
    }
    Ok(())
}

fn push_polygon(poly: &Polygon, parts: &mut Vec<Part>) -> Result<(), DistanceError> {
    let Some(shell) = VertexSequence::new(checked(&poly.exterior)?) else {
        return Ok(());
    };
    let mut rings = alloc::vec![shell];
    for hole in &poly.interiors {
        if let Some(seq) = VertexSequence::new(checked(hole)?) {
            rings.push(seq);
        }
    }
    parts.push(Part {
        kind: PartKind::Areal,
        rings,
    });
    Ok(())
}
