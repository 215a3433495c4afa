// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartesian plane with Euclidean distance.

use kurbo::{Line, Point, Vec2};
use nearline_tree::Aabb2D;

use super::{Closest, Space};
use crate::config::Metric;
use crate::error::DistanceError;

#[cfg(not(feature = "std"))]
use crate::float::FloatFuncs;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Planar;

impl Space for Planar {
    type Vertex = Point;
    type Volume = Aabb2D<f64>;

    fn metric(&self) -> Metric {
        Metric::Planar
    }

    fn lift(&self, p: Point) -> Result<Point, DistanceError> {
        if p.is_finite() {
            Ok(p)
        } else {
            Err(DistanceError::InvalidCoordinate { x: p.x, y: p.y })
        }
    }

    fn lower(&self, v: Point) -> Point {
        v
    }

    fn edge_volume(&self, a: Point, b: Point) -> Aabb2D<f64> {
        Aabb2D::from_corners(a.x, a.y, b.x, b.y)
    }

    fn volume_distance(&self, a: &Aabb2D<f64>, b: &Aabb2D<f64>) -> f64 {
        a.distance_squared(b).sqrt()
    }

    fn edge_distance(&self, a: (Point, Point), b: (Point, Point)) -> Closest<Point> {
        segment_distance(Line::new(a.0, a.1), Line::new(b.0, b.1))
    }

    fn ring_contains(&self, ring: &[Point], volume: &Aabb2D<f64>, p: Point) -> bool {
        if !volume.contains_point(p.x, p.y) {
            return false;
        }
        let Some(&last) = ring.last() else {
            return false;
        };
        // Even-odd rule over a horizontal ray towards +x.
        let mut inside = false;
        let mut prev = last;
        for &cur in ring {
            if (cur.y > p.y) != (prev.y > p.y) {
                let x = cur.x + (p.y - cur.y) * (prev.x - cur.x) / (prev.y - cur.y);
                if p.x < x {
                    inside = !inside;
                }
            }
            prev = cur;
        }
        inside
    }

    fn scale(&self, d: f64) -> f64 {
        d
    }

    fn unscale(&self, d: f64) -> f64 {
        d
    }
}

/// Twice the signed area of the triangle `a`, `b`, `c`.
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

fn within_box(s: Line, p: Point) -> bool {
    p.x >= s.p0.x.min(s.p1.x)
        && p.x <= s.p0.x.max(s.p1.x)
        && p.y >= s.p0.y.min(s.p1.y)
        && p.y <= s.p0.y.max(s.p1.y)
}

/// Closest point to `p` on segment `s`, and its distance.
fn point_segment(p: Point, s: Line) -> (f64, Point) {
    if orient(s.p0, s.p1, p) == 0.0 && within_box(s, p) {
        return (0.0, p);
    }
    let d: Vec2 = s.p1 - s.p0;
    let len2 = d.hypot2();
    let q = if len2 == 0.0 {
        s.p0
    } else {
        let t = ((p - s.p0).dot(d) / len2).clamp(0.0, 1.0);
        s.p0 + d * t
    };
    (p.distance(q), q)
}

/// Distance between two segments, with the closest point on each.
///
/// Returns exactly zero when the segments share a point.
pub(crate) fn segment_distance(a: Line, b: Line) -> Closest<Point> {
    let o1 = orient(a.p0, a.p1, b.p0);
    let o2 = orient(a.p0, a.p1, b.p1);
    let o3 = orient(b.p0, b.p1, a.p0);
    let o4 = orient(b.p0, b.p1, a.p1);
    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        // Proper crossing.
        let t = o3 / (o3 - o4);
        let x = a.p0.lerp(a.p1, t);
        return (0.0, x, x);
    }

    let mut best = {
        let (d, q) = point_segment(a.p0, b);
        (d, a.p0, q)
    };
    for (d, on_a, on_b) in [
        {
            let (d, q) = point_segment(a.p1, b);
            (d, a.p1, q)
        },
        {
            let (d, q) = point_segment(b.p0, a);
            (d, q, b.p0)
        },
        {
            let (d, q) = point_segment(b.p1, a);
            (d, q, b.p1)
        },
    ] {
        if d < best.0 {
            best = (d, on_a, on_b);
        }
    }
    best
}
