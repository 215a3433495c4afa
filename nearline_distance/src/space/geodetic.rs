// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Great-circle distance on a sphere, with spherical caps as bounding volumes.
//!
//! Input points are `(longitude, latitude)` in degrees and are lifted to unit
//! vectors. Edges are the shorter great-circle arcs between their endpoints.
//! Internal distances are central angles in radians.

use core::f64::consts::PI;

use glam::DVec3;
use kurbo::Point;
use nearline_tree::BoundingVolume;

use super::{Closest, Space};
use crate::config::Metric;
use crate::error::DistanceError;

#[cfg(not(feature = "std"))]
use crate::float::FloatFuncs;

/// Slack added to cap radii so containment survives rounding.
const PAD: f64 = 8.0 * f64::EPSILON;

/// Central angle between two unit vectors, accurate for small and large angles.
fn angle(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// A spherical cap: every unit vector within `radius` radians of `center`.
///
/// Caps bound the edges of geodetic geometries. A radius of π or more covers
/// the whole sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cap {
    center: DVec3,
    radius: f64,
}

impl Cap {
    /// The cap covering the whole sphere.
    pub const FULL: Self = Self {
        center: DVec3::Z,
        radius: PI,
    };

    /// Smallest padded cap around a unit vector.
    pub fn from_point(p: DVec3) -> Self {
        Self {
            center: p,
            radius: PAD,
        }
    }

    /// Cap around the shorter great-circle arc from `a` to `b`.
    ///
    /// Antipodal endpoints have no unique arc and yield [`Cap::FULL`].
    pub fn from_arc(a: DVec3, b: DVec3) -> Self {
        match (a + b).try_normalize() {
            Some(center) => Self {
                center,
                radius: angle(center, a).max(angle(center, b)) + PAD,
            }
            .clamped(),
            None => Self::FULL,
        }
    }

    /// Unit vector at the center.
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Angular radius in radians.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// True if the cap covers the whole sphere.
    pub fn is_full(&self) -> bool {
        self.radius >= PI
    }

    /// True if `p` lies inside or on the cap.
    pub fn contains_point(&self, p: DVec3) -> bool {
        self.is_full() || angle(self.center, p) <= self.radius
    }

    /// Lower bound on the central angle between a point of `self` and a point of `other`.
    pub fn distance_lower_bound(&self, other: &Self) -> f64 {
        if self.is_full() || other.is_full() {
            return 0.0;
        }
        (angle(self.center, other.center) - self.radius - other.radius).max(0.0)
    }

    fn clamped(self) -> Self {
        if self.is_full() { Self::FULL } else { self }
    }
}

impl BoundingVolume for Cap {
    fn union(&self, other: &Self) -> Self {
        if self.is_full() || other.is_full() {
            return Self::FULL;
        }
        let d = angle(self.center, other.center);
        if d + other.radius <= self.radius {
            return *self;
        }
        if d + self.radius <= other.radius {
            return *other;
        }
        let r = 0.5 * (d + self.radius + other.radius);
        if r >= PI {
            return Self::FULL;
        }
        // Slide the center from `self` towards `other` along their great circle.
        let Some(dir) = (other.center - self.center * self.center.dot(other.center)).try_normalize()
        else {
            return Self::FULL;
        };
        let t = r - self.radius;
        let center = (self.center * t.cos() + dir * t.sin()).normalize();
        let radius = (angle(center, self.center) + self.radius)
            .max(angle(center, other.center) + other.radius)
            + PAD;
        Self { center, radius }.clamped()
    }

    fn contains(&self, other: &Self) -> bool {
        self.is_full() || angle(self.center, other.center) + other.radius <= self.radius
    }

    fn intersects(&self, other: &Self) -> bool {
        self.is_full()
            || other.is_full()
            || angle(self.center, other.center) <= self.radius + other.radius
    }

    fn extent(&self) -> f64 {
        self.radius
    }
}

/// Sign of the triple product `(a × b) · c`, as a float.
fn orient(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    a.cross(b).dot(c)
}

/// True if arcs `ab` and `cd` cross at a point interior to both.
fn arcs_cross(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> bool {
    let acb = -orient(a, b, c);
    let bda = orient(a, b, d);
    if acb * bda <= 0.0 {
        return false;
    }
    let cbd = -orient(c, d, b);
    let dac = orient(c, d, a);
    acb * cbd > 0.0 && acb * dac > 0.0
}

/// Crossing point of two arcs known to cross.
fn crossing_point(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> DVec3 {
    let x = a.cross(b).cross(c.cross(d)).normalize_or_zero();
    // The two great circles meet twice; keep the meeting point near the arcs.
    if x.dot(a + b + c + d) < 0.0 { -x } else { x }
}

/// Closest point to `x` on arc `ab`, and its central angle from `x`.
fn point_arc(x: DVec3, a: DVec3, b: DVec3) -> (f64, DVec3) {
    if x == a || x == b {
        return (0.0, x);
    }
    let n = a.cross(b);
    let n2 = n.length_squared();
    if n2 > 0.0 {
        let p = x - n * (x.dot(n) / n2);
        if n.cross(a).dot(p) > 0.0
            && b.cross(n).dot(p) > 0.0
            && let Some(q) = p.try_normalize()
        {
            return (angle(x, q), q);
        }
    }
    let (da, db) = (angle(x, a), angle(x, b));
    if da <= db { (da, a) } else { (db, b) }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Geodetic {
    pub(crate) radius: f64,
}

impl Space for Geodetic {
    type Vertex = DVec3;
    type Volume = Cap;

    fn metric(&self) -> Metric {
        Metric::Geodetic {
            radius: self.radius,
        }
    }

    fn lift(&self, p: Point) -> Result<DVec3, DistanceError> {
        if !p.is_finite() || !(-90.0..=90.0).contains(&p.y) {
            return Err(DistanceError::InvalidCoordinate { x: p.x, y: p.y });
        }
        let (lon, lat) = (p.x.to_radians(), p.y.to_radians());
        let (sin_lat, cos_lat) = (lat.sin(), lat.cos());
        Ok(DVec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), sin_lat))
    }

    fn lower(&self, v: DVec3) -> Point {
        let lat = v.z.atan2(v.x.hypot(v.y));
        let lon = v.y.atan2(v.x);
        Point::new(lon.to_degrees(), lat.to_degrees())
    }

    fn edge_volume(&self, a: DVec3, b: DVec3) -> Cap {
        if a == b {
            Cap::from_point(a)
        } else {
            Cap::from_arc(a, b)
        }
    }

    fn volume_distance(&self, a: &Cap, b: &Cap) -> f64 {
        a.distance_lower_bound(b)
    }

    fn edge_distance(&self, a: (DVec3, DVec3), b: (DVec3, DVec3)) -> Closest<DVec3> {
        if arcs_cross(a.0, a.1, b.0, b.1) {
            let x = crossing_point(a.0, a.1, b.0, b.1);
            return (0.0, x, x);
        }
        let mut best = {
            let (d, q) = point_arc(a.0, b.0, b.1);
            (d, a.0, q)
        };
        let (d, q) = point_arc(a.1, b.0, b.1);
        if d < best.0 {
            best = (d, a.1, q);
        }
        for end in [b.0, b.1] {
            let (d, q) = point_arc(end, a.0, a.1);
            if d < best.0 {
                best = (d, q, end);
            }
        }
        best
    }

    fn ring_contains(&self, ring: &[DVec3], volume: &Cap, p: DVec3) -> bool {
        if !volume.contains_point(p) {
            return false;
        }
        let Some(&last) = ring.last() else {
            return false;
        };
        // Winding number of the ring around `p`, measured in the tangent
        // plane at `p`. Directions of great circles leaving `p` are the
        // tangent components of their targets.
        let tangent = |v: DVec3| v - p * p.dot(v);
        let mut prev = tangent(last);
        let mut sum = 0.0;
        for &v in ring {
            let cur = tangent(v);
            sum += p.dot(prev.cross(cur)).atan2(prev.dot(cur));
            prev = cur;
        }
        sum.abs() > PI
    }

    fn scale(&self, d: f64) -> f64 {
        d * self.radius
    }

    fn unscale(&self, d: f64) -> f64 {
        d / self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MEAN_EARTH_RADIUS;

    const EARTH: Geodetic = Geodetic {
        radius: MEAN_EARTH_RADIUS,
    };

    fn v(lon: f64, lat: f64) -> DVec3 {
        EARTH.lift(Point::new(lon, lat)).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(1.0)
    }

    #[test]
    fn lift_and_lower_invert() {
        let p = Point::new(-73.5, 40.25);
        let q = EARTH.lower(EARTH.lift(p).unwrap());
        assert!((p - q).hypot() < 1e-9, "{q:?}");
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        assert_eq!(
            EARTH.lift(Point::new(0.0, 91.0)),
            Err(DistanceError::InvalidCoordinate { x: 0.0, y: 91.0 })
        );
        assert!(EARTH.lift(Point::new(400.0, -90.0)).is_ok(), "longitude wraps");
    }

    #[test]
    fn point_to_arc_foot_is_on_the_meridian() {
        let (d, _, q) = EARTH.edge_distance((v(5.0, 3.0), v(5.0, 3.0)), (v(0.0, 0.0), v(10.0, 0.0)));
        assert!(close(d, 3.0_f64.to_radians()), "{d}");
        let foot = EARTH.lower(q);
        assert!((foot - Point::new(5.0, 0.0)).hypot() < 1e-9, "{foot:?}");
    }

    #[test]
    fn beyond_the_arc_measures_to_the_endpoint() {
        let (d, _, q) = EARTH.edge_distance((v(12.0, 0.0), v(12.0, 0.0)), (v(0.0, 0.0), v(10.0, 0.0)));
        assert!(close(d, 2.0_f64.to_radians()), "{d}");
        assert_eq!(q, v(10.0, 0.0));
    }

    #[test]
    fn crossing_arcs_are_at_zero() {
        let (d, a, b) = EARTH.edge_distance((v(-1.0, -1.0), v(1.0, 1.0)), (v(-1.0, 1.0), v(1.0, -1.0)));
        assert_eq!(d, 0.0);
        assert_eq!(a, b);
        assert!(EARTH.lower(a).to_vec2().hypot() < 1e-9, "crossing near origin");
    }

    #[test]
    fn shared_vertex_is_exactly_zero() {
        let (d, ..) = EARTH.edge_distance((v(0.0, 0.0), v(1.0, 1.0)), (v(1.0, 1.0), v(2.0, 0.0)));
        assert_eq!(d, 0.0);
    }

    #[test]
    fn arc_caps_contain_their_arcs() {
        let (a, b) = (v(-20.0, 10.0), v(30.0, 40.0));
        let cap = Cap::from_arc(a, b);
        assert!(cap.contains_point(a) && cap.contains_point(b), "endpoints");
        for i in 1..10 {
            let t = f64::from(i) / 10.0;
            let mid = (a * (1.0 - t) + b * t).normalize();
            assert!(cap.contains_point(mid), "interior point {i}");
        }
        assert!(Cap::from_arc(DVec3::X, -DVec3::X).is_full(), "antipodal");
    }

    #[test]
    fn union_contains_both_caps() {
        let a = Cap::from_arc(v(0.0, 0.0), v(1.0, 0.0));
        let b = Cap::from_arc(v(50.0, 20.0), v(51.0, 22.0));
        let u = a.union(&b);
        assert!(u.contains(&a) && u.contains(&b), "{u:?}");
        assert!(!u.is_full(), "small caps make a small union");
        assert_eq!(a.union(&a), a);
        let far = Cap::from_arc(v(179.0, 0.0), v(180.0, 0.0));
        assert!(a.union(&far).contains(&far), "near-antipodal union");
    }

    #[test]
    fn cap_bound_never_exceeds_exact_distance() {
        let a = (v(0.0, 0.0), v(2.0, 1.0));
        let b = (v(10.0, 5.0), v(12.0, 3.0));
        let bound = EARTH.volume_distance(&EARTH.edge_volume(a.0, a.1), &EARTH.edge_volume(b.0, b.1));
        let (exact, ..) = EARTH.edge_distance(a, b);
        assert!(bound > 0.0 && bound <= exact, "{bound} vs {exact}");
    }

    #[test]
    fn winding_containment() {
        let ring = [v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0), v(0.0, 0.0)];
        let cap = ring
            .windows(2)
            .map(|w| EARTH.edge_volume(w[0], w[1]))
            .reduce(|x, y| x.union(&y))
            .unwrap();
        assert!(EARTH.ring_contains(&ring, &cap, v(5.0, 5.0)), "inside");
        assert!(!EARTH.ring_contains(&ring, &cap, v(20.0, 5.0)), "outside the cap");
        assert!(!EARTH.ring_contains(&ring, &cap, v(10.5, 5.0)), "outside the ring");
    }

    #[test]
    fn scale_uses_the_radius() {
        let unit = Geodetic { radius: 2.0 };
        assert_eq!(unit.scale(PI), 2.0 * PI);
        assert_eq!(unit.unscale(2.0), 1.0);
    }
}
