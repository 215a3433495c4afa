// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometries with their edge trees built once, for repeated queries.

use alloc::vec::Vec;

use kurbo::Point;
use nearline_tree::{Aabb2D, BoundingVolume, BuildStats, EdgeTree};
use tracing::debug;

use crate::config::Metric;
use crate::error::DistanceError;
use crate::extract::{Part, PartKind, VertexSequence, extract};
use crate::geometry::Geometry;
use crate::space::{Geodetic, Planar, Space};

/// Endpoints of edge `i`; a single vertex is its own zero-length edge.
fn edge_of<V: Copy>(vertices: &[V], i: usize) -> (V, V) {
    match vertices {
        [only] => (*only, *only),
        v => (v[i], v[i + 1]),
    }
}

/// One vertex sequence lifted into a space, with its edge tree.
#[derive(Clone, Debug)]
pub(crate) struct Ring<S: Space> {
    vertices: Vec<S::Vertex>,
    tree: EdgeTree<S::Volume>,
}

impl<S: Space> Ring<S> {
    fn build(space: &S, seq: &VertexSequence) -> Result<Self, DistanceError> {
        let vertices = seq
            .points()
            .iter()
            .map(|&p| space.lift(p))
            .collect::<Result<Vec<_>, _>>()?;
        let leaves = (0..seq.edge_count()).map(|i| {
            let (a, b) = edge_of(&vertices, i);
            space.edge_volume(a, b)
        });
        let tree = EdgeTree::from_leaves(leaves).ok_or(DistanceError::EmptyGeometry)?;
        Ok(Self { vertices, tree })
    }

    pub(crate) fn edge(&self, i: usize) -> (S::Vertex, S::Vertex) {
        edge_of(&self.vertices, i)
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.tree.leaf_count()
    }

    pub(crate) fn first(&self) -> S::Vertex {
        self.vertices[0]
    }

    pub(crate) fn tree(&self) -> &EdgeTree<S::Volume> {
        &self.tree
    }
}

/// The rings of one part and the volume enclosing all of them.
#[derive(Clone, Debug)]
pub(crate) struct PartShape<S: Space> {
    pub(crate) kind: PartKind,
    pub(crate) rings: Vec<Ring<S>>,
    pub(crate) volume: S::Volume,
}

impl<S: Space> PartShape<S> {
    /// True if `p` is strictly inside this areal part: inside the shell and
    /// outside every hole.
    pub(crate) fn contains(&self, space: &S, p: S::Vertex) -> bool {
        if self.kind != PartKind::Areal {
            return false;
        }
        let mut rings = self.rings.iter();
        let Some(shell) = rings.next() else {
            return false;
        };
        space.ring_contains(&shell.vertices, shell.tree.root_volume(), p)
            && !rings.any(|hole| space.ring_contains(&hole.vertices, hole.tree.root_volume(), p))
    }

    /// A vertex known to lie on this part.
    pub(crate) fn probe(&self) -> S::Vertex {
        self.rings[0].first()
    }
}

/// All parts of a geometry in one space.
#[derive(Clone, Debug)]
pub(crate) struct Shape<S: Space> {
    pub(crate) space: S,
    pub(crate) parts: Vec<PartShape<S>>,
    pub(crate) volume: S::Volume,
}

impl<S: Space> Shape<S> {
    fn build(space: S, parts: &[Part]) -> Result<Self, DistanceError> {
        let mut shaped = Vec::with_capacity(parts.len());
        for part in parts {
            let rings = part
                .rings
                .iter()
                .map(|seq| Ring::build(&space, seq))
                .collect::<Result<Vec<_>, _>>()?;
            let volume = rings
                .iter()
                .map(|r| *r.tree.root_volume())
                .reduce(|a, b| a.union(&b))
                .ok_or(DistanceError::EmptyGeometry)?;
            shaped.push(PartShape {
                kind: part.kind,
                rings,
                volume,
            });
        }
        let volume = shaped
            .iter()
            .map(|p| p.volume)
            .reduce(|a, b| a.union(&b))
            .ok_or(DistanceError::EmptyGeometry)?;
        Ok(Self {
            space,
            parts: shaped,
            volume,
        })
    }

    fn rings(&self) -> impl Iterator<Item = &Ring<S>> + '_ {
        self.parts.iter().flat_map(|p| p.rings.iter())
    }

    fn build_stats(&self) -> BuildStats {
        self.rings()
            .map(|r| r.tree.stats())
            .fold(BuildStats::default(), |acc, s| BuildStats {
                leaves: acc.leaves + s.leaves,
                merges: acc.merges + s.merges,
                levels: acc.levels.max(s.levels),
            })
    }

    /// First input vertex, in input coordinates.
    pub(crate) fn first_point(&self) -> Point {
        self.space.lower(self.parts[0].probe())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Prepared {
    Planar(Shape<Planar>),
    Geodetic(Shape<Geodetic>),
}

/// A geometry whose edge trees have been built for one [`Metric`].
///
/// Preparing is linear in the number of edges. A prepared geometry is
/// immutable and can be shared between threads, for example behind an
/// [`Arc`](alloc::sync::Arc), and measured against any number of others.
#[derive(Clone, Debug)]
pub struct PreparedGeometry {
    shape: Prepared,
    envelope: Aabb2D<f64>,
}

impl PreparedGeometry {
    /// Decompose `geometry` and build one edge tree per ring.
    ///
    /// # Errors
    ///
    /// - [`DistanceError::EmptyGeometry`] if `geometry` has no coordinates.
    /// - [`DistanceError::InvalidCoordinate`] for non-finite coordinates, or
    ///   latitudes outside ±90° under [`Metric::Geodetic`].
    /// - [`DistanceError::InvalidRadius`] for a geodetic radius that is not
    ///   finite and positive.
    pub fn new(geometry: &Geometry, metric: Metric) -> Result<Self, DistanceError> {
        let parts = extract(geometry)?;
        let envelope = parts
            .iter()
            .flat_map(|part| part.rings.iter())
            .flat_map(|ring| ring.points())
            .map(|p| Aabb2D::from_point(p.x, p.y))
            .reduce(|a, b| a.union(&b))
            .ok_or(DistanceError::EmptyGeometry)?;
        let shape = match metric {
            Metric::Planar => Prepared::Planar(Shape::build(Planar, &parts)?),
            Metric::Geodetic { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(DistanceError::InvalidRadius { radius });
                }
                Prepared::Geodetic(Shape::build(Geodetic { radius }, &parts)?)
            }
        };
        let prepared = Self { shape, envelope };
        let stats = prepared.build_stats();
        debug!(
            ?metric,
            parts = prepared.part_count(),
            edges = stats.leaves,
            merges = stats.merges,
            levels = stats.levels,
            "prepared geometry"
        );
        Ok(prepared)
    }

    pub(crate) fn shape(&self) -> &Prepared {
        &self.shape
    }

    /// Metric the trees were built for.
    pub fn metric(&self) -> Metric {
        match &self.shape {
            Prepared::Planar(s) => s.space.metric(),
            Prepared::Geodetic(s) => s.space.metric(),
        }
    }

    /// Number of non-empty parts (points, lines, polygons).
    pub fn part_count(&self) -> usize {
        match &self.shape {
            Prepared::Planar(s) => s.parts.len(),
            Prepared::Geodetic(s) => s.parts.len(),
        }
    }

    /// Number of vertex sequences, one edge tree each.
    pub fn ring_count(&self) -> usize {
        match &self.shape {
            Prepared::Planar(s) => s.rings().count(),
            Prepared::Geodetic(s) => s.rings().count(),
        }
    }

    /// Total number of edges over all rings.
    pub fn edge_count(&self) -> usize {
        self.build_stats().leaves
    }

    /// Input-coordinate bounding box of every vertex.
    pub fn envelope(&self) -> Aabb2D<f64> {
        self.envelope
    }

    /// Tree build counters summed over all rings; `levels` is the deepest ring's.
    pub fn build_stats(&self) -> BuildStats {
        match &self.shape {
            Prepared::Planar(s) => s.build_stats(),
            Prepared::Geodetic(s) => s.build_stats(),
        }
    }

    /// Check every ring's tree for the parent-contains-children invariant.
    pub fn check_trees(&self) -> bool {
        match &self.shape {
            Prepared::Planar(s) => s.rings().all(|r| r.tree.check_invariants().is_ok()),
            Prepared::Geodetic(s) => s.rings().all(|r| r.tree.check_invariants().is_ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use alloc::vec;

    fn zigzag(n: usize) -> Geometry {
        Geometry::LineString(
            (0..=n)
                .map(|i| Point::new(i as f64, if i % 2 == 0 { 0.0 } else { 1.0 }))
                .collect(),
        )
    }

    #[test]
    fn one_tree_per_ring() {
        let mut poly = Polygon::rect(0.0, 0.0, 10.0, 10.0);
        poly.interiors.push(Polygon::rect(2.0, 2.0, 3.0, 3.0).exterior);
        let g = Geometry::Collection(vec![poly.into(), zigzag(6)]);
        let p = PreparedGeometry::new(&g, Metric::Planar).unwrap();
        assert_eq!(p.part_count(), 2);
        assert_eq!(p.ring_count(), 3);
        assert_eq!(p.edge_count(), 4 + 4 + 6);
        assert_eq!(p.envelope(), Aabb2D::new(0.0, 0.0, 10.0, 10.0));
        assert!(p.check_trees(), "invariants");
    }

    #[test]
    fn stats_sum_rings_and_keep_the_deepest() {
        let g = Geometry::MultiLineString(vec![
            (0..5).map(|i| Point::new(f64::from(i), 0.0)).collect(),
            (0..9).map(|i| Point::new(f64::from(i), 5.0)).collect(),
            vec![Point::new(0.0, 9.0)],
        ]);
        let p = PreparedGeometry::new(&g, Metric::Planar).unwrap();
        let stats = p.build_stats();
        assert_eq!(stats.leaves, 4 + 8 + 1);
        assert_eq!(stats.merges, 3 + 7);
        assert_eq!(stats.levels, 3, "eight edges take three levels");
        assert_eq!(p.edge_count(), 13);
        assert_eq!(p.envelope(), Aabb2D::new(0.0, 0.0, 8.0, 9.0));
    }

    #[test]
    fn build_cost_is_linear() {
        for n in [1, 2, 3, 10, 1000, 4096] {
            let p = PreparedGeometry::new(&zigzag(n), Metric::Planar).unwrap();
            let stats = p.build_stats();
            assert_eq!(stats.leaves, n);
            assert_eq!(stats.merges, n - 1, "n = {n}");
            assert!(p.check_trees(), "n = {n}");
        }
    }

    #[test]
    fn single_point_is_a_single_leaf() {
        let p = PreparedGeometry::new(&Point::new(3.0, 4.0).into(), Metric::Planar).unwrap();
        let stats = p.build_stats();
        assert_eq!((stats.leaves, stats.merges, stats.levels), (1, 0, 0));
    }

    #[test]
    fn geodetic_trees_hold_their_invariants() {
        let line = Geometry::LineString(
            (0..200)
                .map(|i| {
                    let t = f64::from(i);
                    Point::new(-170.0 + 1.7 * t, 60.0 * (t / 15.0).sin())
                })
                .collect(),
        );
        let p = PreparedGeometry::new(&line, Metric::geodetic()).unwrap();
        assert_eq!(p.metric(), Metric::geodetic());
        assert_eq!(p.build_stats().merges, 198);
        assert!(p.check_trees(), "caps must nest");
    }

    #[test]
    fn bad_inputs_are_reported() {
        let outside = Geometry::Point(Point::new(0.0, -95.0));
        assert!(PreparedGeometry::new(&outside, Metric::Planar).is_ok(), "planar has no range");
        assert_eq!(
            PreparedGeometry::new(&outside, Metric::geodetic()).unwrap_err(),
            DistanceError::InvalidCoordinate { x: 0.0, y: -95.0 }
        );
        let p = Geometry::Point(Point::ORIGIN);
        assert_eq!(
            PreparedGeometry::new(&p, Metric::Geodetic { radius: 0.0 }).unwrap_err(),
            DistanceError::InvalidRadius { radius: 0.0 }
        );
        assert_eq!(
            PreparedGeometry::new(&Geometry::MultiPoint(Vec::new()), Metric::Planar).unwrap_err(),
            DistanceError::EmptyGeometry
        );
    }

    #[test]
    fn prepared_geometry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PreparedGeometry>();
    }
}
