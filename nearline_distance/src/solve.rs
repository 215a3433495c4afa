// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two distance solvers and the dispatch between them.
//!
//! Both solvers share one contract: given two shapes in the same space, fold
//! every edge pair into an [`Accumulator`] and stop once its threshold is met.
//! [`Solver::Disjoint`] prunes with the edge trees; [`Solver::Overlapping`]
//! compares every edge pair. Before either looks at edges, a part pair whose
//! volumes meet is checked for containment, since a point or line strictly
//! inside a polygon has no edge at distance zero.

use kurbo::Point;
use nearline_tree::{BoundingVolume, Bounds, PairQuery, Status, descend};
use tracing::{debug, trace};

use crate::config::Solver;
use crate::error::DistanceError;
use crate::prepared::{PartShape, Ring, Shape};
use crate::query::Interrupt;
use crate::space::Space;

/// Query-scoped running minimum.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Accumulator<V> {
    distance: f64,
    witness: Option<(V, V)>,
    stop_at: f64,
}

impl<V: Copy> Accumulator<V> {
    pub(crate) fn new(bounds: Bounds) -> Self {
        Self {
            distance: bounds.seed,
            witness: None,
            stop_at: bounds.stop_at,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds {
            seed: self.distance,
            stop_at: self.stop_at,
        }
    }

    /// Record `d` if it is strictly better than the current best.
    fn offer(&mut self, d: f64, a: V, b: V) {
        if d < self.distance {
            self.distance = d;
            self.witness = Some((a, b));
        }
    }

    /// True once the best distance is at or below the stop threshold.
    pub(crate) fn satisfied(&self) -> bool {
        self.distance <= self.stop_at
    }
}

/// Pick a solver from the shapes' overall volumes, unless one is forced.
pub(crate) fn choose<S: Space>(a: &Shape<S>, b: &Shape<S>, forced: Option<Solver>) -> Solver {
    forced.unwrap_or(if a.volume.intersects(&b.volume) {
        Solver::Overlapping
    } else {
        Solver::Disjoint
    })
}

/// Result of [`measure`], in caller units and coordinates.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Outcome {
    pub(crate) distance: f64,
    pub(crate) a: Point,
    pub(crate) b: Point,
    pub(crate) satisfied: bool,
}

/// Run one query between two shapes of the same space.
pub(crate) fn measure<S, I>(
    a: &Shape<S>,
    b: &Shape<S>,
    forced: Option<Solver>,
    within: Option<f64>,
    interrupt: &mut I,
) -> Result<Outcome, DistanceError>
where
    S: Space,
    I: Interrupt + ?Sized,
{
    let space = a.space;
    let bounds = match within {
        None => Bounds::EXHAUSTIVE,
        Some(t) => Bounds::within(space.unscale(t)),
    };
    let solver = choose(a, b, forced);
    debug!(?solver, forced = forced.is_some(), ?within, "measuring distance");

    let mut acc = Accumulator::new(bounds);
    match solver {
        Solver::Disjoint => solve_disjoint(a, b, &mut acc, interrupt)?,
        Solver::Overlapping => solve_overlapping(a, b, &mut acc, interrupt)?,
    }

    let (pa, pb) = match acc.witness {
        Some((wa, wb)) => (space.lower(wa), space.lower(wb)),
        // Only reachable when no pair beat the seed.
        None => (a.first_point(), b.first_point()),
    };
    Ok(Outcome {
        distance: space.scale(acc.distance),
        a: pa,
        b: pb,
        satisfied: acc.satisfied(),
    })
}

/// Zero the accumulator if either part strictly contains the other.
///
/// When the boundaries cross, some edge pair is already at zero; when they do
/// not, containment of one vertex means containment of the whole part.
fn containment<S: Space>(
    space: &S,
    pa: &PartShape<S>,
    pb: &PartShape<S>,
    acc: &mut Accumulator<S::Vertex>,
) {
    if !pa.volume.intersects(&pb.volume) {
        return;
    }
    let probe = pb.probe();
    if pa.contains(space, probe) {
        acc.offer(0.0, probe, probe);
        return;
    }
    let probe = pa.probe();
    if pb.contains(space, probe) {
        acc.offer(0.0, probe, probe);
    }
}

/// Exact edge distances for the descent, remembering where the best one was.
struct RingPair<'a, S: Space, I: ?Sized> {
    space: &'a S,
    a: &'a Ring<S>,
    b: &'a Ring<S>,
    interrupt: &'a mut I,
    best: f64,
    witness: Option<(S::Vertex, S::Vertex)>,
}

impl<S: Space, I: Interrupt + ?Sized> PairQuery<S::Volume> for RingPair<'_, S, I> {
    fn volume_distance(&self, a: &S::Volume, b: &S::Volume) -> f64 {
        self.space.volume_distance(a, b)
    }

    fn leaf_distance(&mut self, a: usize, b: usize) -> f64 {
        let (d, wa, wb) = self.space.edge_distance(self.a.edge(a), self.b.edge(b));
        if d < self.best {
            self.best = d;
            self.witness = Some((wa, wb));
        }
        d
    }

    fn interrupted(&mut self) -> bool {
        self.interrupt.should_stop()
    }
}

/// Best-first descent of each ring pair's trees, sharing one running minimum.
pub(crate) fn solve_disjoint<S, I>(
    a: &Shape<S>,
    b: &Shape<S>,
    acc: &mut Accumulator<S::Vertex>,
    interrupt: &mut I,
) -> Result<(), DistanceError>
where
    S: Space,
    I: Interrupt + ?Sized,
{
    let space = &a.space;
    for pa in &a.parts {
        for pb in &b.parts {
            containment(space, pa, pb, acc);
            if acc.satisfied() {
                return Ok(());
            }
            if space.volume_distance(&pa.volume, &pb.volume) >= acc.distance {
                continue;
            }
            for ra in &pa.rings {
                for rb in &pb.rings {
                    let mut pair = RingPair {
                        space,
                        a: ra,
                        b: rb,
                        interrupt: &mut *interrupt,
                        best: acc.distance,
                        witness: None,
                    };
                    let found = descend(ra.tree(), rb.tree(), &mut pair, acc.bounds());
                    trace!(
                        visited = found.visited,
                        evaluated = found.evaluated,
                        status = ?found.status,
                        "ring pair descent"
                    );
                    if found.status == Status::Interrupted {
                        return Err(DistanceError::Interrupted);
                    }
                    if let Some((wa, wb)) = pair.witness {
                        acc.offer(found.best.distance, wa, wb);
                    }
                    if acc.satisfied() {
                        return Ok(());
                    }
                }
            }
        }
    }
    Ok(())
}

/// Compare every edge of `a` with every edge of `b`.
pub(crate) fn solve_overlapping<S, I>(
    a: &Shape<S>,
    b: &Shape<S>,
    acc: &mut Accumulator<S::Vertex>,
    interrupt: &mut I,
) -> Result<(), DistanceError>
where
    S: Space,
    I: Interrupt + ?Sized,
{
    let space = &a.space;
    for pa in &a.parts {
        for pb in &b.parts {
            containment(space, pa, pb, acc);
            if acc.satisfied() {
                return Ok(());
            }
            for ra in &pa.rings {
                for rb in &pb.rings {
                    for i in 0..ra.edge_count() {
                        if interrupt.should_stop() {
                            return Err(DistanceError::Interrupted);
                        }
                        let ea = ra.edge(i);
                        for j in 0..rb.edge_count() {
                            let (d, wa, wb) = space.edge_distance(ea, rb.edge(j));
                            acc.offer(d, wa, wb);
                            if acc.satisfied() {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Metric;
    use crate::geometry::{Geometry, Polygon};
    use crate::prepared::{Prepared, PreparedGeometry};
    use crate::query::Never;
    use crate::space::Planar;
    use alloc::vec::Vec;

    fn planar(g: &Geometry) -> Shape<Planar> {
        match PreparedGeometry::new(g, Metric::Planar).unwrap().shape() {
            Prepared::Planar(s) => s.clone(),
            Prepared::Geodetic(_) => unreachable!("planar metric"),
        }
    }

    fn both(a: &Geometry, b: &Geometry, within: Option<f64>) -> [Outcome; 2] {
        let (sa, sb) = (planar(a), planar(b));
        [Solver::Disjoint, Solver::Overlapping]
            .map(|s| measure(&sa, &sb, Some(s), within, &mut Never).unwrap())
    }

    #[test]
    fn dispatch_follows_volume_overlap() {
        let a = planar(&Polygon::rect(0.0, 0.0, 1.0, 1.0).into());
        let near = planar(&Polygon::rect(1.0, 0.0, 2.0, 1.0).into());
        let far = planar(&Polygon::rect(5.0, 0.0, 6.0, 1.0).into());
        assert_eq!(choose(&a, &near, None), Solver::Overlapping);
        assert_eq!(choose(&a, &far, None), Solver::Disjoint);
        assert_eq!(choose(&a, &far, Some(Solver::Overlapping)), Solver::Overlapping);
    }

    #[test]
    fn solvers_agree_on_separated_lines() {
        let a = Geometry::LineString((0..50).map(|i| Point::new(f64::from(i), 0.0)).collect());
        let b = Geometry::LineString(
            (0..50)
                .map(|i| Point::new(f64::from(i) + 0.5, 3.0 + f64::from(i % 7)))
                .collect(),
        );
        let [d, o] = both(&a, &b, None);
        assert_eq!(d.distance, 3.0);
        assert_eq!(d.distance, o.distance);
        assert_eq!(d.a.y, 0.0);
        assert_eq!(d.b.y, 3.0);
    }

    #[test]
    fn hole_is_not_inside() {
        let mut donut = Polygon::rect(0.0, 0.0, 10.0, 10.0);
        donut.interiors.push(Polygon::rect(3.0, 3.0, 7.0, 7.0).exterior);
        let donut = Geometry::from(donut);
        let center = Geometry::Point(Point::new(5.0, 5.0));
        let ring = Geometry::Point(Point::new(1.0, 5.0));
        for o in both(&donut, &center, None) {
            assert_eq!(o.distance, 2.0);
        }
        for o in both(&donut, &ring, None) {
            assert_eq!(o.distance, 0.0);
            assert_eq!(o.a, Point::new(1.0, 5.0));
        }
    }

    #[test]
    fn containment_works_in_both_argument_orders() {
        let outer = Geometry::from(Polygon::rect(0.0, 0.0, 10.0, 10.0));
        let inner = Geometry::from(Polygon::rect(4.0, 4.0, 5.0, 5.0));
        for o in both(&outer, &inner, None)
            .into_iter()
            .chain(both(&inner, &outer, None))
        {
            assert_eq!(o.distance, 0.0);
        }
    }

    #[test]
    fn within_is_inclusive_and_exits_early() {
        let a = Geometry::LineString(Vec::from([Point::new(0.0, 0.0), Point::new(10.0, 0.0)]));
        let b = Geometry::Point(Point::new(5.0, 3.0));
        for o in both(&a, &b, Some(3.0)) {
            assert!(o.satisfied, "exactly at the threshold");
        }
        for o in both(&a, &b, Some(2.5)) {
            assert!(!o.satisfied, "beyond the threshold");
        }
    }

    #[test]
    fn interrupt_stops_both_solvers() {
        let a = planar(&Geometry::LineString(
            (0..100).map(|i| Point::new(f64::from(i), 0.0)).collect(),
        ));
        let b = planar(&Geometry::LineString(
            (0..100).map(|i| Point::new(f64::from(i), 5.0)).collect(),
        ));
        for solver in [Solver::Disjoint, Solver::Overlapping] {
            let mut polls = 0;
            let mut stop = || {
                polls += 1;
                polls > 3
            };
            assert_eq!(
                measure(&a, &b, Some(solver), None, &mut stop).unwrap_err(),
                DistanceError::Interrupted
            );
        }
    }
}
