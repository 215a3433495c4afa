// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-first simultaneous descent of two edge trees.
//!
//! The descent keeps a work list of node pairs ordered by the lower bound of
//! the distance between their volumes. A pair whose bound cannot beat the best
//! exact distance found so far is discarded together with everything still in
//! the list, since the list is ordered. Leaf pairs are handed to the caller's
//! [`PairQuery`] for an exact edge-to-edge distance.
//!
//! The order in which pairs are visited only affects how much gets pruned,
//! never the minimum that is found.

use alloc::collections::BinaryHeap;
use core::cmp::Ordering;

use crate::tree::{EdgeTree, Kind, NodeIdx};
use crate::volume::BoundingVolume;

/// Metric-specific primitives the descent is parameterized over.
pub trait PairQuery<V: BoundingVolume> {
    /// Lower bound on the distance between anything inside `a` and anything inside `b`.
    ///
    /// Must never exceed the exact distance of any edge pair the volumes contain.
    fn volume_distance(&self, a: &V, b: &V) -> f64;

    /// Exact distance between edge `a` of the first tree and edge `b` of the second.
    fn leaf_distance(&mut self, a: usize, b: usize) -> f64;

    /// Cooperative cancellation point, polled once per work-list iteration.
    fn interrupted(&mut self) -> bool {
        false
    }
}

/// Thresholds that seed and cut short a descent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Initial upper bound. Only edge pairs strictly closer than this are reported.
    pub seed: f64,
    /// The descent stops as soon as the best distance is at or below this value.
    pub stop_at: f64,
}

impl Bounds {
    /// Find the true minimum: no seed, stop only at zero.
    pub const EXHAUSTIVE: Self = Self {
        seed: f64::INFINITY,
        stop_at: 0.0,
    };

    /// Answer "is any edge pair within `threshold`?" (inclusive).
    pub fn within(threshold: f64) -> Self {
        Self {
            seed: threshold.next_up(),
            stop_at: threshold,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EXHAUSTIVE
    }
}

/// Best edge pair found by a descent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BestPair {
    /// Smallest exact distance found, or the seed if nothing beat it.
    pub distance: f64,
    /// Edge indices `(a, b)` achieving `distance`, if any pair beat the seed.
    pub edges: Option<(usize, usize)>,
}

/// Why a descent returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The work list was exhausted or fully pruned; `best` is the minimum.
    Complete,
    /// The best distance reached [`Bounds::stop_at`].
    Satisfied,
    /// [`PairQuery::interrupted`] returned true.
    Interrupted,
}

/// Result of [`descend`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Descent {
    /// Best pair found.
    pub best: BestPair,
    /// How the descent ended.
    pub status: Status,
    /// Node pairs popped from the work list.
    pub visited: usize,
    /// Leaf pairs evaluated exactly.
    pub evaluated: usize,
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    bound: f64,
    a: NodeIdx,
    b: NodeIdx,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Reversed so that `BinaryHeap` pops the smallest bound first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.bound.total_cmp(&self.bound)
    }
}

/// Find the closest edge pair between two trees.
pub fn descend<V, Q>(a: &EdgeTree<V>, b: &EdgeTree<V>, query: &mut Q, bounds: Bounds) -> Descent
where
    V: BoundingVolume,
    Q: PairQuery<V>,
{
    let mut out = Descent {
        best: BestPair {
            distance: bounds.seed,
            edges: None,
        },
        status: Status::Complete,
        visited: 0,
        evaluated: 0,
    };
    if out.best.distance <= bounds.stop_at {
        out.status = Status::Satisfied;
        return out;
    }

    let mut work = BinaryHeap::new();
    work.push(Candidate {
        bound: query.volume_distance(a.root_volume(), b.root_volume()),
        a: a.root(),
        b: b.root(),
    });

    while let Some(c) = work.pop() {
        if query.interrupted() {
            out.status = Status::Interrupted;
            return out;
        }
        out.visited += 1;
        if c.bound >= out.best.distance {
            // Every remaining candidate is at least as far.
            break;
        }
        match (a.kind(c.a), b.kind(c.b)) {
            (Kind::Leaf { edge: ea }, Kind::Leaf { edge: eb }) => {
                out.evaluated += 1;
                let d = query.leaf_distance(ea, eb);
                if d < out.best.distance {
                    out.best = BestPair {
                        distance: d,
                        edges: Some((ea, eb)),
                    };
                    if d <= bounds.stop_at {
                        out.status = Status::Satisfied;
                        return out;
                    }
                }
            }
            (ka, kb) => {
                let split_a = match (ka, kb) {
                    (Kind::Leaf { .. }, _) => false,
                    (_, Kind::Leaf { .. }) => true,
                    _ => a.volume(c.a).extent() >= b.volume(c.b).extent(),
                };
                if split_a {
                    if let Kind::Internal { left, right } = ka {
                        for child in [left, right] {
                            push(&mut work, query, a, b, child, c.b, out.best.distance);
                        }
                    }
                } else if let Kind::Internal { left, right } = kb {
                    for child in [left, right] {
                        push(&mut work, query, a, b, c.a, child, out.best.distance);
                    }
                }
            }
        }
    }
    out
}

fn push<V, Q>(
    work: &mut BinaryHeap<Candidate>,
    query: &Q,
    a: &EdgeTree<V>,
    b: &EdgeTree<V>,
    na: NodeIdx,
    nb: NodeIdx,
    best: f64,
) where
    V: BoundingVolume,
    Q: PairQuery<V>,
{
    let bound = query.volume_distance(a.volume(na), b.volume(nb));
    if bound < best {
        work.push(Candidate {
            bound,
            a: na,
            b: nb,
        });
    }
}
