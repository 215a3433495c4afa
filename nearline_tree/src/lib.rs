// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearline Tree: linear-time bounding-volume trees over vertex sequences.
//!
//! Nearline Tree is the geometry-agnostic half of the Nearline distance engine.
//!
//! - Builds an [`EdgeTree`] over the edges of one ring or linestring in `O(n)`,
//!   by merging neighbouring edges pairwise instead of sorting them.
//! - Runs a best-first [`descend`] over two trees to find the closest pair of
//!   edges, pruning every node pair whose volumes cannot beat the best answer.
//! - Is generic over the [`BoundingVolume`] so planar boxes and spherical caps
//!   share the same build and the same descent.
//!
//! It does not know what an edge is. Callers hand it one volume per edge and
//! answer exact edge-to-edge distance questions through [`PairQuery`].
//!
//! # Example
//!
//! ```rust
//! use nearline_tree::{Aabb2D, Bounds, EdgeTree, PairQuery, descend};
//!
//! // Two horizontal polylines, given as vertex lists.
//! let a = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
//! let b = [(5.0, 4.0), (6.0, 4.0), (7.0, 4.0)];
//!
//! fn edges(v: &[(f64, f64)]) -> impl Iterator<Item = Aabb2D<f64>> + '_ {
//!     v.windows(2).map(|w| Aabb2D::from_corners(w[0].0, w[0].1, w[1].0, w[1].1))
//! }
//! let ta = EdgeTree::from_leaves(edges(&a)).unwrap();
//! let tb = EdgeTree::from_leaves(edges(&b)).unwrap();
//! assert_eq!(ta.stats().merges, 2);
//!
//! // Squared distances are monotonic, which is all the descent needs.
//! struct Gap<'a>(&'a [(f64, f64)], &'a [(f64, f64)]);
//! impl PairQuery<Aabb2D<f64>> for Gap<'_> {
//!     fn volume_distance(&self, a: &Aabb2D<f64>, b: &Aabb2D<f64>) -> f64 {
//!         a.distance_squared(b)
//!     }
//!     fn leaf_distance(&mut self, i: usize, j: usize) -> f64 {
//!         // The edges never overlap in x here, so the closest points are endpoints.
//!         let mut best = f64::INFINITY;
//!         for p in &self.0[i..i + 2] {
//!             for q in &self.1[j..j + 2] {
//!                 best = best.min((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2));
//!             }
//!         }
//!         best
//!     }
//! }
//!
//! let found = descend(&ta, &tb, &mut Gap(&a, &b), Bounds::EXHAUSTIVE);
//! assert_eq!(found.best.edges, Some((2, 0)));
//! assert_eq!(found.best.distance, 20.0);
//! ```
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in volumes or distances. Callers are expected to
//! reject non-finite coordinates before building trees.

#![no_std]

extern crate alloc;

pub mod descent;
pub mod tree;
pub mod types;
pub mod volume;

pub use descent::{BestPair, Bounds, Descent, PairQuery, Status, descend};
pub use tree::{BuildStats, EdgeTree, Kind, NodeIdx};
pub use types::{Aabb2D, Scalar};
pub use volume::BoundingVolume;
