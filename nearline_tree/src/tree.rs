// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary bounding hierarchy over the edges of one vertex sequence.
//!
//! The builder exploits the fact that consecutive edges of a ring or
//! linestring are already spatially close. Instead of sorting, it merges
//! neighbouring nodes pairwise, level by level:
//!
//! ```text
//! level 0:  e0  e1  e2  e3  e4        (one leaf per edge, sequence order)
//! level 1:  [e0 e1] [e2 e3]  e4       (odd node carried forward)
//! level 2:  [[e0 e1] [e2 e3]]  e4
//! level 3:  [[[e0 e1] [e2 e3]] e4]    (root)
//! ```
//!
//! Each pass touches half as many nodes as the previous one, so the total cost
//! is `n + n/2 + n/4 + ... = O(n)` unions, and exactly `n - 1` of them.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::volume::BoundingVolume;

/// Handle of a node in an [`EdgeTree`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

/// Shape of a node: a single edge, or exactly two children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Leaf referencing edge `edge` of the source sequence.
    Leaf {
        /// Edge index, `0..leaf_count`.
        edge: usize,
    },
    /// Interior node whose volume is the union of both children.
    Internal {
        /// Left child.
        left: NodeIdx,
        /// Right child.
        right: NodeIdx,
    },
}

#[derive(Clone, Debug)]
struct Node<V> {
    volume: V,
    kind: Kind,
}

/// Counters recorded while building an [`EdgeTree`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of leaves (edges).
    pub leaves: usize,
    /// Number of pairwise volume unions performed.
    pub merges: usize,
    /// Number of merge passes until a single root remained.
    pub levels: usize,
}

/// Immutable bounding-volume tree over the edges of one vertex sequence.
///
/// Nodes live in a flat arena and refer to their children by index; the tree
/// is strictly binary and never shared between sequences.
#[derive(Clone)]
pub struct EdgeTree<V: BoundingVolume> {
    root: NodeIdx,
    arena: Vec<Node<V>>,
    stats: BuildStats,
}

impl<V: BoundingVolume> EdgeTree<V> {
    /// Build a tree from one volume per edge, given in sequence order.
    ///
    /// Returns `None` if there are no leaves. A single leaf is the whole tree.
    pub fn from_leaves<I>(leaves: I) -> Option<Self>
    where
        I: IntoIterator<Item = V>,
    {
        let leaves = leaves.into_iter();
        let (lower, _) = leaves.size_hint();
        // A binary tree with n leaves has 2n - 1 nodes.
        let mut arena: Vec<Node<V>> = Vec::with_capacity((2 * lower).saturating_sub(1));
        for (edge, volume) in leaves.enumerate() {
            arena.push(Node {
                volume,
                kind: Kind::Leaf { edge },
            });
        }
        if arena.is_empty() {
            return None;
        }

        let mut stats = BuildStats {
            leaves: arena.len(),
            ..BuildStats::default()
        };
        let mut level: Vec<NodeIdx> = (0..arena.len()).map(NodeIdx::new).collect();
        while level.len() > 1 {
            // Merge consecutive pairs in place; the write cursor trails the read cursor.
            let mut write = 0;
            let mut read = 0;
            while read < level.len() {
                if read + 1 < level.len() {
                    let left = level[read];
                    let right = level[read + 1];
                    let volume = arena[left.get()]
                        .volume
                        .union(&arena[right.get()].volume);
                    let idx = NodeIdx::new(arena.len());
                    arena.push(Node {
                        volume,
                        kind: Kind::Internal { left, right },
                    });
                    stats.merges += 1;
                    level[write] = idx;
                    read += 2;
                } else {
                    level[write] = level[read];
                    read += 1;
                }
                write += 1;
            }
            level.truncate(write);
            stats.levels += 1;
        }

        Some(Self {
            root: level[0],
            arena,
            stats,
        })
    }

    /// Root node handle.
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    /// Volume of the root, covering every edge.
    pub fn root_volume(&self) -> &V {
        &self.arena[self.root.get()].volume
    }

    /// Volume stored at `node`.
    pub fn volume(&self, node: NodeIdx) -> &V {
        &self.arena[node.get()].volume
    }

    /// Shape of `node`.
    pub fn kind(&self, node: NodeIdx) -> Kind {
        self.arena[node.get()].kind
    }

    /// Number of leaves, i.e. edges of the source sequence.
    pub fn leaf_count(&self) -> usize {
        self.stats.leaves
    }

    /// Total number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Counters recorded by the build.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Leaf volumes in edge order.
    pub fn leaves(&self) -> impl Iterator<Item = (usize, &V)> + '_ {
        // Leaves are pushed first, in edge order, so they occupy the arena prefix.
        self.arena[..self.stats.leaves]
            .iter()
            .enumerate()
            .map(|(edge, n)| (edge, &n.volume))
    }

    /// Verify the structural invariants of the tree.
    ///
    /// Every interior node's volume must contain both children's volumes, and
    /// every edge `0..leaf_count` must be reachable from the root exactly once.
    /// On failure, returns the first offending node.
    pub fn check_invariants(&self) -> Result<(), NodeIdx> {
        let mut seen = alloc::vec![false; self.stats.leaves];
        let mut stack = alloc::vec![self.root];
        while let Some(i) = stack.pop() {
            let node = &self.arena[i.get()];
            match node.kind {
                Kind::Leaf { edge } => {
                    match seen.get_mut(edge) {
                        Some(s) if !*s => *s = true,
                        _ => return Err(i),
                    }
                }
                Kind::Internal { left, right } => {
                    if !node.volume.contains(self.volume(left))
                        || !node.volume.contains(self.volume(right))
                    {
                        return Err(i);
                    }
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        if seen.iter().all(|s| *s) {
            Ok(())
        } else {
            Err(self.root)
        }
    }
}

impl<V: BoundingVolume> Debug for EdgeTree<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EdgeTree")
            .field("leaves", &self.stats.leaves)
            .field("arena_nodes", &self.arena.len())
            .field("levels", &self.stats.levels)
            .field("root_volume", self.root_volume())
            .finish_non_exhaustive()
    }
}
