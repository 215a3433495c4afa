// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use nearline_distance::{Geometry, Metric, PreparedGeometry};
use nearline_tree::{Aabb2D, EdgeTree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A random walk with steps of at most `step` per axis, so neighbouring edges
/// stay close.
fn random_walk(n: usize, step: f64, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    let mut p = Point::ZERO;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(p);
        p.x += (rng.next_f64() * 2.0 - 1.0) * step;
        p.y += (rng.next_f64() * 2.0 - 1.0) * step;
    }
    out
}

fn edge_boxes(points: &[Point]) -> Vec<Aabb2D<f64>> {
    points
        .windows(2)
        .map(|w| Aabb2D::from_corners(w[0].x, w[0].y, w[1].x, w[1].y))
        .collect()
}

fn bench_edge_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_tree_build");
    for &n in &[1_024usize, 4_096, 16_384, 65_536] {
        let boxes = edge_boxes(&random_walk(n, 1.0, 0x9E37_79B9_7F4A_7C15));
        group.throughput(Throughput::Elements(boxes.len() as u64));
        group.bench_function(format!("from_leaves_n{}", n), |b| {
            b.iter(|| {
                let tree = EdgeTree::from_leaves(boxes.iter().copied());
                black_box(tree.map(|t| t.node_count()));
            });
        });
    }
    group.finish();
}

fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_linestring");
    for &n in &[1_024usize, 16_384] {
        group.throughput(Throughput::Elements(n as u64));
        // Degree-sized steps would wander off the latitude range on the sphere.
        for (name, metric, step) in [
            ("planar", Metric::Planar, 1.0),
            ("geodetic", Metric::geodetic(), 0.001),
        ] {
            let line = Geometry::LineString(random_walk(n, step, 0xD1B5_4A32_D192_ED03));
            group.bench_function(format!("{}_n{}", name, n), |b| {
                b.iter(|| {
                    let prepared = PreparedGeometry::new(&line, metric);
                    black_box(prepared.map(|p| p.edge_count()).ok());
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_edge_tree_build, bench_prepare);
criterion_main!(benches);
