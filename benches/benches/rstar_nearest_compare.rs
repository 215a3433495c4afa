// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use nearline_distance::{DistanceQuery, Geometry, Metric, PreparedGeometry};

use rstar::primitives::Line;
use rstar::{PointDistance, RTree};

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

fn random_walk(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    let mut p = Point::ZERO;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(p);
        p.x += rng.next_f64() * 2.0 - 1.0;
        p.y += rng.next_f64() * 2.0 - 1.0;
    }
    out
}

fn to_rstar_lines(points: &[Point]) -> Vec<Line<[f64; 2]>> {
    points
        .windows(2)
        .map(|w| Line::new([w[0].x, w[0].y], [w[1].x, w[1].y]))
        .collect()
}

/// Point-to-polyline distance: an edge tree against an R-tree of segments.
fn bench_point_to_polyline(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_to_polyline");
    let probe = Point::new(100.0, 40.0);
    for &n in &[4_096usize, 65_536] {
        let walk = random_walk(n, 0x2545_F491_4F6C_DD1D);
        let line = Geometry::LineString(walk.clone());
        let target = Geometry::Point(probe);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("nearline_build_query_n{}", n), |b| {
            b.iter(|| {
                let d = DistanceQuery::new().distance(&line, &target).ok();
                black_box(d);
            });
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_lines(&walk),
                |lines| {
                    let tree = RTree::bulk_load(lines);
                    let q = [probe.x, probe.y];
                    let d = tree.nearest_neighbor(&q).map(|l| l.distance_2(&q).sqrt());
                    black_box(d);
                },
                BatchSize::SmallInput,
            )
        });

        let prepared_line = PreparedGeometry::new(&line, Metric::Planar)
            .expect("random walks are finite and non-empty");
        let prepared_target = PreparedGeometry::new(&target, Metric::Planar)
            .expect("the probe is finite");
        group.bench_function(format!("nearline_query_only_n{}", n), |b| {
            let mut query = DistanceQuery::new();
            b.iter(|| black_box(query.distance_prepared(&prepared_line, &prepared_target).ok()));
        });

        let tree = RTree::bulk_load(to_rstar_lines(&walk));
        group.bench_function(format!("rstar_query_only_n{}", n), |b| {
            let q = [probe.x, probe.y];
            b.iter(|| black_box(tree.nearest_neighbor(&q).map(|l| l.distance_2(&q).sqrt())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_point_to_polyline);
criterion_main!(benches);
