// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use nearline_distance::{DistanceQuery, Geometry, Metric, PreparedGeometry, Solver};

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

fn random_walk(n: usize, origin: Point, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    let mut p = origin;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(p);
        p += Vec2::new(rng.next_f64() * 2.0 - 1.0, rng.next_f64() * 2.0 - 1.0);
    }
    out
}

fn prepared(points: Vec<Point>) -> PreparedGeometry {
    PreparedGeometry::new(&Geometry::LineString(points), Metric::Planar)
        .expect("random walks are finite and non-empty")
}

fn bench_separated_polylines(c: &mut Criterion) {
    let mut group = c.benchmark_group("separated_polylines");
    for &n in &[256usize, 1_024, 2_048] {
        // The walks stay within a few dozen units of their origins.
        let a = prepared(random_walk(n, Point::ZERO, 0x2545_F491_4F6C_DD1D));
        let b = prepared(random_walk(n, Point::new(500.0, 0.0), 0x9E37_79B9_7F4A_7C15));
        group.throughput(Throughput::Elements((n * n) as u64));

        for (name, solver) in [
            ("disjoint", Solver::Disjoint),
            ("overlapping", Solver::Overlapping),
        ] {
            group.bench_function(format!("{}_n{}", name, n), |bench| {
                let mut query = DistanceQuery::new().solver(solver);
                bench.iter(|| black_box(query.distance_prepared(&a, &b).ok()));
            });
        }

        group.bench_function(format!("within_early_exit_n{}", n), |bench| {
            let mut query = DistanceQuery::new();
            bench.iter(|| black_box(query.is_within_distance_prepared(&a, &b, 1_000.0).ok()));
        });
    }
    group.finish();
}

fn bench_crossing_polylines(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossing_polylines");
    for &n in &[256usize, 1_024] {
        let a = prepared(random_walk(n, Point::ZERO, 0xD1B5_4A32_D192_ED03));
        let b = prepared(random_walk(n, Point::new(2.0, 2.0), 0xA076_1D64_78BD_642F));
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("auto_n{}", n), |bench| {
            let mut query = DistanceQuery::new();
            bench.iter(|| black_box(query.distance_prepared(&a, &b).ok()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_separated_polylines, bench_crossing_polylines);
criterion_main!(benches);
