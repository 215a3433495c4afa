// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prepared reference geometry.
//!
//! Build the edge trees of a long coastline once, share them between threads,
//! and measure a stream of points against it. Then do the same through a
//! `PreparedCache`, which notices the repeated argument by itself.
//!
//! Run:
//! - `cargo run -p nearline_demos --example prepared_reference`

use std::sync::Arc;
use std::thread;

use kurbo::Point;
use nearline_distance::{DistanceQuery, Geometry, Metric, PreparedCache, PreparedGeometry};

fn coastline(n: usize) -> Geometry {
    Geometry::LineString(
        (0..n)
            .map(|i| {
                let x = i as f64 * 0.1;
                Point::new(x, (x * 0.7).sin() * 3.0)
            })
            .collect(),
    )
}

fn main() {
    let coast = coastline(10_000);
    let prepared = Arc::new(PreparedGeometry::new(&coast, Metric::Planar).unwrap());
    let stats = prepared.build_stats();
    println!(
        "coastline: {} edges, {} merges over {} levels",
        stats.leaves, stats.merges, stats.levels
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let coast = Arc::clone(&prepared);
            thread::spawn(move || {
                let mut query = DistanceQuery::new();
                let mut nearest = f64::INFINITY;
                for i in 0..250 {
                    let p = Point::new(f64::from(t * 250 + i), 10.0);
                    let buoy = PreparedGeometry::new(&Geometry::Point(p), Metric::Planar).unwrap();
                    nearest = nearest.min(query.distance_prepared(&coast, &buoy).unwrap());
                }
                nearest
            })
        })
        .collect();
    for (t, h) in handles.into_iter().enumerate() {
        println!("thread {t}: nearest buoy {:.3}", h.join().unwrap());
    }

    let mut cache = PreparedCache::new(Metric::Planar);
    for x in [10.0, 20.0, 30.0] {
        let buoy = Geometry::Point(Point::new(x, -8.0));
        println!("buoy at {x}: {:.3}", cache.distance(&coast, &buoy).unwrap());
    }
    println!("cache hits {}, misses {}", cache.hits(), cache.misses());
}
