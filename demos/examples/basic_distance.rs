// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic distance queries.
//!
//! Measure a few planar geometries against each other, print the closest
//! points, and check a threshold.
//!
//! Run:
//! - `cargo run -p nearline_demos --example basic_distance`

use kurbo::Point;
use nearline_distance::{
    DistanceQuery, Geometry, Polygon, Solver, closest_points, distance, is_within_distance,
};

fn main() {
    let parcel = Geometry::from(Polygon::rect(0.0, 0.0, 10.0, 10.0));
    let road = Geometry::LineString(vec![
        Point::new(-5.0, 14.0),
        Point::new(5.0, 13.0),
        Point::new(15.0, 16.0),
    ]);
    let well = Geometry::Point(Point::new(4.0, 6.0));

    let found = closest_points(&parcel, &road).unwrap();
    println!(
        "parcel to road: {:.3} between {:?} and {:?}",
        found.distance, found.a, found.b
    );

    // The well is inside the parcel.
    println!("parcel to well: {}", distance(&parcel, &well).unwrap());

    for threshold in [2.0, 3.0, 5.0] {
        println!(
            "road within {threshold} of parcel: {}",
            is_within_distance(&parcel, &road, threshold).unwrap()
        );
    }

    // Both solvers give the same answer; only their cost differs.
    for solver in [Solver::Disjoint, Solver::Overlapping] {
        let d = DistanceQuery::new()
            .solver(solver)
            .distance(&road, &well)
            .unwrap();
        println!("road to well with {solver:?}: {d:.3}");
    }
}
