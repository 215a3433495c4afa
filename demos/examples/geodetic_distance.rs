// Copyright 2025 the Nearline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Great-circle distances.
//!
//! Coordinates are longitude/latitude in degrees; distances come back in
//! meters on a sphere of mean Earth radius.
//!
//! Run:
//! - `cargo run -p nearline_demos --example geodetic_distance`

use kurbo::Point;
use nearline_distance::{DistanceQuery, Geometry, Metric, Polygon};

fn main() {
    let mut query = DistanceQuery::new().metric(Metric::geodetic());

    let paris = Geometry::Point(Point::new(2.3522, 48.8566));
    let london = Geometry::Point(Point::new(-0.1276, 51.5072));
    let d = query.distance(&paris, &london).unwrap();
    println!("Paris to London: {:.1} km", d / 1000.0);

    // A meridian segment passes between the two cities.
    let meridian = Geometry::LineString(vec![Point::new(1.0, 40.0), Point::new(1.0, 60.0)]);
    let found = query.closest_points(&paris, &meridian).unwrap();
    println!(
        "Paris to the 1E meridian: {:.1} km, foot at {:?}",
        found.distance / 1000.0,
        found.b
    );

    let box_around_paris = Geometry::from(Polygon::rect(2.0, 48.5, 2.7, 49.1));
    println!(
        "Paris inside its box: {}",
        query.distance(&box_around_paris, &paris).unwrap()
    );
    println!(
        "London within 350 km of the box: {}",
        query
            .is_within_distance(&box_around_paris, &london, 350_000.0)
            .unwrap()
    );

    // The unit sphere gives distances in radians.
    let mut unit = DistanceQuery::new().metric(Metric::Geodetic { radius: 1.0 });
    let rad = unit.distance(&paris, &london).unwrap();
    println!("Paris to London: {:.3} degrees of arc", rad.to_degrees());
}
