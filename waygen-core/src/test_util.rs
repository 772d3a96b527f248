use math::{Heading, Length, LngLat, Speed, geodesy};
use store::{Shape, Waypoint};

pub(crate) fn assert_position_eq(actual: LngLat, expect: LngLat, epsilon: f64) {
    assert!(actual.abs_diff_eq(expect, epsilon), "expected {expect:?}, got {actual:?}");
}

/// An axis-aligned rectangle with its south-west corner at `origin`,
/// `width` meters east-west and `height` meters north-south.
pub(crate) fn rectangle(origin: LngLat, width: f64, height: f64) -> Shape {
    let dlat = Length::from_meters(height).into_central_angle().into_degrees();
    let dlng = Length::from_meters(width).into_central_angle().into_degrees()
        / origin.lat().to_radians().cos();
    let (west, south) = (origin.lng(), origin.lat());
    let (east, north) = (west + dlng, south + dlat);
    Shape::from_ring(vec![
        LngLat::new(west, south),
        LngLat::new(east, south),
        LngLat::new(east, north),
        LngLat::new(west, north),
        LngLat::new(west, south),
    ])
    .unwrap()
}

/// Waypoints on the equator separated eastwards by the given distances in meters.
pub(crate) fn eastward_waypoints(gaps: &[f64]) -> Vec<Waypoint> {
    let mut position = LngLat::new(0., 0.);
    let mut positions = vec![position];
    for &gap in gaps {
        position = geodesy::destination(position, Length::from_meters(gap), Heading::EAST);
        positions.push(position);
    }
    positions
        .into_iter()
        .map(|position| {
            Waypoint::new(
                position,
                Length::from_meters(60.),
                Speed::from_meters_per_sec(10.),
                -90.,
                Heading::EAST,
            )
        })
        .collect()
}
