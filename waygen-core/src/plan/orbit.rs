//! Circular orbit around the center of a shape, facing inwards.

use std::f64::consts::TAU;

use math::{Angle, Heading, Length, LngLat, geodesy};
use store::{Shape, Waypoint};

use super::stamp;
use crate::settings::Resolved;


/// Minimum number of distinct positions per revolution.
pub const MIN_POINTS_PER_REVOLUTION: f64 = 3.;

pub fn generate(shape: &Shape, settings: &Resolved) -> Vec<Waypoint> {
    let Some((center, radius)) = center_and_radius(shape) else {
        tracing::debug!("Degenerate shape, nothing to orbit");
        return Vec::new();
    };

    let raw = settings.settings;
    let per_revolution =
        (radius * TAU / raw.spacing).round().max(MIN_POINTS_PER_REVOLUTION);
    // the last point lands on the end of the sweep,
    // which coincides with the first point for whole revolutions;
    // at least 3 steps keep 3 distinct positions on a closed loop
    let segments = ((per_revolution * raw.number_of_orbits).round() - 1.)
        .max(MIN_POINTS_PER_REVOLUTION);
    let count = segments as usize + 1;
    let step = Angle::FULL * raw.number_of_orbits / segments;
    let start = Heading::from_degrees(90. - raw.start_angle);
    tracing::debug!("Orbit of {radius:?} around {center}: {count} points");

    (0..count)
        .map(|index| {
            let bearing = start.add_direction(raw.direction, step * index as f64);
            let position = geodesy::destination(center, radius, bearing);
            let heading = geodesy::bearing(position, center).round_degrees();
            stamp(position, heading, raw)
        })
        .collect()
}

/// The orbit center and radius.
///
/// True circles use their exact parameters.
/// Other shapes use the vertex centroid and the mean distance to the distinct vertices,
/// an approximation rather than an enclosing circle.
fn center_and_radius(shape: &Shape) -> Option<(LngLat, Length)> {
    if let Some(circle) = shape.circle_params() {
        return Some((circle.center, circle.radius));
    }

    let vertices = math::distinct_vertices(shape.ring());
    if vertices.len() < 3 {
        return None;
    }
    let center = math::centroid(shape.ring())?;
    let total: Length = vertices.iter().map(|&vertex| geodesy::distance(center, vertex)).sum();
    let radius = total / vertices.len() as f64;
    radius.is_positive().then_some((center, radius))
}
