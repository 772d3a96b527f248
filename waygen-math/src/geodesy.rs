//! Spherical and rhumb-line computations on the earth sphere.
//!
//! All functions use a spherical earth of radius [`EARTH_RADIUS_METERS`].
//! Great-circle functions are used for measuring and projecting points;
//! rhumb-line functions are used for rotating shapes about a pivot,
//! where preserving the constant-bearing geometry keeps scan lines parallel.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::{Angle, EARTH_RADIUS_METERS, Heading, Length, LngLat};


/// Below this value the rhumb-line stretch ratio is replaced by the east-west limit.
const RHUMB_EPSILON: f64 = 1e-11;

/// Great-circle distance between two positions using the haversine formula.
#[must_use]
pub fn distance(from: LngLat, to: LngLat) -> Length {
    let (phi1, phi2) = (from.lat().to_radians(), to.lat().to_radians());
    let d_phi = phi2 - phi1;
    let d_lambda = (to.lng() - from.lng()).to_radians();

    let a = (d_phi / 2.).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.).sin().powi(2);
    let c = 2. * a.sqrt().atan2((1. - a).sqrt());
    Length::from_central_angle(Angle::from_radians(c))
}

/// Initial great-circle bearing from `from` towards `to`.
#[must_use]
pub fn bearing(from: LngLat, to: LngLat) -> Heading {
    let (phi1, phi2) = (from.lat().to_radians(), to.lat().to_radians());
    let d_lambda = (to.lng() - from.lng()).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    Heading::from_radians(Angle::from_radians(y.atan2(x)))
}

/// Projects `origin` by `distance` along the great circle with initial `bearing`.
#[must_use]
pub fn destination(origin: LngLat, distance: Length, bearing: Heading) -> LngLat {
    let phi1 = origin.lat().to_radians();
    let lambda1 = origin.lng().to_radians();
    let delta = distance.into_central_angle().into_radians();
    let theta = bearing.radians().into_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());
    LngLat::new(lambda2.to_degrees(), phi2.to_degrees())
}

/// Returns the point at `distance` along the polyline `line`.
///
/// Distances beyond the end of the line return the last vertex.
/// Returns `None` if `line` is empty.
#[must_use]
pub fn along(line: &[LngLat], distance: Length) -> Option<LngLat> {
    let (&first, rest) = line.split_first()?;
    if !distance.is_positive() {
        return Some(first);
    }

    let mut travelled = Length::ZERO;
    let mut prev = first;
    for &next in rest {
        let segment = self::distance(prev, next);
        if travelled + segment >= distance {
            let overshot = distance - travelled;
            return Some(destination(prev, overshot, bearing(prev, next)));
        }
        travelled += segment;
        prev = next;
    }

    Some(prev)
}

/// Sum of great-circle distances between consecutive points.
#[must_use]
pub fn path_length(points: impl IntoIterator<Item = LngLat>) -> Length {
    let mut points = points.into_iter();
    let Some(mut prev) = points.next() else { return Length::ZERO };
    points
        .map(|next| {
            let segment = distance(prev, next);
            prev = next;
            segment
        })
        .sum()
}

/// Isometric latitude difference between two latitudes in radians.
fn projected_lat_delta(phi1: f64, phi2: f64) -> f64 {
    ((phi2 / 2. + FRAC_PI_4).tan() / (phi1 / 2. + FRAC_PI_4).tan()).ln()
}

/// Wraps a longitude difference in radians into `-PI..=PI`.
fn wrap_lambda(mut d_lambda: f64) -> f64 {
    if d_lambda > PI {
        d_lambda -= TAU;
    } else if d_lambda < -PI {
        d_lambda += TAU;
    }
    d_lambda
}

/// Distance along the rhumb line (constant bearing) between two positions.
#[must_use]
pub fn rhumb_distance(from: LngLat, to: LngLat) -> Length {
    let (phi1, phi2) = (from.lat().to_radians(), to.lat().to_radians());
    let d_phi = phi2 - phi1;
    let d_lambda = wrap_lambda((to.lng() - from.lng()).to_radians().abs());

    let d_psi = projected_lat_delta(phi1, phi2);
    let q = if d_psi.abs() > RHUMB_EPSILON { d_phi / d_psi } else { phi1.cos() };

    let delta = d_phi.hypot(q * d_lambda);
    Length::from_central_angle(Angle::from_radians(delta))
}

/// Constant bearing of the rhumb line from `from` to `to`.
#[must_use]
pub fn rhumb_bearing(from: LngLat, to: LngLat) -> Heading {
    let (phi1, phi2) = (from.lat().to_radians(), to.lat().to_radians());
    let d_lambda = wrap_lambda((to.lng() - from.lng()).to_radians());
    let d_psi = projected_lat_delta(phi1, phi2);
    Heading::from_radians(Angle::from_radians(d_lambda.atan2(d_psi)))
}

/// Projects `origin` by `distance` along the rhumb line with constant `bearing`.
#[must_use]
pub fn rhumb_destination(origin: LngLat, distance: Length, bearing: Heading) -> LngLat {
    let delta = distance.into_central_angle().into_radians();
    let phi1 = origin.lat().to_radians();
    let theta = bearing.radians().into_radians();

    let d_phi = delta * theta.cos();
    let mut phi2 = phi1 + d_phi;
    if phi2.abs() > FRAC_PI_2 {
        // passed a pole
        phi2 = if phi2 > 0. { PI - phi2 } else { -PI - phi2 };
    }

    let d_psi = projected_lat_delta(phi1, phi2);
    let q = if d_psi.abs() > RHUMB_EPSILON { d_phi / d_psi } else { phi1.cos() };
    let d_lambda = delta * theta.sin() / q;

    let mut lng = ((origin.lng() + d_lambda.to_degrees() + 540.) % 360.) - 180.;
    if lng - origin.lng() > 180. {
        lng -= 360.;
    } else if origin.lng() - lng > 180. {
        lng += 360.;
    }
    LngLat::new(lng, phi2.to_degrees())
}

/// Rotates `point` clockwise by `angle` about `pivot`,
/// preserving the rhumb distance and relative rhumb bearing to the pivot.
#[must_use]
pub fn rotate(point: LngLat, pivot: LngLat, angle: Angle) -> LngLat {
    if point == pivot || angle == Angle::ZERO {
        return point;
    }

    let initial = rhumb_bearing(pivot, point);
    let radius = rhumb_distance(pivot, point);
    rhumb_destination(pivot, radius, initial + angle)
}
