//! Ground coverage of a nadir camera.
//!
//! Images are assumed to have a 4:3 aspect ratio,
//! with the long side perpendicular to the flight direction.

use math::{Angle, Heading, Length, LngLat, geodesy};


/// Ratio of the image height (along track) to its width (across track).
pub const SENSOR_ASPECT: f64 = 3. / 4.;

/// Lower bound of the resampling distance along a scan row.
pub const MIN_FRONT_SPACING: Length = Length::from_meters(1.);

/// Across-track ground width of one image.
#[must_use]
pub fn footprint_width(altitude: Length, hfov: Angle) -> Length { altitude * 2. * (hfov / 2.).tan() }

/// Along-track ground height of one image.
#[must_use]
pub fn footprint_height(altitude: Length, hfov: Angle) -> Length {
    footprint_width(altitude, hfov) * SENSOR_ASPECT
}

/// Distance between adjacent scan rows for the given side overlap percentage.
#[must_use]
pub fn line_spacing(altitude: Length, hfov: Angle, side_overlap: f64) -> Length {
    footprint_width(altitude, hfov) * (1. - side_overlap / 100.)
}

/// Distance between photos along a scan row for the given front overlap percentage,
/// never less than [`MIN_FRONT_SPACING`].
#[must_use]
pub fn front_spacing(altitude: Length, hfov: Angle, front_overlap: f64) -> Length {
    (footprint_height(altitude, hfov) * (1. - front_overlap / 100.)).max(MIN_FRONT_SPACING)
}

/// The closed ground rectangle covered by one image taken at `center` facing `heading`.
///
/// Corners are ordered front-right, back-right, back-left, front-left.
#[must_use]
pub fn footprint_polygon(
    center: LngLat,
    altitude: Length,
    heading: Heading,
    hfov: Angle,
) -> Vec<LngLat> {
    let half_width = footprint_width(altitude, hfov) / 2.;
    let half_height = footprint_height(altitude, hfov) / 2.;
    let diagonal = Length::from_meters(half_width.into_meters().hypot(half_height.into_meters()));
    let corner = Angle::from_radians(half_width.into_meters().atan2(half_height.into_meters()));

    let mut ring: Vec<_> = [corner, Angle::STRAIGHT - corner, Angle::STRAIGHT + corner, -corner]
        .into_iter()
        .map(|offset| geodesy::destination(center, diagonal, heading + offset))
        .collect();
    ring.push(ring[0]);
    ring
}
