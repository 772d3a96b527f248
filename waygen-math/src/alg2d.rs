//! Planar algorithms on rings of geographic positions.
//!
//! Coordinates are treated as a flat `(lng, lat)` plane in degrees,
//! which is adequate for survey-scale areas.

use bevy_math::DVec2;

use crate::LngLat;


/// Points closer than this to a ring edge, in degrees, are considered on the boundary.
pub const BOUNDARY_EPSILON: f64 = 1e-12;

/// An axis-aligned bounding box in degree space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// Returns `None` if `points` is empty.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = LngLat>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?.0;
        Some(points.fold(Self { min: first, max: first }, |bbox, point| Self {
            min: bbox.min.min(point.0),
            max: bbox.max.max(point.0),
        }))
    }

    #[must_use]
    pub fn width(&self) -> f64 { self.max.x - self.min.x }

    #[must_use]
    pub fn height(&self) -> f64 { self.max.y - self.min.y }

    /// Grows the box by `margin` degrees on every side.
    #[must_use]
    pub fn expand(self, margin: f64) -> Self {
        Self { min: self.min - DVec2::splat(margin), max: self.max + DVec2::splat(margin) }
    }

    #[must_use]
    pub fn contains(&self, point: LngLat) -> bool {
        (self.min.x..=self.max.x).contains(&point.lng())
            && (self.min.y..=self.max.y).contains(&point.lat())
    }
}

/// Strips the closing position of a ring if it repeats the first.
#[must_use]
pub fn open_ring(ring: &[LngLat]) -> &[LngLat] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// The mean of the ring vertices, excluding the closing position.
///
/// Returns `None` if the ring is empty.
#[must_use]
pub fn centroid(ring: &[LngLat]) -> Option<LngLat> {
    let vertices = open_ring(ring);
    if vertices.is_empty() {
        return None;
    }
    let sum: DVec2 = vertices.iter().map(|vertex| vertex.0).sum();
    Some(LngLat(sum / vertices.len() as f64))
}

/// Twice the signed area enclosed by the ring; positive if counter-clockwise.
#[must_use]
pub fn signed_area_doubled(ring: &[LngLat]) -> f64 {
    let vertices = open_ring(ring);
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| a.0.perp_dot(b.0))
        .sum()
}

/// Returns the ring vertices with repeated positions removed, in first-seen order.
#[must_use]
pub fn distinct_vertices(ring: &[LngLat]) -> Vec<LngLat> {
    let mut output: Vec<LngLat> = Vec::new();
    for &vertex in open_ring(ring) {
        if !output.iter().any(|seen| seen.abs_diff_eq(vertex, BOUNDARY_EPSILON)) {
            output.push(vertex);
        }
    }
    output
}

/// Returns the closest point from `point` on the line segment between `line_start` and `line_end`.
#[must_use]
pub fn point_line_segment_closest(point: DVec2, line_start: DVec2, line_end: DVec2) -> DVec2 {
    let line_dir = line_end - line_start;
    let length_sq = line_dir.length_squared();
    if length_sq == 0. {
        return line_start;
    }

    let t = (point - line_start).dot(line_dir) / length_sq;
    line_start + line_dir * t.clamp(0.0, 1.0)
}

/// Whether `point` lies exactly on an edge of the ring, within [`BOUNDARY_EPSILON`].
#[must_use]
pub fn point_on_ring_boundary(point: LngLat, ring: &[LngLat]) -> bool {
    edges(ring).any(|(start, end)| {
        point_line_segment_closest(point.0, start.0, end.0).distance(point.0) <= BOUNDARY_EPSILON
    })
}

/// Whether `point` is inside the ring or on its boundary.
#[must_use]
pub fn point_in_ring(point: LngLat, ring: &[LngLat]) -> bool {
    if point_on_ring_boundary(point, ring) {
        return true;
    }

    // even-odd ray cast towards +x
    let mut inside = false;
    for (start, end) in edges(ring) {
        let (a, b) = (start.0, end.0);
        if (a.y > point.lat()) != (b.y > point.lat()) {
            let x = a.x + (point.lat() - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.lng() < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Iterates over the edges of a ring, including the closing edge.
pub fn edges(ring: &[LngLat]) -> impl Iterator<Item = (LngLat, LngLat)> + '_ {
    let vertices = open_ring(ring);
    vertices.iter().copied().zip(vertices.iter().copied().cycle().skip(1)).take(vertices.len())
}
