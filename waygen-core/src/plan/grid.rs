//! Boustrophedon scan over a polygon.
//!
//! The polygon is rotated about its centroid so that scan rows become horizontal,
//! rows are swept and clipped in the rotated frame,
//! and the resulting points are rotated back about the same centroid.
//!
//! Row spacing is converted to degrees with the flat [`math::METERS_PER_DEGREE`] approximation,
//! which is adequate for survey-scale areas but drifts for large or high-latitude polygons.

use math::{Angle, Heading, Length, LngLat, geodesy, sweep};
use store::{Shape, Waypoint};

use super::{Error, stamp};
use crate::camera;
use crate::settings::Resolved;


/// Position of a point within its scan row, used to stabilize headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    Start,
    Interior,
    End,
}

/// A grid point before headings are assigned.
///
/// Row roles only exist during planning and are dropped when converting to [`Waypoint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanningPoint {
    pub position: LngLat,
    pub row_role: RowRole,
}

pub fn generate(shape: &Shape, settings: &Resolved) -> Result<Vec<Waypoint>, Error> {
    let ring = shape.ring();
    if math::distinct_vertices(ring).len() < 3 || math::signed_area_doubled(ring) == 0. {
        tracing::debug!("Degenerate polygon, nothing to scan");
        return Ok(Vec::new());
    }
    let Some(pivot) = math::centroid(ring) else { return Ok(Vec::new()) };

    let raw = settings.settings;
    let line_spacing = camera::line_spacing(raw.altitude, settings.hfov, raw.side_overlap);
    let front_spacing = camera::front_spacing(raw.altitude, settings.hfov, raw.front_overlap);

    let scan_angle = scan_angle(ring, settings);
    let rotated: Vec<_> =
        ring.iter().map(|&point| geodesy::rotate(point, pivot, -scan_angle)).collect();

    let segments = sweep::sweep(&rotated, line_spacing.into_flat_degrees())?;
    let swept = segments.len();
    let mut rows = segments
        .into_iter()
        .filter(|segment| {
            geodesy::distance(segment.start, segment.end) >= front_spacing
        })
        .enumerate()
        .map(|(index, segment)| {
            let [mut start, mut end] = segment.endpoints();
            if index % 2 == 1 {
                (start, end) = (end, start);
            }
            row_points(start, end, front_spacing, raw.generate_every_point)
        })
        .collect::<Vec<_>>();
    tracing::debug!(
        "Scan angle {:.1}\u{b0}: {} of {swept} rows kept",
        scan_angle.into_degrees(),
        rows.len(),
    );

    merge_transitions(&mut rows, front_spacing);

    let mut points: Vec<_> = rows
        .into_iter()
        .flatten()
        .map(|point| PlanningPoint {
            position: geodesy::rotate(point.position, pivot, scan_angle),
            ..point
        })
        .collect();
    if raw.reverse_path {
        points.reverse();
    }

    let headings = headings(&points, raw.reverse_path, raw.eliminate_extra_yaw);
    Ok(points
        .iter()
        .zip(headings)
        .map(|(point, heading)| stamp(point.position, heading, raw))
        .collect())
}

/// The bearing of the scan rows, clockwise from north.
///
/// With auto direction, rows follow the longest polygon edge.
fn scan_angle(ring: &[LngLat], settings: &Resolved) -> Angle {
    if !settings.settings.auto_direction {
        return Angle::from_degrees(settings.settings.angle);
    }

    let mut longest = (Length::ZERO, Heading::NORTH);
    for (start, end) in ring.iter().zip(ring.iter().skip(1)) {
        let length = geodesy::distance(*start, *end);
        if length > longest.0 {
            longest = (length, geodesy::bearing(*start, *end));
        }
    }
    longest.1.radians()
}

/// The points of one scan row from `start` to `end`.
///
/// With `every_point`, the row is resampled every `front_spacing` from `start`;
/// the last sample may fall short of `end`.
fn row_points(
    start: LngLat,
    end: LngLat,
    front_spacing: Length,
    every_point: bool,
) -> Vec<PlanningPoint> {
    let mut positions = vec![start, end];
    if every_point {
        let samples = (geodesy::distance(start, end) / front_spacing).floor();
        if samples >= 1. {
            let line = [start, end];
            positions = (0..=samples as usize)
                .filter_map(|step| geodesy::along(&line, front_spacing * step as f64))
                .collect();
        }
    }

    let last = positions.len() - 1;
    positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| PlanningPoint {
            position,
            row_role: match index {
                0 => RowRole::Start,
                _ if index == last => RowRole::End,
                _ => RowRole::Interior,
            },
        })
        .collect()
}

/// Drops the trailing point of each row that is closer than `front_spacing`
/// to the first point of the next row.
///
/// An interior point left at the end of its row becomes the new row end,
/// so that it holds the row heading instead of turning towards the next row.
fn merge_transitions(rows: &mut [Vec<PlanningPoint>], front_spacing: Length) {
    for index in 1..rows.len() {
        let Some(&next_start) = rows[index].first() else { continue };
        let row = &mut rows[index - 1];
        if row.len() > 1
            && let Some(trailing) = row.last()
            && geodesy::distance(trailing.position, next_start.position) < front_spacing
        {
            row.pop();
            if let Some(last) = row.last_mut()
                && last.row_role == RowRole::Interior
            {
                last.row_role = RowRole::End;
            }
        }
    }
}

/// Computes the heading of each point, in flight order.
///
/// Each point faces the next point, except that the last point of a row
/// keeps the row heading instead of turning towards the next row.
/// When the path is reversed, row starts are the last points flown in each row.
fn headings(points: &[PlanningPoint], reversed: bool, eliminate_extra_yaw: bool) -> Vec<Heading> {
    let hold_role = if reversed { RowRole::Start } else { RowRole::End };

    let mut headings: Vec<Heading> = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let heading = match (headings.last(), points.get(index + 1)) {
            (Some(&prev), _) if point.row_role == hold_role => prev,
            (_, Some(next)) => geodesy::bearing(point.position, next.position),
            (Some(&prev), None) => prev,
            (None, None) => Heading::NORTH,
        };
        headings.push(heading);
    }

    if eliminate_extra_yaw && let Some(&first) = headings.first() {
        headings.fill(first);
    }
    headings
}
