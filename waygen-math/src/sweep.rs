//! Parallel horizontal scan lines clipped to a ring.

use itertools::Itertools;
use ordered_float::{FloatIsNan, NotNan};

use crate::{BoundingBox, LngLat, point_in_ring};


/// Horizontal overhang of each scan line beyond the ring bounding box, in degrees.
pub const LINE_OVERHANG: f64 = 0.1;

/// Upper bound on the number of scan lines in one sweep.
pub const MAX_LINES: u32 = 10_000;

/// Intersections closer than this along a scan line, in degrees, are merged.
const MERGE_EPSILON: f64 = 1e-12;

/// A horizontal segment of a scan line that lies inside the ring.
///
/// `start` is always west of `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: LngLat,
    pub end:   LngLat,
}

impl Segment {
    #[must_use]
    pub fn midpoint(&self) -> LngLat { self.start.midpoint(self.end) }

    /// Length of the segment in degrees of longitude.
    #[must_use]
    pub fn width(&self) -> f64 { self.end.lng() - self.start.lng() }

    #[must_use]
    pub fn endpoints(&self) -> [LngLat; 2] { [self.start, self.end] }
}

/// Sweeps scan lines over `ring` from south to north.
///
/// The first line is half a `spacing` above the southern bound,
/// and lines continue while they are within a tenth of a `spacing` above the northern bound.
/// Segments are returned in sweep order, west to east within each line.
///
/// # Errors
/// Returns an error if `spacing` is not positive, the ring contains NaN coordinates,
/// or the ring spans more than [`MAX_LINES`] scan lines.
pub fn sweep(ring: &[LngLat], spacing: f64) -> Result<Vec<Segment>, Error> {
    if !(spacing.is_finite() && spacing > 0.) {
        return Err(Error::InvalidSpacing(spacing));
    }
    let Some(bbox) = BoundingBox::from_points(ring.iter().copied()) else {
        return Ok(Vec::new());
    };

    let x_start = bbox.min.x - LINE_OVERHANG;
    let x_end = bbox.max.x + LINE_OVERHANG;

    let y_end = bbox.max.y + spacing / 10.;
    let lines: Vec<f64> = (0..=MAX_LINES)
        .map(|index| bbox.min.y + spacing / 2. + spacing * f64::from(index))
        .take_while(|&y| y <= y_end)
        .collect();
    if lines.len() > MAX_LINES as usize {
        return Err(Error::TooManyLines { spacing, max: MAX_LINES });
    }

    let mut output = Vec::new();
    for y in lines {
        output.extend(clip_horizontal(ring, y, x_start, x_end)?);
    }
    Ok(output)
}

/// Clips the horizontal line at latitude `y` from `x_start` to `x_end` against the ring.
///
/// The line is split at every crossing with a ring edge,
/// and each piece is kept if its midpoint is inside the ring or on its boundary.
/// Adjacent kept pieces are joined, so touching a vertex does not split a segment.
///
/// # Errors
/// Returns an error if the ring contains NaN coordinates.
pub fn clip_horizontal(
    ring: &[LngLat],
    y: f64,
    x_start: f64,
    x_end: f64,
) -> Result<Vec<Segment>, Error> {
    let mut xs = vec![NotNan::new(x_start)?, NotNan::new(x_end)?];

    for (a, b) in crate::edges(ring) {
        if a.lat() == y && b.lat() == y {
            xs.push(NotNan::new(a.lng())?);
            xs.push(NotNan::new(b.lng())?);
        } else if (a.lat().min(b.lat())..=a.lat().max(b.lat())).contains(&y) {
            let ratio = (y - a.lat()) / (b.lat() - a.lat());
            xs.push(NotNan::new(a.lng() + (b.lng() - a.lng()) * ratio)?);
        }
    }

    xs.retain(|&x| (x_start..=x_end).contains(&x.into_inner()));
    xs.sort_unstable();
    xs.dedup_by(|a, b| (a.into_inner() - b.into_inner()).abs() < MERGE_EPSILON);

    let mut output: Vec<Segment> = Vec::new();
    for (&west, &east) in xs.iter().tuple_windows() {
        let piece = Segment {
            start: LngLat::new(west.into_inner(), y),
            end:   LngLat::new(east.into_inner(), y),
        };
        if !point_in_ring(piece.midpoint(), ring) {
            continue;
        }

        match output.last_mut() {
            Some(last) if last.end == piece.start => last.end = piece.end,
            _ => output.push(piece),
        }
    }

    Ok(output)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Scan line spacing {0} is not a positive finite value")]
    InvalidSpacing(f64),
    #[error("Scan line spacing {spacing} needs more than {max} lines")]
    TooManyLines { spacing: f64, max: u32 },
    #[error("Ring contains NaN coordinates")]
    NonFinite(#[from] FloatIsNan),
}
