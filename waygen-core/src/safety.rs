//! Photo timing speed limits and flight time checks.

use std::time::Duration;

use itertools::Itertools;
use math::{Length, Speed, geodesy};
use store::Waypoint;

use crate::preset::{FLIGHT_WARNING_THRESHOLD, TAKEOFF_LANDING_OVERHEAD};
use crate::settings::Resolved;


/// The fastest speed at which the camera can still fire once per leg.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedLimit {
    pub max_speed:   Speed,
    /// The shortest distance between two consecutive waypoints.
    pub min_segment: Length,
}

/// Computes the speed limit of a waypoint sequence.
///
/// Returns zeros if there are fewer than 2 waypoints or `photo_interval` is zero.
#[must_use]
pub fn max_speed(waypoints: &[Waypoint], photo_interval: Duration) -> SpeedLimit {
    if photo_interval.is_zero() {
        return SpeedLimit::default();
    }

    let min_segment = waypoints
        .iter()
        .tuple_windows()
        .map(|(from, to)| geodesy::distance(from.position, to.position))
        .reduce(Length::min);
    match min_segment {
        Some(min_segment) => SpeedLimit { max_speed: min_segment / photo_interval, min_segment },
        None => SpeedLimit::default(),
    }
}

/// Total flight distance along the waypoint sequence.
#[must_use]
pub fn total_distance(waypoints: &[Waypoint]) -> Length {
    geodesy::path_length(waypoints.iter().map(|waypoint| waypoint.position))
}

/// Time to fly `distance` at `speed`, plus `overhead`.
///
/// Returns `None` if `speed` is not positive.
#[must_use]
pub fn mission_time(distance: Length, speed: Speed, overhead: Duration) -> Option<Duration> {
    if !speed.is_positive() {
        return None;
    }
    Some(distance.try_div(speed)? + overhead)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
pub enum WarningLevel {
    Safe,
    /// The mission uses at least [`FLIGHT_WARNING_THRESHOLD`] of the rated flight time.
    Warning,
    /// The mission takes longer than the rated flight time.
    Critical,
}

impl WarningLevel {
    /// Classifies a mission duration against the rated flight time.
    ///
    /// Drones without a rated flight time are always safe.
    #[must_use]
    pub fn classify(eta: Duration, max_flight_time: Option<Duration>) -> Self {
        let Some(max_flight_time) = max_flight_time.filter(|time| !time.is_zero()) else {
            return Self::Safe;
        };

        let ratio = eta.as_secs_f64() / max_flight_time.as_secs_f64();
        if ratio >= 1. {
            Self::Critical
        } else if ratio >= FLIGHT_WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Safe
        }
    }
}

/// Safety summary of a planned mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub limit:          SpeedLimit,
    pub total_distance: Length,
    /// Estimated flight time at the maximum safe speed.
    pub eta:            Option<Duration>,
    pub level:          WarningLevel,
}

#[must_use]
pub fn assess(waypoints: &[Waypoint], settings: &Resolved) -> Assessment {
    let limit = max_speed(waypoints, settings.photo_interval);
    let total_distance = total_distance(waypoints);
    let eta = mission_time(total_distance, limit.max_speed, TAKEOFF_LANDING_OVERHEAD);
    let level = eta.map_or(WarningLevel::Safe, |eta| {
        WarningLevel::classify(eta, settings.max_flight_time)
    });
    Assessment { limit, total_distance, eta, level }
}
