//! Waypoint generation from an input area.

use math::{Heading, LngLat};
use store::{MissionSettings, PathType, Shape, Waypoint};

use crate::safety::{self, Assessment};
use crate::settings::{self, Resolved};

pub mod grid;
pub mod orbit;


/// Generates the waypoints covering `shape`.
///
/// An empty result is a valid plan with nothing to fly,
/// e.g. when no scan row intersects the shape.
pub fn plan(shape: &Shape, settings: &MissionSettings) -> Result<Vec<Waypoint>, Error> {
    let resolved = Resolved::new(settings)?;
    plan_resolved(shape, &resolved)
}

pub fn plan_resolved(shape: &Shape, settings: &Resolved) -> Result<Vec<Waypoint>, Error> {
    match settings.settings.path_type {
        PathType::Grid => Ok(grid::generate(shape, settings)?),
        PathType::Orbit => Ok(orbit::generate(shape, settings)),
    }
}

/// Plans once, then plans again with the speed capped at the photo timing limit.
///
/// The second pass is an independent planning call with adjusted settings;
/// the caller's settings are not modified.
pub fn plan_with_safe_speed(
    shape: &Shape,
    settings: &MissionSettings,
) -> Result<(Vec<Waypoint>, Assessment), Error> {
    let resolved = Resolved::new(settings)?;
    let waypoints = plan_resolved(shape, &resolved)?;
    let assessment = safety::assess(&waypoints, &resolved);

    let max_speed = assessment.limit.max_speed;
    if !max_speed.is_positive() || settings.speed <= max_speed {
        return Ok((waypoints, assessment));
    }

    tracing::debug!(
        "Capping speed from {:?} to {:?} for photo interval {:?}",
        settings.speed,
        max_speed,
        resolved.photo_interval,
    );
    let capped = MissionSettings { speed: max_speed, ..settings.clone() };
    let resolved = Resolved::new(&capped)?;
    let waypoints = plan_resolved(shape, &resolved)?;
    let assessment = safety::assess(&waypoints, &resolved);
    Ok((waypoints, assessment))
}

/// Creates a final waypoint with the per-mission attributes of `settings`.
fn stamp(position: LngLat, heading: Heading, settings: &MissionSettings) -> Waypoint {
    Waypoint {
        straighten_legs: Some(settings.straighten_legs),
        action: Some(settings.waypoint_action),
        ..Waypoint::new(position, settings.altitude, settings.speed, settings.gimbal_pitch, heading)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid settings: {0}")]
    Settings(#[from] settings::Error),
    #[error("Cannot sweep scan rows: {0}")]
    Sweep(#[from] math::sweep::Error),
}
