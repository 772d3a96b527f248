//! Resolution of per-waypoint camera and gimbal commands.

use smallvec::SmallVec;
use store::{Waypoint, WaypointAction};

#[cfg(test)]
mod tests;

/// A payload command executed on arrival at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Action {
    /// Rotate the gimbal to an absolute pitch in degrees.
    GimbalRotate { pitch: f64 },
    TakePhoto,
    StartRecord,
    StopRecord,
}

impl Action {
    /// The WPML actuator function name of this action.
    #[must_use]
    pub fn func(self) -> &'static str { self.into() }

    /// Parses a WPML actuator function name into a camera action.
    ///
    /// Gimbal functions are not camera actions and return `None`.
    #[must_use]
    pub fn camera_from_func(func: &str) -> Option<WaypointAction> {
        match func {
            "takePhoto" => Some(WaypointAction::Photo),
            "startRecord" => Some(WaypointAction::RecordStart),
            "stopRecord" => Some(WaypointAction::RecordStop),
            _ => None,
        }
    }

    fn from_camera(action: WaypointAction) -> Option<Self> {
        match action {
            WaypointAction::Photo => Some(Self::TakePhoto),
            WaypointAction::RecordStart => Some(Self::StartRecord),
            WaypointAction::RecordStop => Some(Self::StopRecord),
            WaypointAction::None | WaypointAction::Record => None,
        }
    }
}

/// Resolves the effective camera action of every waypoint.
///
/// Per-waypoint overrides take precedence over `global`.
/// The legacy [`WaypointAction::Record`] is expanded here, once,
/// into a start on the first waypoint and a stop on the last waypoint;
/// it never appears in the output.
#[must_use]
pub fn resolve(waypoints: &[Waypoint], global: WaypointAction) -> Vec<WaypointAction> {
    let last = waypoints.len().saturating_sub(1);
    waypoints
        .iter()
        .enumerate()
        .map(|(index, waypoint)| match waypoint.action.unwrap_or(global) {
            WaypointAction::Record if index == 0 => WaypointAction::RecordStart,
            WaypointAction::Record if index == last => WaypointAction::RecordStop,
            WaypointAction::Record => WaypointAction::None,
            action => action,
        })
        .collect()
}

/// The ordered commands to execute at each waypoint.
///
/// A gimbal rotation is issued at the first waypoint
/// and whenever the pitch differs from the previous waypoint,
/// followed by the resolved camera action.
#[must_use]
pub fn action_groups(waypoints: &[Waypoint], global: WaypointAction) -> Vec<SmallVec<[Action; 2]>> {
    let cameras = resolve(waypoints, global);
    let mut prev_pitch = None;

    waypoints
        .iter()
        .zip(cameras)
        .map(|(waypoint, camera)| {
            let mut group = SmallVec::new();
            if prev_pitch != Some(waypoint.gimbal_pitch) {
                group.push(Action::GimbalRotate { pitch: waypoint.gimbal_pitch });
            }
            prev_pitch = Some(waypoint.gimbal_pitch);
            group.extend(Action::from_camera(camera));
            group
        })
        .collect()
}
