use store::WaypointAction;

use super::{Action, action_groups, resolve};
use crate::test_util::eastward_waypoints;

#[test]
fn legacy_record_expands_to_start_and_stop() {
    let waypoints = eastward_waypoints(&[10., 10., 10.]);
    assert_eq!(
        resolve(&waypoints, WaypointAction::Record),
        [
            WaypointAction::RecordStart,
            WaypointAction::None,
            WaypointAction::None,
            WaypointAction::RecordStop,
        ]
    );
}

#[test]
fn override_takes_precedence() {
    let mut waypoints = eastward_waypoints(&[10., 10.]);
    waypoints[1].action = Some(WaypointAction::Photo);
    assert_eq!(
        resolve(&waypoints, WaypointAction::None),
        [WaypointAction::None, WaypointAction::Photo, WaypointAction::None]
    );
}

#[test]
fn single_waypoint_record_only_starts() {
    let waypoints = eastward_waypoints(&[]);
    assert_eq!(resolve(&waypoints, WaypointAction::Record), [WaypointAction::RecordStart]);
}

#[test]
fn gimbal_rotates_on_first_point_and_on_change() {
    let mut waypoints = eastward_waypoints(&[10., 10., 10.]);
    waypoints[2].gimbal_pitch = -45.;
    waypoints[3].gimbal_pitch = -45.;

    let groups = action_groups(&waypoints, WaypointAction::Photo);
    assert_eq!(groups[0].as_slice(), [Action::GimbalRotate { pitch: -90. }, Action::TakePhoto]);
    assert_eq!(groups[1].as_slice(), [Action::TakePhoto]);
    assert_eq!(groups[2].as_slice(), [Action::GimbalRotate { pitch: -45. }, Action::TakePhoto]);
    assert_eq!(groups[3].as_slice(), [Action::TakePhoto]);
}

#[test]
fn func_names() {
    assert_eq!(Action::GimbalRotate { pitch: 0. }.func(), "gimbalRotate");
    assert_eq!(Action::TakePhoto.func(), "takePhoto");
    assert_eq!(Action::StartRecord.func(), "startRecord");
    assert_eq!(Action::StopRecord.func(), "stopRecord");
    assert_eq!(Action::camera_from_func("stopRecord"), Some(WaypointAction::RecordStop));
    assert_eq!(Action::camera_from_func("gimbalRotate"), None);
}
