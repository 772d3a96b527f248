use math::{Heading, Length, LngLat, Speed, TurnDirection};

use crate::{
    DroneModel, FinishAction, HeadingMode, MissionSettings, PathType, RcLostAction,
    SessionSnapshot, Shape, Waypoint, WaypointAction,
};

#[test]
fn settings_defaults_from_empty_object() {
    let settings: MissionSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, MissionSettings::default());
    assert_eq!(settings.altitude, Length::from_meters(60.));
    assert_eq!(settings.speed, Speed::from_meters_per_sec(10.));
    assert_eq!(settings.direction, TurnDirection::CounterClockwise);
    assert_eq!(settings.selected_drone, DroneModel::Mini5Pro);
    assert_eq!(settings.path_type, PathType::Grid);
}

#[test]
fn settings_from_ui_json() {
    let json = serde_json::json!({
        "altitude": 45,
        "speed": 7.5,
        "gimbalPitch": -60,
        "customFOV": 72.5,
        "showFootprints": true,
        "units": "imperial",
        "pathType": "orbit",
        "direction": "clockwise",
        "numberOfOrbits": 1.5,
        "waypointAction": "record",
        "selectedDrone": "dji_mini_4_pro",
        "missionEndAction": "autoLand",
        "headingMode": "followWayline",
        "rcLostAction": "goBack",
    });
    let settings: MissionSettings = serde_json::from_value(json).unwrap();
    assert_eq!(settings.altitude, Length::from_meters(45.));
    assert_eq!(settings.custom_fov, Some(72.5));
    assert_eq!(settings.path_type, PathType::Orbit);
    assert_eq!(settings.direction, TurnDirection::Clockwise);
    assert!((settings.number_of_orbits - 1.5).abs() < f64::EPSILON);
    assert_eq!(settings.waypoint_action, WaypointAction::Record);
    assert_eq!(settings.selected_drone, DroneModel::Mini4Pro);
    assert_eq!(settings.mission_end_action, FinishAction::Hover);
    assert_eq!(settings.heading_mode, HeadingMode::FollowWayline);
    assert_eq!(settings.rc_lost_action, RcLostAction::GoBack);
}

#[test]
fn settings_serialize_current_ids() {
    let settings = MissionSettings { selected_drone: DroneModel::Mavic4Pro, ..Default::default() };
    let json = serde_json::to_value(&settings).unwrap();
    assert_eq!(json["selectedDrone"], "mavic-4-pro");
    assert_eq!(json["direction"], "counter-clockwise");
    assert_eq!(json["missionEndAction"], "goHome");
    assert!(json.get("customFOV").is_none());
}

#[test]
fn drone_model_legacy_ids() {
    assert_eq!("dji_mini_5_pro".parse::<DroneModel>().unwrap(), DroneModel::Mini5Pro);
    assert_eq!("mini-4-pro".parse::<DroneModel>().unwrap(), DroneModel::Mini4Pro);
    assert_eq!("custom".parse::<DroneModel>().unwrap(), DroneModel::Custom);
    assert_eq!(DroneModel::Mavic4Pro.to_string(), "mavic-4-pro");
    assert!("phantom".parse::<DroneModel>().is_err());
}

#[test]
fn waypoint_wire_format() {
    let mut waypoint = Waypoint::new(
        LngLat::new(114.1, 22.3),
        Length::from_meters(60.),
        Speed::from_meters_per_sec(5.),
        -90.,
        Heading::from_degrees(-90.),
    );
    waypoint.action = Some(WaypointAction::RecordStart);

    let json = serde_json::to_value(&waypoint).unwrap();
    assert_eq!(json["lng"], 114.1);
    assert_eq!(json["lat"], 22.3);
    assert_eq!(json["gimbalPitch"], -90.);
    assert_eq!(json["action"], "record_start");
    assert!(json.get("straightenLegs").is_none());
    assert!((json["heading"].as_f64().unwrap() - 270.).abs() < 1e-9);

    let restored: Waypoint = serde_json::from_value(json).unwrap();
    assert_eq!(restored.id, waypoint.id);
    assert_eq!(restored.position, waypoint.position);
    assert_eq!(restored.action, waypoint.action);
}

#[test]
fn snapshot_round_trip() {
    let shape = Shape::circle(LngLat::new(-98., 39.), Length::from_meters(80.), 16).unwrap();
    let snapshot = SessionSnapshot {
        settings: MissionSettings { path_type: PathType::Orbit, ..Default::default() },
        shape:    Some(shape),
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn snapshot_without_shape() {
    let restored: SessionSnapshot = serde_json::from_str(r#"{"settings": {}}"#).unwrap();
    assert!(restored.shape.is_none());
}
