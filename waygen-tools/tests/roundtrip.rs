use std::fs;
use std::path::PathBuf;

use math::LngLat;
use store::{MissionSettings, SessionSnapshot, Shape, WaypointAction};

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("waygen-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) { _ = fs::remove_dir_all(&self.0); }
}

fn field() -> Shape {
    Shape::from_ring(vec![
        LngLat::new(8.5, 47.3),
        LngLat::new(8.5016, 47.3),
        LngLat::new(8.5016, 47.3007),
        LngLat::new(8.5, 47.3007),
        LngLat::new(8.5, 47.3),
    ])
    .unwrap()
}

#[test]
fn plan_export_import_assess() {
    let dir = TempDir::new();
    let session = SessionSnapshot {
        settings: MissionSettings {
            waypoint_action: WaypointAction::Photo,
            ..Default::default()
        },
        shape:    Some(field()),
    };
    let session_path = dir.0.join("session.json");
    fs::write(&session_path, serde_json::to_vec(&session).unwrap()).unwrap();

    let mission_path = dir.0.join("mission.json");
    let planned = waygen_tools::plan(&session_path, &mission_path, true).unwrap();
    assert!(planned.waypoints.len() >= 4, "{} waypoints", planned.waypoints.len());
    assert!(mission_path.exists());

    let archive = waygen_tools::export(&mission_path, &dir.0, "North Field").unwrap();
    assert_eq!(archive.file_name().and_then(|name| name.to_str()), Some("North_Field.kmz"));

    let imported_path = dir.0.join("imported.json");
    let imported = waygen_tools::import(&archive, &imported_path).unwrap();
    assert_eq!(imported.waypoints.len(), planned.waypoints.len());
    assert_eq!(imported.settings, planned.settings);
    assert_eq!(imported.shape, planned.shape);
    for (actual, expect) in imported.waypoints.iter().zip(&planned.waypoints) {
        assert!(actual.position.abs_diff_eq(expect.position, 1e-12));
        assert_eq!(actual.speed, expect.speed);
    }

    let report = waygen_tools::assess(&imported_path).unwrap();
    assert_eq!(report.waypoints, planned.waypoints.len());
    assert!(report.total_distance > 0.);
    assert!(report.max_speed > 0.);
}

#[test]
fn plan_requires_shape() {
    let dir = TempDir::new();
    let session = SessionSnapshot { settings: MissionSettings::default(), shape: None };
    let session_path = dir.0.join("session.json");
    fs::write(&session_path, serde_json::to_vec(&session).unwrap()).unwrap();

    let err = waygen_tools::plan(&session_path, &dir.0.join("mission.json"), false).unwrap_err();
    assert!(format!("{err:#}").contains("no shape"), "{err:#}");
}

#[test]
fn export_rejects_empty_name() {
    let dir = TempDir::new();
    let session = SessionSnapshot { settings: MissionSettings::default(), shape: Some(field()) };
    let session_path = dir.0.join("session.json");
    fs::write(&session_path, serde_json::to_vec(&session).unwrap()).unwrap();
    let mission_path = dir.0.join("mission.json");
    waygen_tools::plan(&session_path, &mission_path, false).unwrap();

    assert!(waygen_tools::export(&mission_path, &dir.0, "  ").is_err());
}

#[test]
fn schema_is_written() {
    let dir = TempDir::new();
    let path = dir.0.join("schema.json");
    waygen_tools::json_schema(&path, false).unwrap();
    let schema: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(schema["title"], "SessionSnapshot");
}
