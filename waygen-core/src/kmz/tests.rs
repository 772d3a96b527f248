use std::io::{Cursor, Read, Write};

use jiff::Timestamp;
use math::{Angle, Heading, LngLat};
use store::{
    FinishAction, HeadingMode, MissionSettings, RcLostAction, SessionSnapshot, Waypoint,
    WaypointAction,
};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::{
    Error, ExportOptions, ImportDefaults, MatchStrategy, PlacemarkRecord, ProximityMatch,
    SESSION_ENTRY, TEMPLATE_ENTRY, WAYLINES_ENTRY, archive_file_name, read_bytes, read_document,
    read_kmz, sanitize_name, template_document, waylines_document, write_kmz,
};
use crate::test_util::{assert_position_eq, eastward_waypoints, rectangle};

fn options(settings: &MissionSettings) -> ExportOptions {
    ExportOptions { create_time: Timestamp::UNIX_EPOCH, ..ExportOptions::from_settings(settings) }
}

fn export(
    waypoints: &[Waypoint],
    settings: &MissionSettings,
    session: Option<&SessionSnapshot>,
) -> Vec<u8> {
    write_kmz(Cursor::new(Vec::new()), waypoints, settings, session, &options(settings))
        .unwrap()
        .into_inner()
}

fn entry(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut text = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

fn archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for &(name, content) in entries {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn count(haystack: &str, needle: &str) -> usize { haystack.matches(needle).count() }

macro_rules! sanitize_cases {
    ($($name:ident: $input:expr => $expect:expr,)*) => {
        paste::paste! {
            $(
                #[test]
                fn [<sanitize_ $name>]() {
                    assert_eq!(sanitize_name($input).unwrap(), $expect);
                }
            )*
        }
    }
}

sanitize_cases! {
    spaces: "My Mission 1" => "My_Mission_1",
    surrounding_whitespace: "  survey  " => "survey",
    separators: "a/b\\c.kmz" => "a_b_c_kmz",
    keeps_dash_and_underscore: "north-field_02" => "north-field_02",
    non_ascii: "Feld\u{e4}cker" => "Feld_cker",
}

#[test]
fn sanitize_truncates_long_names() {
    let name = "a".repeat(150);
    assert_eq!(sanitize_name(&name).unwrap().len(), super::MAX_NAME_LEN);
}

#[test]
fn sanitize_rejects_empty_names() {
    assert!(matches!(sanitize_name(""), Err(Error::EmptyName)));
    assert!(matches!(sanitize_name("   "), Err(Error::EmptyName)));
}

#[test]
fn archive_name_has_extension() {
    assert_eq!(archive_file_name("field 7").unwrap(), "field_7.kmz");
}

#[test]
fn archive_contains_documents() {
    let settings = MissionSettings::default();
    let waypoints = eastward_waypoints(&[10., 10.]);

    let bytes = export(&waypoints, &settings, None);
    let archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
    let mut names: Vec<_> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(names, [TEMPLATE_ENTRY, WAYLINES_ENTRY]);

    let session = SessionSnapshot { settings: settings.clone(), shape: None };
    let bytes = export(&waypoints, &settings, Some(&session));
    let archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
    assert!(archive.file_names().any(|name| name == SESSION_ENTRY));

    let embedded: SessionSnapshot = serde_json::from_str(&entry(&bytes, SESSION_ENTRY)).unwrap();
    assert_eq!(embedded, session);
}

#[test]
fn mission_config_follows_options() {
    let settings = MissionSettings {
        mission_end_action: FinishAction::Hover,
        rc_lost_action: RcLostAction::GoBack,
        ..Default::default()
    };
    let options = ExportOptions {
        create_time: Timestamp::from_millisecond(1_700_000_000_000).unwrap(),
        ..ExportOptions::from_settings(&settings)
    };
    let template = String::from_utf8(template_document(&options).unwrap()).unwrap();

    assert!(template.contains("<wpml:createTime>1700000000000</wpml:createTime>"));
    assert!(template.contains("<wpml:flyToWaylineMode>safely</wpml:flyToWaylineMode>"));
    assert!(template.contains("<wpml:finishAction>noAction</wpml:finishAction>"));
    assert!(template.contains("<wpml:executeRCLostAction>goBack</wpml:executeRCLostAction>"));
    assert!(template.contains("<wpml:droneEnumValue>68</wpml:droneEnumValue>"));
    assert!(template.contains("xmlns:wpml=\"http://www.dji.com/wpmz/1.0.2\""));
}

#[test]
fn placemarks_carry_waypoint_fields() {
    let settings = MissionSettings::default();
    let mut waypoints = eastward_waypoints(&[10.]);
    waypoints[1].heading = Heading::WEST;
    waypoints[1].straighten_legs = Some(!settings.straighten_legs);

    let doc = waylines_document(&waypoints, &settings, &options(&settings)).unwrap();
    let doc = String::from_utf8(doc).unwrap();

    assert_eq!(count(&doc, "<Placemark>"), 2);
    assert!(doc.contains("<wpml:index>1</wpml:index>"));
    assert!(doc.contains("<wpml:executeHeight>60</wpml:executeHeight>"));
    assert!(doc.contains("<wpml:waypointSpeed>10</wpml:waypointSpeed>"));
    assert!(doc.contains("<wpml:waypointHeadingAngle>-90</wpml:waypointHeadingAngle>"));
    assert!(doc.contains("<wpml:waypointHeadingMode>smoothTransition</wpml:waypointHeadingMode>"));
    assert_eq!(count(&doc, "<wpml:useStraightLine>1</wpml:useStraightLine>"), 1);
    assert_eq!(count(&doc, "<wpml:useStraightLine>0</wpml:useStraightLine>"), 1);
}

#[test]
fn follow_wayline_disables_heading_angle() {
    let settings =
        MissionSettings { heading_mode: HeadingMode::FollowWayline, ..Default::default() };
    let waypoints = eastward_waypoints(&[10.]);
    let doc = waylines_document(&waypoints, &settings, &options(&settings)).unwrap();
    let doc = String::from_utf8(doc).unwrap();

    assert_eq!(count(&doc, "<wpml:waypointHeadingAngleEnable>0<"), 2);
    assert_eq!(count(&doc, "<wpml:waypointHeadingMode>followWayline<"), 2);
}

#[test]
fn photo_and_gimbal_actions() {
    let settings =
        MissionSettings { waypoint_action: WaypointAction::Photo, ..Default::default() };
    let mut waypoints = eastward_waypoints(&[10., 10., 10.]);
    waypoints[2].gimbal_pitch = -45.;
    waypoints[3].gimbal_pitch = -45.;

    let doc = waylines_document(&waypoints, &settings, &options(&settings)).unwrap();
    let doc = String::from_utf8(doc).unwrap();

    assert_eq!(count(&doc, "<wpml:actionGroup>"), 4);
    assert_eq!(count(&doc, "<wpml:actionActuatorFunc>gimbalRotate<"), 2);
    assert_eq!(count(&doc, "<wpml:actionActuatorFunc>takePhoto<"), 4);
    assert!(doc.contains("<wpml:gimbalPitchRotateAngle>-45</wpml:gimbalPitchRotateAngle>"));
    assert!(doc.contains("<wpml:actionTriggerType>reachPoint</wpml:actionTriggerType>"));
    assert!(doc.contains("<wpml:actionGroupId>3</wpml:actionGroupId>"));
}

#[test]
fn legacy_record_starts_and_stops_once() {
    let settings =
        MissionSettings { waypoint_action: WaypointAction::Record, ..Default::default() };
    let waypoints = eastward_waypoints(&[10., 10., 10.]);

    let doc = waylines_document(&waypoints, &settings, &options(&settings)).unwrap();
    let doc = String::from_utf8(doc).unwrap();

    // gimbal and start on the first point, stop on the last point
    assert_eq!(count(&doc, "<wpml:actionGroup>"), 2);
    assert_eq!(count(&doc, "<wpml:actionActuatorFunc>startRecord<"), 1);
    assert_eq!(count(&doc, "<wpml:actionActuatorFunc>stopRecord<"), 1);
    assert_eq!(count(&doc, "<wpml:actionActuatorFunc>gimbalRotate<"), 1);
}

#[test]
fn export_import_round_trip() {
    let settings = MissionSettings::default();
    let mut waypoints = eastward_waypoints(&[12.5, 30., 7.25]);
    waypoints[1].gimbal_pitch = -60.;
    waypoints[3].action = Some(WaypointAction::Photo);
    let session = SessionSnapshot {
        settings: settings.clone(),
        shape:    Some(rectangle(LngLat::new(8.5, 47.3), 120., 80.)),
    };

    let bytes = export(&waypoints, &settings, Some(&session));
    let imported = read_kmz(Cursor::new(&bytes), &ImportDefaults::default()).unwrap();

    assert_eq!(imported.document.as_deref(), Some(WAYLINES_ENTRY));
    assert_eq!(imported.unmatched, 0);
    assert_eq!(imported.session, Some(session));
    assert_eq!(imported.waypoints.len(), waypoints.len());
    for (actual, expect) in imported.waypoints.iter().zip(&waypoints) {
        assert_position_eq(actual.position, expect.position, 1e-12);
        assert_eq!(actual.altitude, expect.altitude);
        assert_eq!(actual.speed, expect.speed);
        assert!((actual.gimbal_pitch - expect.gimbal_pitch).abs() < 1e-9);
        assert!(actual.heading.approx_eq(expect.heading, Angle::from_degrees(1e-9)));
        assert_eq!(actual.straighten_legs, Some(settings.straighten_legs));
    }
    assert_eq!(imported.waypoints[3].action, Some(WaypointAction::Photo));
    assert_eq!(imported.waypoints[0].action, None);
}

#[test]
fn missing_session_is_tolerated() {
    let settings = MissionSettings::default();
    let bytes = export(&eastward_waypoints(&[10.]), &settings, None);
    let imported = read_bytes(&bytes, &ImportDefaults::default()).unwrap();
    assert_eq!(imported.waypoints.len(), 2);
    assert_eq!(imported.session, None);
}

#[test]
fn malformed_session_is_ignored() {
    let settings = MissionSettings::default();
    let doc = waylines_document(&eastward_waypoints(&[10.]), &settings, &options(&settings));
    let bytes = archive(&[(WAYLINES_ENTRY, &doc.unwrap()[..]), (SESSION_ENTRY, &b"{not json"[..])]);

    let imported = read_bytes(&bytes, &ImportDefaults::default()).unwrap();
    assert_eq!(imported.waypoints.len(), 2);
    assert_eq!(imported.session, None);
}

#[test]
fn bare_document_is_accepted() {
    let settings = MissionSettings::default();
    let doc = waylines_document(&eastward_waypoints(&[10., 10.]), &settings, &options(&settings));
    let imported = read_bytes(&doc.unwrap(), &ImportDefaults::default()).unwrap();
    assert_eq!(imported.waypoints.len(), 3);
    assert_eq!(imported.document, None);
}

#[test]
fn prefers_waylines_over_other_documents() {
    let settings = MissionSettings::default();
    let short = waylines_document(&eastward_waypoints(&[10.]), &settings, &options(&settings));
    let long = waylines_document(&eastward_waypoints(&[10., 10.]), &settings, &options(&settings));
    let bytes =
        archive(&[("extra/points.kml", &short.unwrap()[..]), (WAYLINES_ENTRY, &long.unwrap()[..])]);

    let imported = read_bytes(&bytes, &ImportDefaults::default()).unwrap();
    assert_eq!(imported.document.as_deref(), Some(WAYLINES_ENTRY));
    assert_eq!(imported.waypoints.len(), 3);
}

const MIXED_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:wpml="http://www.dji.com/wpmz/1.0.2">
  <Document>
    <Placemark>
      <name>Boundary</name>
      <LineString><coordinates>8.5,47.3,0 8.6,47.4,0</coordinates></LineString>
    </Placemark>
    <Placemark>
      <Point><coordinates>8.55,47.35,120</coordinates></Point>
      <wpml:waypointHeading>45</wpml:waypointHeading>
      <wpml:ellipsoidHeight>80</wpml:ellipsoidHeight>
      <wpml:height>70</wpml:height>
      <waypointSpeed>7.5</waypointSpeed>
      <wpml:gimbalPitchAngle>-30</wpml:gimbalPitchAngle>
      <wpml:actionActuatorFunc>takePhoto</wpml:actionActuatorFunc>
      <wpml:useStraightLine>0</wpml:useStraightLine>
    </Placemark>
    <Placemark>
      <Point><coordinates><![CDATA[8.56,47.36]]></coordinates></Point>
      <wpml:executeHeight>50</wpml:executeHeight>
      <wpml:ellipsoidHeight>80</wpml:ellipsoidHeight>
    </Placemark>
  </Document>
</kml>
"#;

#[test]
fn proximity_matching_with_non_point_placemarks() {
    let defaults = ImportDefaults::default();
    let imported = read_document(MIXED_DOCUMENT, &defaults).unwrap();
    assert_eq!(imported.unmatched, 0);

    let [first, second] = imported.waypoints.as_slice() else {
        panic!("expected 2 waypoints, got {:?}", imported.waypoints);
    };
    assert_position_eq(first.position, LngLat::new(8.55, 47.35), 1e-12);
    assert!(first.heading.approx_eq(Heading::from_degrees(45.), Angle::from_degrees(1e-9)));
    assert_eq!(first.altitude.into_meters(), 80.);
    assert_eq!(first.speed.into_meters_per_sec(), 7.5);
    assert_eq!(first.gimbal_pitch, -30.);
    assert_eq!(first.action, Some(WaypointAction::Photo));
    assert_eq!(first.straighten_legs, Some(false));

    assert_position_eq(second.position, LngLat::new(8.56, 47.36), 1e-12);
    assert_eq!(second.altitude.into_meters(), 50.);
    assert_eq!(second.speed, defaults.speed);
    assert_eq!(second.heading, defaults.heading);
    // gimbal holds the previous pitch
    assert_eq!(second.gimbal_pitch, -30.);
    assert_eq!(second.action, None);
}

#[test]
fn proximity_rejects_distant_points() {
    let records = [PlacemarkRecord {
        point: Some(LngLat::new(8.55, 47.35)),
        ..Default::default()
    }];
    let strategy = ProximityMatch::default();
    assert_eq!(strategy.find(0, LngLat::new(8.55005, 47.35005), &records), Some(0));
    assert_eq!(strategy.find(0, LngLat::new(8.5502, 47.35), &records), None);
}

#[test]
fn archive_without_document() {
    let bytes = archive(&[("notes.txt", &b"hello"[..])]);
    let err = read_bytes(&bytes, &ImportDefaults::default()).unwrap_err();
    assert!(matches!(err, Error::MissingDocument), "{err}");
}

#[test]
fn documents_without_points() {
    let settings = MissionSettings::default();
    let template = template_document(&options(&settings)).unwrap();
    let bytes = archive(&[(TEMPLATE_ENTRY, &template[..])]);
    let err = read_bytes(&bytes, &ImportDefaults::default()).unwrap_err();
    assert!(matches!(&err, Error::NoPointData(names) if names == TEMPLATE_ENTRY), "{err}");

    let err = read_document(&String::from_utf8(template).unwrap(), &ImportDefaults::default())
        .unwrap_err();
    assert!(matches!(err, Error::NoPointData(_)));
}
