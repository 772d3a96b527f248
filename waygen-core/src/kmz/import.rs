use std::io::{Cursor, Read, Seek};

use math::{Heading, Length, LngLat, Speed};
use quick_xml::Reader;
use quick_xml::events::Event;
use store::{MissionSettings, SessionSnapshot, Waypoint, WaypointAction};
use zip::ZipArchive;

use super::{Error, SESSION_ENTRY};
use crate::actions::Action;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Values for fields that could not be recovered from the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportDefaults {
    pub altitude:     Length,
    pub speed:        Speed,
    pub gimbal_pitch: f64,
    pub heading:      Heading,
}

impl ImportDefaults {
    #[must_use]
    pub fn from_settings(settings: &MissionSettings) -> Self {
        Self {
            altitude:     settings.altitude,
            speed:        settings.speed,
            gimbal_pitch: settings.gimbal_pitch,
            heading:      Heading::NORTH,
        }
    }
}

impl Default for ImportDefaults {
    fn default() -> Self { Self::from_settings(&MissionSettings::default()) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportResult {
    /// Recovered waypoints in document order.
    pub waypoints: Vec<Waypoint>,
    /// The embedded editing session, if present and well-formed.
    pub session:   Option<SessionSnapshot>,
    /// Number of points whose fields fell back to the defaults.
    pub unmatched: usize,
    /// The archive entry the waypoints were read from.
    /// `None` for bare documents.
    pub document:  Option<String>,
}

/// Reads a KML or WPML document, or a KMZ archive containing one.
pub fn read_bytes(bytes: &[u8], defaults: &ImportDefaults) -> Result<ImportResult, Error> {
    if bytes.starts_with(ZIP_MAGIC) {
        read_kmz(Cursor::new(bytes), defaults)
    } else {
        read_document(&String::from_utf8_lossy(bytes), defaults)
    }
}

/// Reads a bare KML or WPML document.
pub fn read_document(text: &str, defaults: &ImportDefaults) -> Result<ImportResult, Error> {
    let placemarks = parse_placemarks(text)?;
    if !placemarks.iter().any(|placemark| placemark.point.is_some()) {
        return Err(Error::NoPointData("document".into()));
    }
    Ok(enrich(&placemarks, defaults, None))
}

/// Reads a KMZ archive.
///
/// `*waylines.wpml` entries are preferred over other `.kml`/`.wpml` entries;
/// the first entry with point placemarks is used.
pub fn read_kmz<R: Read + Seek>(reader: R, defaults: &ImportDefaults) -> Result<ImportResult, Error> {
    let mut archive = ZipArchive::new(reader)?;
    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();

    let candidates = document_candidates(&names);
    if candidates.is_empty() {
        return Err(Error::MissingDocument);
    }

    let mut found = None;
    for &name in &candidates {
        let placemarks = parse_placemarks(&read_entry(&mut archive, name)?)?;
        if placemarks.iter().any(|placemark| placemark.point.is_some()) {
            found = Some((name, placemarks));
            break;
        }
        tracing::debug!("Skipping {name}: no point placemarks");
    }
    let Some((name, placemarks)) = found else {
        return Err(Error::NoPointData(candidates.join(", ")));
    };

    let mut result = enrich(&placemarks, defaults, Some(name.to_owned()));
    result.session = read_session(&mut archive, &names);
    Ok(result)
}

fn document_candidates(names: &[String]) -> Vec<&str> {
    let (preferred, others): (Vec<&str>, Vec<&str>) = names
        .iter()
        .map(String::as_str)
        .filter(|name| {
            let lower = name.to_ascii_lowercase();
            lower.ends_with(".kml") || lower.ends_with(".wpml")
        })
        .partition(|name| name.to_ascii_lowercase().ends_with("waylines.wpml"));
    preferred.into_iter().chain(others).collect()
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String, Error> {
    let mut file = archive.by_name(name)?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}

fn read_session<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    names: &[String],
) -> Option<SessionSnapshot> {
    let name = names
        .iter()
        .find(|name| *name == SESSION_ENTRY)
        .or_else(|| names.iter().find(|name| name.ends_with("session.json")))?;

    let text = match read_entry(archive, name) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("Cannot read session {name}: {err}");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(session) => Some(session),
        Err(err) => {
            tracing::warn!("Ignoring malformed session {name}: {err}");
            None
        }
    }
}

/// The fields recovered from one `<Placemark>`.
///
/// Only the first occurrence of each field is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacemarkRecord {
    /// Position of the `<Point>` geometry, if any.
    pub point:        Option<LngLat>,
    pub heading:      Option<f64>,
    pub speed:        Option<f64>,
    pub altitude:     Option<f64>,
    pub gimbal_pitch: Option<f64>,
    pub action:       Option<WaypointAction>,
    pub straight:     Option<bool>,
}

/// Associates a point feature with the placemark it was converted from.
pub trait MatchStrategy {
    /// Whether this strategy can be used for the whole document.
    fn applies(&self, points: &[LngLat], records: &[PlacemarkRecord]) -> bool;

    /// The record of the `index`-th point.
    fn find(&self, index: usize, point: LngLat, records: &[PlacemarkRecord]) -> Option<usize>;
}

/// Matches by position in the document.
/// Only applicable when every placemark is a point.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexMatch;

impl MatchStrategy for IndexMatch {
    fn applies(&self, points: &[LngLat], records: &[PlacemarkRecord]) -> bool {
        points.len() == records.len()
    }

    fn find(&self, index: usize, _: LngLat, records: &[PlacemarkRecord]) -> Option<usize> {
        (index < records.len()).then_some(index)
    }
}

/// Matches the first placemark within `epsilon` degrees on both axes.
#[derive(Debug, Clone, Copy)]
pub struct ProximityMatch {
    pub epsilon: f64,
}

impl Default for ProximityMatch {
    fn default() -> Self { Self { epsilon: 1e-4 } }
}

impl MatchStrategy for ProximityMatch {
    fn applies(&self, _: &[LngLat], _: &[PlacemarkRecord]) -> bool { true }

    fn find(&self, _: usize, point: LngLat, records: &[PlacemarkRecord]) -> Option<usize> {
        records.iter().position(|record| {
            record.point.is_some_and(|candidate| {
                (candidate.lng() - point.lng()).abs() < self.epsilon
                    && (candidate.lat() - point.lat()).abs() < self.epsilon
            })
        })
    }
}

fn enrich(
    records: &[PlacemarkRecord],
    defaults: &ImportDefaults,
    document: Option<String>,
) -> ImportResult {
    let points: Vec<LngLat> = records.iter().filter_map(|record| record.point).collect();

    let index_match = IndexMatch;
    let proximity_match = ProximityMatch::default();
    let strategies: [&dyn MatchStrategy; 2] = [&index_match, &proximity_match];
    let strategy = strategies
        .into_iter()
        .find(|strategy| strategy.applies(&points, records))
        .unwrap_or(&proximity_match);

    let mut unmatched = 0;
    let mut prev_gimbal = defaults.gimbal_pitch;
    let waypoints = points
        .iter()
        .enumerate()
        .map(|(index, &position)| {
            let Some(record) = strategy.find(index, position, records).map(|i| &records[i]) else {
                tracing::warn!("No placemark matches point {index} at {position}, using defaults");
                unmatched += 1;
                return Waypoint::new(
                    position,
                    defaults.altitude,
                    defaults.speed,
                    defaults.gimbal_pitch,
                    defaults.heading,
                );
            };

            // the gimbal holds its last commanded pitch
            let gimbal_pitch = record.gimbal_pitch.unwrap_or(prev_gimbal);
            prev_gimbal = gimbal_pitch;

            Waypoint {
                straighten_legs: record.straight,
                action: record.action,
                ..Waypoint::new(
                    position,
                    record.altitude.map_or(defaults.altitude, Length::from_meters),
                    record.speed.map_or(defaults.speed, Speed::from_meters_per_sec),
                    gimbal_pitch,
                    record.heading.map_or(defaults.heading, Heading::from_degrees),
                )
            }
        })
        .collect();

    ImportResult { waypoints, session: None, unmatched, document }
}

/// Field candidates of one placemark, before fallbacks are applied.
#[derive(Default)]
struct RawPlacemark {
    point:            Option<LngLat>,
    heading_angle:    Option<f64>,
    heading:          Option<f64>,
    speed:            Option<f64>,
    execute_height:   Option<f64>,
    ellipsoid_height: Option<f64>,
    height:           Option<f64>,
    gimbal_rotate:    Option<f64>,
    gimbal_angle:     Option<f64>,
    action:           Option<WaypointAction>,
    straight:         Option<bool>,
}

impl RawPlacemark {
    fn accept(&mut self, path: &[String], text: &str) {
        let Some(tag) = path.last() else { return };
        match tag.as_str() {
            "coordinates" if path.iter().any(|ancestor| ancestor == "Point") => {
                set_first(&mut self.point, parse_coordinates(text));
            }
            "waypointHeadingAngle" => set_first(&mut self.heading_angle, parse_number(text)),
            "waypointHeading" => set_first(&mut self.heading, parse_number(text)),
            "waypointSpeed" => set_first(&mut self.speed, parse_number(text)),
            "executeHeight" => set_first(&mut self.execute_height, parse_number(text)),
            "ellipsoidHeight" => set_first(&mut self.ellipsoid_height, parse_number(text)),
            "height" => set_first(&mut self.height, parse_number(text)),
            "gimbalPitchRotateAngle" => set_first(&mut self.gimbal_rotate, parse_number(text)),
            "gimbalPitchAngle" => set_first(&mut self.gimbal_angle, parse_number(text)),
            "actionActuatorFunc" => set_first(&mut self.action, Action::camera_from_func(text)),
            "useStraightLine" => set_first(&mut self.straight, parse_flag(text)),
            _ => {}
        }
    }

    fn finish(self) -> PlacemarkRecord {
        PlacemarkRecord {
            point:        self.point,
            heading:      self.heading_angle.or(self.heading),
            speed:        self.speed,
            altitude:     self.execute_height.or(self.ellipsoid_height).or(self.height),
            gimbal_pitch: self.gimbal_rotate.or(self.gimbal_angle),
            action:       self.action,
            straight:     self.straight,
        }
    }
}

fn parse_placemarks(text: &str) -> Result<Vec<PlacemarkRecord>, Error> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut current: Option<RawPlacemark> = None;
    let mut records = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = local_name(start.local_name().as_ref());
                if name == "Placemark" {
                    current = Some(RawPlacemark::default());
                }
                path.push(name);
            }
            Event::End(end) => {
                if local_name(end.local_name().as_ref()) == "Placemark"
                    && let Some(placemark) = current.take()
                {
                    records.push(placemark.finish());
                }
                path.pop();
            }
            Event::Text(content) => {
                if let Some(placemark) = &mut current {
                    placemark.accept(&path, &content.unescape()?);
                }
            }
            Event::CData(content) => {
                if let Some(placemark) = &mut current {
                    placemark.accept(&path, &String::from_utf8_lossy(&content));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!("Parsed {} placemarks", records.len());
    Ok(records)
}

fn local_name(name: &[u8]) -> String { String::from_utf8_lossy(name).into_owned() }

fn set_first<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse().ok().filter(|value: &f64| value.is_finite())
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Parses the first `lng,lat[,alt]` tuple of a coordinates list.
fn parse_coordinates(text: &str) -> Option<LngLat> {
    let mut parts = text.split_whitespace().next()?.split(',').map(parse_number);
    let lng = parts.next()??;
    let lat = parts.next()??;
    Some(LngLat::new(lng, lat))
}
