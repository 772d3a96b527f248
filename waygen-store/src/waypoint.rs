use math::{Heading, Length, LngLat, Speed};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single vehicle stop in a mission.
///
/// The position of a waypoint in its containing sequence is its flight order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WaypointRepr", into = "WaypointRepr")]
pub struct Waypoint {
    /// Opaque unique identifier of the waypoint.
    pub id:              Uuid,
    /// WGS-84 position of the waypoint.
    pub position:        LngLat,
    /// Height relative to the take-off point.
    pub altitude:        Length,
    /// Flight speed towards this waypoint.
    pub speed:           Speed,
    /// Camera tilt in degrees, -90 pointing straight down and 0 pointing at the horizon.
    pub gimbal_pitch:    f64,
    /// Aircraft heading at this waypoint.
    pub heading:         Heading,
    /// Overrides the mission-wide straight-leg setting for this waypoint.
    pub straighten_legs: Option<bool>,
    /// Overrides the mission-wide camera action for this waypoint.
    pub action:          Option<WaypointAction>,
}

impl Waypoint {
    /// Creates a waypoint with a fresh identifier and no overrides.
    #[must_use]
    pub fn new(
        position: LngLat,
        altitude: Length,
        speed: Speed,
        gimbal_pitch: f64,
        heading: Heading,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            altitude,
            speed,
            gimbal_pitch,
            heading,
            straighten_legs: None,
            action: None,
        }
    }
}

#[cfg(feature = "schema")]
impl schemars::JsonSchema for Waypoint {
    fn schema_name() -> std::borrow::Cow<'static, str> { "Waypoint".into() }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        WaypointRepr::json_schema(generator)
    }
}

/// Flat `lng`/`lat` wire representation of [`Waypoint`].
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
struct WaypointRepr {
    id:              Uuid,
    lng:             f64,
    lat:             f64,
    altitude:        Length,
    speed:           Speed,
    #[serde(default)]
    gimbal_pitch:    f64,
    #[serde(default = "north")]
    heading:         Heading,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    straighten_legs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action:          Option<WaypointAction>,
}

fn north() -> Heading { Heading::NORTH }

impl From<WaypointRepr> for Waypoint {
    fn from(repr: WaypointRepr) -> Self {
        Self {
            id:              repr.id,
            position:        LngLat::new(repr.lng, repr.lat),
            altitude:        repr.altitude,
            speed:           repr.speed,
            gimbal_pitch:    repr.gimbal_pitch,
            heading:         repr.heading,
            straighten_legs: repr.straighten_legs,
            action:          repr.action,
        }
    }
}

impl From<Waypoint> for WaypointRepr {
    fn from(waypoint: Waypoint) -> Self {
        Self {
            id:              waypoint.id,
            lng:             waypoint.position.lng(),
            lat:             waypoint.position.lat(),
            altitude:        waypoint.altitude,
            speed:           waypoint.speed,
            gimbal_pitch:    waypoint.gimbal_pitch,
            heading:         waypoint.heading,
            straighten_legs: waypoint.straighten_legs,
            action:          waypoint.action,
        }
    }
}

/// Camera action triggered on arrival at a waypoint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WaypointAction {
    /// No camera action.
    #[default]
    None,
    /// Take a single photo.
    Photo,
    /// Start video recording.
    RecordStart,
    /// Stop video recording.
    RecordStop,
    /// Legacy mission-wide toggle:
    /// record from the first waypoint until the last waypoint.
    ///
    /// Only meaningful as a mission-wide setting;
    /// it is expanded into [`RecordStart`](Self::RecordStart) and
    /// [`RecordStop`](Self::RecordStop) before export.
    Record,
}
