use math::{Length, Speed, TurnDirection};
use serde::{Deserialize, Serialize};

use crate::WaypointAction;

/// Flat configuration of a planning call.
///
/// Every field has a default, so partial settings files load.
/// Unknown keys written by user interfaces are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct MissionSettings {
    /// Camera horizontal field of view in degrees.
    ///
    /// Falls back to the drone preset if unset.
    #[serde(rename = "customFOV", skip_serializing_if = "Option::is_none")]
    pub custom_fov:           Option<f64>,
    /// Flight height relative to the take-off point.
    pub altitude:             Length,
    /// Flight speed between waypoints.
    pub speed:                Speed,
    /// Camera tilt in degrees, -90 pointing straight down.
    pub gimbal_pitch:         f64,
    /// The path generator to use.
    pub path_type:            PathType,
    /// Percentage of image overlap between adjacent scan rows.
    pub side_overlap:         f64,
    /// Percentage of image overlap along the flight direction.
    pub front_overlap:        f64,
    /// Scan line bearing in degrees, clockwise from north.
    pub angle:                f64,
    /// Align scan lines with the longest polygon edge instead of `angle`.
    pub auto_direction:       bool,
    /// Fly the grid in reverse order.
    pub reverse_path:         bool,
    /// Resample each scan row at the forward spacing
    /// instead of only emitting the row endpoints.
    pub generate_every_point: bool,
    /// Lock the heading of every grid waypoint to the first heading.
    pub eliminate_extra_yaw:  bool,
    /// Distance between orbit waypoints along the circumference.
    #[serde(alias = "orbitSpacing")]
    pub spacing:              Length,
    /// Bearing of the first orbit waypoint from the center, in degrees.
    ///
    /// 0 is east, increasing counter-clockwise.
    pub start_angle:          f64,
    /// Direction of the orbit sweep.
    pub direction:            TurnDirection,
    /// Number of revolutions, fractional values allowed.
    pub number_of_orbits:     f64,
    /// Camera action at every waypoint.
    pub waypoint_action:      WaypointAction,
    /// Minimum seconds between two photos.
    ///
    /// Falls back to the drone preset if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_interval:       Option<f64>,
    /// Fly straight lines between waypoints instead of curved transitions.
    pub straighten_legs:      bool,
    /// Action after the last waypoint.
    pub mission_end_action:   FinishAction,
    /// Action when the remote controller signal is lost.
    pub rc_lost_action:       RcLostAction,
    /// How the aircraft yaws between waypoints.
    pub heading_mode:         HeadingMode,
    /// Speed used to fly to the first waypoint and between waylines.
    pub transitional_speed:   Speed,
    /// The drone model used to resolve camera and battery defaults.
    pub selected_drone:       DroneModel,
}

impl Default for MissionSettings {
    fn default() -> Self {
        Self {
            custom_fov:           None,
            altitude:             Length::from_meters(60.),
            speed:                Speed::from_meters_per_sec(10.),
            gimbal_pitch:         -90.,
            path_type:            PathType::Grid,
            side_overlap:         80.,
            front_overlap:        80.,
            angle:                0.,
            auto_direction:       false,
            reverse_path:         false,
            generate_every_point: false,
            eliminate_extra_yaw:  false,
            spacing:              Length::from_meters(10.),
            start_angle:          0.,
            direction:            TurnDirection::CounterClockwise,
            number_of_orbits:     1.,
            waypoint_action:      WaypointAction::None,
            photo_interval:       None,
            straighten_legs:      false,
            mission_end_action:   FinishAction::GoHome,
            rc_lost_action:       RcLostAction::Hover,
            heading_mode:         HeadingMode::SmoothTransition,
            transitional_speed:   Speed::from_meters_per_sec(5.),
            selected_drone:       DroneModel::default(),
        }
    }
}

/// Selects the path generator.
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
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PathType {
    /// Boustrophedon scan over the polygon.
    #[default]
    Grid,
    /// Circular orbit around the polygon center.
    Orbit,
}

/// Drone models with known camera and battery characteristics.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DroneModel {
    /// DJI Mini 4 Pro.
    #[serde(rename = "mini-4-pro", alias = "dji_mini_4_pro")]
    #[strum(to_string = "mini-4-pro", serialize = "dji_mini_4_pro")]
    Mini4Pro,
    /// DJI Mini 5 Pro.
    #[default]
    #[serde(rename = "mini-5-pro", alias = "dji_mini_5_pro")]
    #[strum(to_string = "mini-5-pro", serialize = "dji_mini_5_pro")]
    Mini5Pro,
    /// DJI Mavic 4 Pro.
    #[serde(rename = "mavic-4-pro", alias = "dji_mavic_4_pro")]
    #[strum(to_string = "mavic-4-pro", serialize = "dji_mavic_4_pro")]
    Mavic4Pro,
    /// A drone without preset data; the field of view must be supplied.
    Custom,
}

/// Action after the last waypoint.
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
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FinishAction {
    /// Return to the take-off point.
    #[default]
    GoHome,
    /// Hover at the last waypoint.
    #[serde(alias = "autoLand", alias = "noAction")]
    #[strum(to_string = "hover", serialize = "autoLand", serialize = "noAction")]
    Hover,
}

/// Action when the remote controller signal is lost.
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
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RcLostAction {
    /// Hover in place.
    #[default]
    Hover,
    /// Return to the take-off point.
    GoBack,
}

/// How the aircraft yaws between waypoints.
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
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum HeadingMode {
    /// Rotate smoothly to the heading of each waypoint.
    #[default]
    SmoothTransition,
    /// Face along the wayline; waypoint headings are informational.
    FollowWayline,
}
